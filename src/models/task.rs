use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::validation::not_blank;

lazy_static! {
    // `<field>_<direction>`, with `:` accepted as an alternative separator.
    static ref SORT_BY_REGEX: Regex = Regex::new(r"^([A-Za-z]+)[_:](asc|desc)$").unwrap();
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// What needs to be done. Never blank, stored trimmed.
    pub description: String,
    /// Whether the task has been completed.
    pub completed: bool,
    /// Identifier of the user who created and owns the task. Never changes.
    pub owner: Uuid,
    /// Timestamp of when the task was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last update to the task.
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /tasks`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskInput {
    #[validate(custom = "not_blank")]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Payload for `PATCH /tasks/{id}`. Only the listed fields may be supplied.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TaskUpdate {
    #[validate(custom = "not_blank")]
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Raw query string accepted by `GET /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub completed: Option<bool>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Description,
    Completed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Validated listing options handed to the store. The owner is passed separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub sort: Option<TaskSort>,
    /// `None` means unbounded. Both bounds fit a PostgreSQL `BIGINT`.
    pub limit: Option<i64>,
    pub skip: i64,
}

impl Task {
    /// Creates a new `Task` owned by `owner` from a validated `TaskInput`.
    pub fn new(input: TaskInput, owner: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: input.description.trim().to_string(),
            completed: input.completed,
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the supplied fields of `update` and bumps `updated_at`.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(description) = &update.description {
            self.description = description.trim().to_string();
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "description" => Some(SortField::Description),
            "completed" => Some(SortField::Completed),
            "createdAt" => Some(SortField::CreatedAt),
            "updatedAt" => Some(SortField::UpdatedAt),
            _ => None,
        }
    }

    /// Column name in the `tasks` table.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Description => "description",
            SortField::Completed => "completed",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl TaskSort {
    /// Parses a `sortBy` value such as `completed_desc` or `createdAt:asc`.
    /// The direction is honored for every field, so `completed_desc` puts
    /// completed tasks first.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let invalid = || AppError::BadRequest(format!("Invalid sortBy value: {}", raw));
        let captures = SORT_BY_REGEX.captures(raw).ok_or_else(invalid)?;
        let field = SortField::parse(&captures[1]).ok_or_else(invalid)?;
        let direction = match &captures[2] {
            "desc" => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Ok(TaskSort { field, direction })
    }

    /// Orders two tasks by this key. Equal keys compare as equal so a stable
    /// sort keeps creation order.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        let ordering = match self.field {
            // Byte order, which matches `COLLATE "C"` in PostgreSQL.
            SortField::Description => a.description.cmp(&b.description),
            SortField::Completed => a.completed.cmp(&b.completed),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl TryFrom<TaskQuery> for TaskFilter {
    type Error = AppError;

    fn try_from(query: TaskQuery) -> Result<Self, Self::Error> {
        let sort = query.sort_by.as_deref().map(TaskSort::parse).transpose()?;
        let limit = query
            .limit
            .filter(|limit| *limit > 0)
            .map(|limit| bounded("limit", limit))
            .transpose()?;
        Ok(TaskFilter {
            completed: query.completed,
            sort,
            limit,
            skip: bounded("skip", query.skip.unwrap_or(0))?,
        })
    }
}

fn bounded(name: &str, value: u64) -> Result<i64, AppError> {
    i64::try_from(value)
        .map_err(|_| AppError::BadRequest(format!("{} is out of range: {}", name, value)))
}
