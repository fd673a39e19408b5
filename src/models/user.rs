use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::validation::{not_blank, not_trivial_password};

/// A registered account. The password hash is never serialized, and the
/// account's session tokens live beside it in the store rather than on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: i32,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Signup payload for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct UserInput {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Plain-text password; only its hash is stored.
    #[validate(length(min = 7), custom = "not_trivial_password")]
    pub password: String,
    #[validate(range(min = 0))]
    pub age: Option<i32>,
}

/// Profile update payload for `PATCH /users/me`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 7), custom = "not_trivial_password")]
    pub password: Option<String>,
    #[validate(range(min = 0))]
    pub age: Option<i32>,
}

/// Store-level profile changes; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<i32>,
}

/// Canonical form of an e-mail address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UserInput {
    /// Trims the name and canonicalizes the e-mail before validation.
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.email = normalize_email(&self.email);
        self
    }
}

impl UserUpdate {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.map(|name| name.trim().to_string());
        self.email = self.email.as_deref().map(normalize_email);
        self
    }
}

impl User {
    /// Builds a new account from a validated signup payload and a password hash.
    pub fn new(input: UserInput, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            age: input.age.unwrap_or(0),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: &UserChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
        if let Some(password_hash) = &changes.password_hash {
            self.password_hash = password_hash.clone();
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn input(email: &str, password: &str) -> UserInput {
        UserInput {
            name: "Mike".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            age: None,
        }
    }

    #[test]
    fn test_user_input_validation() {
        assert!(input("mike@example.com", "mikepass").validate().is_ok());

        // Invalid email
        assert!(input("invalid-email", "mikepass").validate().is_err());

        // Short password
        assert!(input("mike@example.com", "short").validate().is_err());

        // Password containing "password"
        assert!(input("mike@example.com", "mypassword1").validate().is_err());

        let mut negative_age = input("mike@example.com", "mikepass");
        negative_age.age = Some(-1);
        assert!(negative_age.validate().is_err());
    }

    #[test]
    fn test_user_input_normalization() {
        let normalized = UserInput {
            name: "  Mike ".to_string(),
            email: " Mike@Example.COM ".to_string(),
            password: "mikepass".to_string(),
            age: None,
        }
        .normalized();
        assert_eq!(normalized.name, "Mike");
        assert_eq!(normalized.email, "mike@example.com");

        let user = User::new(normalized, "hash".to_string());
        assert_eq!(user.age, 0);
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new(input("mike@example.com", "mikepass"), "secret-hash".into());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "mike@example.com");
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_user_update_rejects_unknown_fields() {
        let parsed: Result<UserUpdate, _> = serde_json::from_str(r#"{"height": 180}"#);
        assert!(parsed.is_err());

        let update: UserUpdate = serde_json::from_str(r#"{"name": "Michael"}"#).unwrap();
        assert!(update.validate().is_ok());
    }
}
