pub mod task;
pub mod user;
pub mod validation;

pub use task::{SortDirection, SortField, Task, TaskFilter, TaskInput, TaskQuery, TaskSort, TaskUpdate};
pub use user::{User, UserChanges, UserInput, UserUpdate};
