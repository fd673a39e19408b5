//! Field rules shared by the task and user payloads that the built-in
//! `validator` checks do not cover.

use validator::ValidationError;

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Rejects passwords that contain the word "password" in any casing.
pub fn not_trivial_password(value: &str) -> Result<(), ValidationError> {
    if value.to_lowercase().contains("password") {
        let mut error = ValidationError::new("trivial_password");
        error.message = Some("must not contain \"password\"".into());
        return Err(error);
    }
    Ok(())
}
