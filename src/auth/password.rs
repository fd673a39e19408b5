use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hashes a plain-text password for storage.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    Ok(hash(plain, DEFAULT_COST)?)
}

/// Checks `plain` against a stored hash. A stored hash bcrypt cannot read
/// counts as a mismatch, so login answers "Unable to login" instead of 500.
pub fn verify_password(plain: &str, stored_hash: &str) -> Result<bool, AppError> {
    match verify(plain, stored_hash) {
        Ok(matches) => Ok(matches),
        Err(e) => {
            log::warn!("Unreadable password hash: {}", e);
            Ok(false)
        }
    }
}
