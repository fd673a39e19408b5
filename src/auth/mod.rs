pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::models::User;

pub use extractors::Session;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body after a successful signup or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The user, without its password hash.
    pub user: User,
    /// The bearer token for the session just opened.
    pub token: String,
}
