use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents the claims encoded within a session JWT.
///
/// Sessions do not expire on their own; a token stays usable until it is removed
/// from its user's token list by a logout or account deletion.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the user's id.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Unique token id, so two logins within the same second yield distinct tokens.
    pub jti: Uuid,
}

/// Signing and verification keys derived from the `JWT_SECRET` setting.
///
/// Built once at startup and shared through application state.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenKeys {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Generates a signed token for `user_id`.
    ///
    /// # Returns
    /// The compact JWT string, or `AppError::InternalServerError` if encoding fails.
    pub fn generate_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let claims = Claims {
            sub: user_id,
            iat: chrono::Utc::now().timestamp(),
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies a token's signature and structure and decodes its claims.
    ///
    /// This does not consult the store, so a signed but revoked token still passes
    /// here; `AuthMiddleware` performs the second check against the token list.
    ///
    /// # Returns
    /// `AppError::Unauthorized` if the token is malformed or its signature is invalid.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}
