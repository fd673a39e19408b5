use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The authenticated caller of a request.
///
/// `AuthMiddleware` inserts it into the request extensions after checking the
/// bearer token; handlers take it as an argument. `token` is the exact string the
/// request was authenticated with, which is what a logout removes.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl FromRequest for Session {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Session>().cloned() {
            Some(session) => ready(Ok(session)),
            None => {
                // Only reachable when a route is mounted outside `AuthMiddleware`.
                let err = AppError::Unauthorized("Please authenticate".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
