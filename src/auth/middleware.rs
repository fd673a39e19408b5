use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::Session;
use crate::error::AppError;
use crate::state::AppState;

/// Rejects requests that do not carry a live bearer token.
///
/// A token passes only if its signature verifies *and* it is still listed on the
/// user it names, so logging out revokes it immediately. On success a `Session`
/// is stored in the request extensions for handlers to extract.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

/// Routes reachable without a session: health check, signup and login.
fn is_public(req: &ServiceRequest) -> bool {
    let path = req.path();
    path == "/health"
        || (req.method() == Method::POST && (path == "/users" || path == "/users/login"))
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

async fn authenticate(req: &ServiceRequest) -> Result<Session, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalServerError("AppState is not registered".into()))?;
    let token =
        bearer_token(req).ok_or_else(|| AppError::Unauthorized("Please authenticate".into()))?;
    let claims = state.keys.verify_token(&token)?;
    let user = state
        .store
        .find_user_by_token(claims.sub, &token)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Please authenticate".into()))?;
    Ok(Session { user, token })
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public(&req) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match authenticate(&req).await {
                Ok(session) => {
                    req.extensions_mut().insert(session);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), err);
                    Ok(req.error_response(err).map_into_right_body())
                }
            }
        })
    }
}
