use crate::{
    auth::{hash_password, verify_password, AuthResponse, LoginRequest, Session},
    db::{UserStore, DUPLICATE_EMAIL},
    error::AppError,
    models::{user::normalize_email, User, UserChanges, UserInput, UserUpdate},
    state::AppState,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use validator::Validate;

/// Opens a new session for `user` and returns its token.
async fn open_session(state: &AppState, user: &User) -> Result<String, AppError> {
    let token = state.keys.generate_token(user.id)?;
    state.store.add_token(user.id, &token).await?;
    Ok(token)
}

/// Register a new user
///
/// Creates the account, opens its first session and returns `{ user, token }`.
/// The two steps are not atomic: if storing the token fails the account
/// remains and the client gets a 500, after which logging in opens a session.
#[post("")]
pub async fn signup(
    state: web::Data<AppState>,
    user_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    let input = user_data.into_inner().normalized();
    input.validate()?;

    if state.store.find_user_by_email(&input.email).await?.is_some() {
        return Err(AppError::BadRequest(DUPLICATE_EMAIL.into()));
    }

    let password_hash = hash_password(&input.password)?;
    let user = state
        .store
        .insert_user(&User::new(input, password_hash))
        .await?;
    let token = open_session(&state, &user).await?;
    log::info!("Registered user {}", user.id);

    Ok(HttpResponse::Created().json(AuthResponse { user, token }))
}

/// Login user
///
/// Unknown e-mail and wrong password produce the same response.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let unable = || AppError::BadRequest("Unable to login".into());

    let user = state
        .store
        .find_user_by_email(&normalize_email(&login_data.email))
        .await?
        .ok_or_else(unable)?;
    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(unable());
    }

    let token = open_session(&state, &user).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { user, token }))
}

/// Ends the session the request was made with; other sessions stay valid.
#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    state
        .store
        .remove_token(session.user.id, &session.token)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

/// Ends every session of the authenticated user.
#[post("/logoutAll")]
pub async fn logout_all(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    state.store.clear_tokens(session.user.id).await?;
    Ok(HttpResponse::Ok().finish())
}

#[get("/me")]
pub async fn profile(session: Session) -> impl Responder {
    HttpResponse::Ok().json(session.user)
}

/// Updates `name`, `email`, `password` and/or `age`. Other fields are rejected.
#[patch("/me")]
pub async fn update_profile(
    state: web::Data<AppState>,
    session: Session,
    user_data: web::Json<UserUpdate>,
) -> Result<impl Responder, AppError> {
    let update = user_data.into_inner().normalized();
    update.validate()?;

    let password_hash = match &update.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };
    let changes = UserChanges {
        name: update.name,
        email: update.email,
        password_hash,
        age: update.age,
    };

    let user = state
        .store
        .update_user(session.user.id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(HttpResponse::Ok().json(user))
}

/// Deletes the account together with all of its tasks.
#[delete("/me")]
pub async fn delete_account(
    state: web::Data<AppState>,
    session: Session,
) -> Result<impl Responder, AppError> {
    let user = state
        .store
        .delete_user(session.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    log::info!("Deleted user {}", user.id);
    Ok(HttpResponse::Ok().json(user))
}
