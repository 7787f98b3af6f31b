//! User resource handlers, including login.

use actix_web::{HttpResponse, web};

use writeit_core::RepoError;
use writeit_core::domain::User;
use writeit_core::ports::{
    AuthError, PasswordService, Repository, TokenService, UserRepository,
};
use writeit_shared::Envelope;
use writeit_shared::dto::{
    CreateUserRequest, LoginFailure, LoginRequest, LoginResponse, UpdateUserRequest,
};

use super::{decode, parse_id, respond};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn validate_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AppError::Unprocessable("Invalid email address".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Unprocessable(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn hash_password(state: &AppState, password: &str) -> Result<String, AppError> {
    state
        .passwords
        .hash(password)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// POST /users
pub async fn create(state: web::Data<AppState>, body: web::Bytes) -> AppResult<HttpResponse> {
    let req: CreateUserRequest = decode(&body, "User").map_err(AppError::Unprocessable)?;
    validate_email(&req.email_address)?;
    validate_password(&req.password)?;

    let password = hash_password(&state, &req.password)?;
    let created = state
        .users
        .create(User::new(req.email_address, password))
        .await
        .map_err(|e| AppError::from_repo(e, AppError::BadRequest))?;

    tracing::info!(user_id = created.id, "User registered");
    Ok(respond(Envelope::ok("User successfully registered", created)))
}

/// Failed login: 422 outside, the failing stage's status inside.
fn login_failed(stage_status: u16, message: String) -> HttpResponse {
    respond(Envelope::error_with(
        422,
        message.clone(),
        LoginFailure::new(stage_status, message),
    ))
}

/// Stage status and message of a rejected login.
struct LoginRejected(u16, String);

impl LoginRejected {
    fn invalid_credentials() -> Self {
        Self(404, AuthError::InvalidCredentials.to_string())
    }
}

/// Email + password to user. Unknown email, wrong password and an
/// unreadable stored hash all look alike to the caller.
async fn authenticate(state: &AppState, req: &LoginRequest) -> Result<User, LoginRejected> {
    let user = state
        .users
        .find_by_email(&req.email_address)
        .await
        .map_err(|e| {
            tracing::error!("Login lookup failed: {}", e);
            LoginRejected(500, e.to_string())
        })?
        .ok_or_else(LoginRejected::invalid_credentials)?;

    match state.passwords.verify(&req.password, &user.password) {
        Ok(true) => Ok(user),
        Ok(false) => Err(LoginRejected::invalid_credentials()),
        Err(e) => {
            tracing::warn!(user_id = user.id, "Password check failed: {}", e);
            Err(LoginRejected::invalid_credentials())
        }
    }
}

/// POST /users/login
///
/// Every failure answers with a `LoginFailure` payload.
pub async fn login(state: web::Data<AppState>, body: web::Bytes) -> HttpResponse {
    let req: LoginRequest = match decode(&body, "Credentials") {
        Ok(req) => req,
        Err(message) => return login_failed(422, message),
    };

    let user = match authenticate(&state, &req).await {
        Ok(user) => user,
        Err(LoginRejected(status, message)) => {
            tracing::info!(stage_status = status, "Login rejected: {}", message);
            return login_failed(status, message);
        }
    };

    let auth_token = match state.tokens.generate_token(user.id, &user.email_address) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(user_id = user.id, "Token generation failed: {}", e);
            return login_failed(400, e.to_string());
        }
    };

    tracing::info!(user_id = user.id, "User logged in");
    respond(Envelope::ok(
        "Logged in successfully",
        LoginResponse { user, auth_token },
    ))
}

/// GET /users
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state
        .users
        .find_all()
        .await
        .map_err(|e| AppError::from_repo(e, AppError::NotFound))?;

    Ok(respond(Envelope::ok("Users successfully retrieved", users)))
}

/// GET /users/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path).map_err(AppError::Unprocessable)?;

    let user = state.users.find_by_id(id).await.map_err(|e| {
        if e.is_input() {
            AppError::Unprocessable(e.to_string())
        } else {
            AppError::from_repo(e, AppError::NotFound)
        }
    })?;

    Ok(respond(Envelope::ok("User successfully retrieved", user)))
}

/// PUT /users/{id}
///
/// Absent body fields keep their stored value; a new password is hashed
/// before it is stored.
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path).map_err(AppError::Unprocessable)?;
    let req: UpdateUserRequest = decode(&body, "User").map_err(AppError::Unprocessable)?;

    let mut user = state
        .users
        .find_by_id(id)
        .await
        .map_err(|e| AppError::from_repo(e, AppError::Unprocessable))?;

    if let Some(email) = req.email_address {
        validate_email(&email)?;
        user.email_address = email;
    }
    if let Some(password) = req.password {
        validate_password(&password)?;
        user.password = hash_password(&state, &password)?;
    }

    let updated = state
        .users
        .update(user)
        .await
        .map_err(|e| AppError::from_repo(e, AppError::Unprocessable))?;

    Ok(respond(Envelope::ok("User successfully updated", updated)))
}

/// DELETE /users/{id}
///
/// Answers with a 204-flagged envelope.
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path).map_err(AppError::Unprocessable)?;

    state.users.delete(id).await.map_err(|e| match e {
        RepoError::MissingId => AppError::Unprocessable(e.to_string()),
        e => AppError::from_repo(e, AppError::NotFound),
    })?;

    tracing::info!(user_id = id, "User deleted");
    Ok(respond(Envelope::<()>::ok_empty(204, "User successfully deleted")))
}
