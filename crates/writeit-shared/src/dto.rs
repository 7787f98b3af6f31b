//! Data Transfer Objects - request/response types for the API.
//!
//! Requests only carry client-writable fields. Anything else a client
//! sends (`id`, `creator_id`, timestamps) is ignored on decode.

use serde::{Deserialize, Serialize};

use crate::response::Envelope;

/// Body of `POST /posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub post_body: String,
}

/// Body of `PUT /posts/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub post_title: Option<String>,
    pub post_body: Option<String>,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email_address: String,
    pub password: String,
}

/// Body of `PUT /users/{id}`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub email_address: Option<String>,
    pub password: Option<String>,
}

/// Body of `POST /users/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email_address: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse<U> {
    pub user: U,
    pub auth_token: String,
}

/// Failed login payload: the nested envelope says which stage failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginFailure {
    pub user_response: Envelope<()>,
    pub auth_token: String,
}

impl LoginFailure {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            user_response: Envelope::error(status_code, message),
            auth_token: String::new(),
        }
    }
}
