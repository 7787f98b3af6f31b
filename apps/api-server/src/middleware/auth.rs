//! Claims extraction for authenticated routes.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::StatusCode, http::header, web};
use std::future::{Ready, ready};

use writeit_core::ports::{AuthError, TokenClaims, TokenService};
use writeit_shared::Envelope;

use crate::state::AppState;

/// Cookie consulted when no Authorization header is present.
const TOKEN_COOKIE: &str = "jwt";

/// Authenticated caller, built from verified token claims.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: i64,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}

/// Claim extraction failure. Always answered with 403.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AuthenticationError(pub AuthError);

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::FORBIDDEN
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        tracing::debug!(reason = %self.0, "Rejected unauthenticated request");
        actix_web::HttpResponse::Forbidden()
            .json(Envelope::<()>::error(StatusCode::FORBIDDEN.as_u16(), self.to_string()))
    }
}

/// Token from `Authorization: Bearer <jwt>`, else from the `jwt` cookie.
fn token_from_request(req: &HttpRequest) -> Result<String, AuthError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let auth_str = value
            .to_str()
            .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

        return auth_str
            .strip_prefix("Bearer ")
            .map(|t| t.trim().to_string())
            .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()));
    }

    req.cookie(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AuthError::MissingAuth)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState not found in app data");
            return ready(Err(AuthenticationError(AuthError::InvalidToken(
                "Server configuration error".to_string(),
            ))));
        };

        let result = token_from_request(req)
            .and_then(|token| state.tokens.validate_token(&token))
            .map(Identity::from)
            .map_err(AuthenticationError);

        ready(result)
    }
}
