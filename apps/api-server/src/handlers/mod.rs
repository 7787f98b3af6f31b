//! HTTP handlers and route configuration.
//!
//! Each resource usecase runs the same linear pipeline: authenticate
//! (where required), decode, assign identity from claims, delegate to the
//! persistence service, and answer with an envelope.

mod health;
mod posts;
mod users;

use actix_web::{HttpResponse, http::StatusCode, web};
use serde::Serialize;
use serde::de::DeserializeOwned;

use writeit_core::RepoError;
use writeit_shared::Envelope;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                .route("", web::post().to(posts::create))
                .route("", web::get().to(posts::list))
                .route("/{id}", web::get().to(posts::get))
                .route("/{id}", web::put().to(posts::update))
                .route("/{id}", web::delete().to(posts::delete)),
        )
        .service(
            web::scope("/users")
                .route("", web::post().to(users::create))
                .route("", web::get().to(users::list))
                .route("/login", web::post().to(users::login))
                .route("/{id}", web::get().to(users::get))
                .route("/{id}", web::put().to(users::update))
                .route("/{id}", web::delete().to(users::delete)),
        );
}

/// Send an envelope with its own status code. A 204-flagged envelope goes
/// out as 200 so the body reaches the client.
pub(crate) fn respond<T: Serialize>(envelope: Envelope<T>) -> HttpResponse {
    let status = match envelope.status_code {
        204 => StatusCode::OK,
        code => StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
    };
    HttpResponse::build(status).json(envelope)
}

/// Decode a JSON request body. An empty body counts as missing input.
pub(crate) fn decode<T: DeserializeOwned>(body: &[u8], entity: &'static str) -> Result<T, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RepoError::EmptyInput(entity).to_string());
    }
    serde_json::from_slice(body).map_err(|e| e.to_string())
}

/// Parse a path id segment.
pub(crate) fn parse_id(raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|e| format!("invalid id {raw:?}: {e}"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase};
    use writeit_core::ports::TokenService;
    use writeit_infra::{
        InMemoryPostRepository, InMemoryUserRepository, JwtConfig, PostgresPostRepository,
        PostgresUserRepository,
    };

    use crate::state::AppState;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "handler-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "write-it-test".to_string(),
        }
    }

    pub fn state() -> AppState {
        AppState::in_memory(&jwt())
    }

    /// A connection whose first query fails like a dropped link.
    fn broken_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset by peer".to_owned())])
            .into_connection()
    }

    /// Posts backed by a failing database, users in memory.
    pub fn state_with_broken_posts() -> AppState {
        AppState::with_repositories(
            Arc::new(PostgresPostRepository::new(broken_db())),
            Arc::new(InMemoryUserRepository::new()),
            &jwt(),
        )
    }

    /// Users backed by a failing database, posts in memory.
    pub fn state_with_broken_users() -> AppState {
        AppState::with_repositories(
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(PostgresUserRepository::new(broken_db())),
            &jwt(),
        )
    }

    pub fn bearer(state: &AppState, user_id: i64) -> (&'static str, String) {
        let token = state
            .tokens
            .generate_token(user_id, "tester@example.com")
            .unwrap();
        ("Authorization", format!("Bearer {token}"))
    }

    /// Initialise the full route table over `state`.
    macro_rules! test_app {
        ($state:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new($state))
                    .configure(crate::handlers::configure_routes),
            )
            .await
        };
    }
    pub(crate) use test_app;
}
