//! Application state - shared across all handlers.

use std::sync::Arc;

use writeit_core::ports::{PasswordService, PostRepository, TokenService, UserRepository};
use writeit_infra::database::connect;
use writeit_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemoryUserRepository, JwtConfig,
    JwtTokenService, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
///
/// Built once at startup; every worker gets a clone of the same handles.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory(&config.jwt);
        };

        match connect(db_config).await {
            Ok(conn) => {
                tracing::info!("Application state initialized (postgres)");
                Self::with_repositories(
                    Arc::new(PostgresPostRepository::new(conn.clone())),
                    Arc::new(PostgresUserRepository::new(conn)),
                    &config.jwt,
                )
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory(&config.jwt)
            }
        }
    }

    /// State backed by in-memory persistence services.
    pub fn in_memory(jwt: &JwtConfig) -> Self {
        Self::with_repositories(
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            jwt,
        )
    }

    pub fn with_repositories(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        jwt: &JwtConfig,
    ) -> Self {
        Self {
            posts,
            users,
            tokens: Arc::new(JwtTokenService::new(jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }
}
