//! Application state - shared across all handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use bookshelf_core::ports::{BookRepository, PasswordService, TokenService, UserRepository};
use bookshelf_infra::{
    HashingPasswordService, InMemoryBookRepository, InMemoryUserRepository, JwtTokenService,
};

#[cfg(feature = "postgres")]
use bookshelf_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use bookshelf_infra::database::{PostgresBookRepository, PostgresUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub books: Arc<dyn BookRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub duplicate_username_status: StatusCode,
    #[cfg(feature = "postgres")]
    db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state, opening the database pool if configured.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                let connections = Arc::new(DatabaseConnections::init(db_config).await?);
                let users = Arc::new(PostgresUserRepository::new(connections.main.clone()));
                let books = Arc::new(PostgresBookRepository::new(connections.main.clone()));

                tracing::info!("Application state initialized");
                return Ok(Self {
                    db: Some(connections),
                    ..Self::with_repositories(config, users, books)
                });
            }
        }

        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        Ok(Self::in_memory(config))
    }

    /// State backed by the in-memory repositories.
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::with_repositories(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryBookRepository::new()),
        )
    }

    fn with_repositories(
        config: &AppConfig,
        users: Arc<dyn UserRepository>,
        books: Arc<dyn BookRepository>,
    ) -> Self {
        Self {
            users,
            books,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(HashingPasswordService::new(config.password_scheme)),
            duplicate_username_status: config.duplicate_username_status,
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    /// Release external resources. Call once the server has stopped.
    pub async fn shutdown(self) {
        #[cfg(feature = "postgres")]
        {
            if let Some(connections) = self.db {
                if let Err(e) = connections.close().await {
                    tracing::error!("Failed to close database connections: {}", e);
                }
            }
        }
    }
}
