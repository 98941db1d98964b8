#[cfg(feature = "postgres")]
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::sea_query::{Index, IndexCreateStatement};
#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, DbErr, Schema};

/// Configuration for the main database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Upper bound on waiting for a pooled connection.
    pub acquire_timeout: Duration,
    /// Create missing tables from the entity definitions at startup.
    pub create_schema: bool,
}

/// Name of the unique index backing username uniqueness. Matches the name
/// Postgres gives a `UNIQUE` column constraint, so either one satisfies it.
#[cfg(feature = "postgres")]
pub const USERNAME_INDEX: &str = "users_username_key";

/// Handle to the connection pool.
///
/// Constructed once at startup, shared through application state and
/// closed with [`DatabaseConnections::close`] after the server stops.
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    pub main: Arc<DbConn>,
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Open the pool from configuration.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connections...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!("Main database connected (pool: {})", config.max_connections);

        let connections = Self {
            main: Arc::new(main),
        };
        if config.create_schema {
            connections.ensure_schema().await?;
        }
        connections.ensure_username_index().await.inspect_err(|e| {
            tracing::error!("Cannot enforce unique usernames on `users`: {}", e);
        })?;

        Ok(connections)
    }

    /// Create the `users` and `books` tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        use super::entity::{book, user};

        let backend = self.main.get_database_backend();
        let schema = Schema::new(backend);

        let statements = [
            schema
                .create_table_from_entity(user::Entity)
                .if_not_exists()
                .to_owned(),
            schema
                .create_table_from_entity(book::Entity)
                .if_not_exists()
                .to_owned(),
        ];

        for statement in &statements {
            self.main.execute(backend.build(statement)).await?;
        }

        tracing::info!("Database schema ensured");
        Ok(())
    }

    /// Create the unique username index if missing.
    ///
    /// Registration relies on the store rejecting a second row with the same
    /// username, and legacy `users` tables carry no such constraint.
    pub async fn ensure_username_index(&self) -> Result<(), DbErr> {
        let backend = self.main.get_database_backend();
        self.main.execute(backend.build(&username_index())).await?;

        tracing::debug!(index = USERNAME_INDEX, "Username index ensured");
        Ok(())
    }

    /// Drain and close the pool.
    pub async fn close(&self) -> Result<(), DbErr> {
        self.main.close_by_ref().await?;
        tracing::info!("Database connections closed");
        Ok(())
    }
}

#[cfg(feature = "postgres")]
fn username_index() -> IndexCreateStatement {
    use super::entity::user;

    Index::create()
        .if_not_exists()
        .unique()
        .name(USERNAME_INDEX)
        .table(user::Entity)
        .col(user::Column::Username)
        .to_owned()
}
