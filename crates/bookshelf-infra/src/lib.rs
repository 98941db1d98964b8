//! # Bookshelf Infrastructure
//!
//! Concrete implementations of the ports defined in `bookshelf-core`:
//! database repositories, token issuance and password hashing.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM. Without it
//!   only the in-memory repositories are available.

pub mod auth;
pub mod database;

pub use auth::{HashingPasswordService, JwtConfig, JwtTokenService, PasswordScheme};
pub use database::{DatabaseConfig, InMemoryBookRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
