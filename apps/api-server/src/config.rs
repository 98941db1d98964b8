//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use actix_web::http::StatusCode;
use bookshelf_infra::auth::DEFAULT_BCRYPT_COST;
use bookshelf_infra::{DatabaseConfig, JwtConfig, PasswordScheme};

/// Configuration errors. Any of these aborts startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub password_scheme: PasswordScheme,
    /// Status returned when a username is already taken: 409, or 404 for
    /// clients that depend on the legacy behavior.
    pub duplicate_username_status: StatusCode,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `get`, which maps a variable name to its value.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10)?,
                min_connections: parse_or(&get, "DB_MIN_CONNECTIONS", 1)?,
                acquire_timeout: Duration::from_secs(parse_or(
                    &get,
                    "DB_ACQUIRE_TIMEOUT_SECS",
                    10,
                )?),
                create_schema: parse_or(&get, "DB_CREATE_SCHEMA", false)?,
            }),
            None => None,
        };

        let secret = get("SECRET_KEY")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SECRET_KEY"))?;

        let jwt = JwtConfig {
            secret,
            expiration_seconds: parse_or(&get, "JWT_EXPIRATION_SECONDS", 900)?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "bookshelf-api".to_string()),
        };
        if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&jwt.expiration_seconds) {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRATION_SECONDS",
                value: jwt.expiration_seconds.to_string(),
            });
        }

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "PORT", 4000)?,
            database,
            jwt,
            password_scheme: password_scheme(&get)?,
            duplicate_username_status: duplicate_username_status(&get)?,
        })
    }
}

/// Longest accepted token lifetime: one year.
const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

fn parse_or<F, T>(get: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn password_scheme<F>(get: &F) -> Result<PasswordScheme, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let hasher = get("PASSWORD_HASHER").unwrap_or_else(|| "bcrypt".to_string());

    match hasher.to_lowercase().as_str() {
        "bcrypt" => {
            let cost: u32 = parse_or(get, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
            if !(4..=31).contains(&cost) {
                return Err(ConfigError::Invalid {
                    key: "BCRYPT_COST",
                    value: cost.to_string(),
                });
            }
            Ok(PasswordScheme::Bcrypt { cost })
        }
        "argon2" => Ok(PasswordScheme::Argon2),
        _ => Err(ConfigError::Invalid {
            key: "PASSWORD_HASHER",
            value: hasher,
        }),
    }
}

fn duplicate_username_status<F>(get: &F) -> Result<StatusCode, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_or(get, "DUPLICATE_USERNAME_STATUS", 409u16)? {
        409 => Ok(StatusCode::CONFLICT),
        404 => Ok(StatusCode::NOT_FOUND),
        other => Err(ConfigError::Invalid {
            key: "DUPLICATE_USERNAME_STATUS",
            value: other.to_string(),
        }),
    }
}
