//! Authentication ports.

use crate::domain::{User, UserId};

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Expiry as a unix timestamp in seconds.
    pub exp: i64,
}

/// Signed token issuance and verification.
pub trait TokenService: Send + Sync {
    /// Issue a token for `user`.
    fn generate_token(&self, user: &User) -> Result<String, AuthError>;

    /// Verify signature, issuer and expiry, then decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}
