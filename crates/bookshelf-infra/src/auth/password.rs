//! Password hashing: bcrypt by default, Argon2 as an alternative.
//!
//! Verification picks the algorithm from the stored hash, so hashes written
//! under either scheme keep verifying after the configured scheme changes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use bookshelf_core::ports::{AuthError, PasswordService};

/// Work factor used by the legacy service.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Scheme used for new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordScheme {
    Bcrypt { cost: u32 },
    Argon2,
}

impl Default for PasswordScheme {
    fn default() -> Self {
        Self::Bcrypt {
            cost: DEFAULT_BCRYPT_COST,
        }
    }
}

/// Salted adaptive password hashing.
pub struct HashingPasswordService {
    scheme: PasswordScheme,
    argon2: Argon2<'static>,
}

impl HashingPasswordService {
    pub fn new(scheme: PasswordScheme) -> Self {
        Self {
            scheme,
            argon2: Argon2::default(),
        }
    }

    fn is_argon2_hash(hash: &str) -> bool {
        hash.starts_with("$argon2")
    }
}

impl Default for HashingPasswordService {
    fn default() -> Self {
        Self::new(PasswordScheme::default())
    }
}

impl PasswordService for HashingPasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        match self.scheme {
            PasswordScheme::Bcrypt { cost } => {
                bcrypt::hash(password, cost).map_err(|e| AuthError::HashingError(e.to_string()))
            }
            PasswordScheme::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);

                self.argon2
                    .hash_password(password.as_bytes(), &salt)
                    .map(|h| h.to_string())
                    .map_err(|e| AuthError::HashingError(e.to_string()))
            }
        }
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        if Self::is_argon2_hash(hash) {
            let parsed_hash =
                PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

            return Ok(self
                .argon2
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }

        bcrypt::verify(password, hash).map_err(|e| AuthError::HashingError(e.to_string()))
    }
}
