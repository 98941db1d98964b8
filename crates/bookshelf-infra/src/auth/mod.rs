//! Authentication implementations.

mod jwt;
mod password;

pub use jwt::{JwtConfig, JwtTokenService};
pub use password::{DEFAULT_BCRYPT_COST, HashingPasswordService, PasswordScheme};
