//! JWT token service implementation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use bookshelf_core::domain::User;
use bookshelf_core::ports::{AuthError, TokenClaims, TokenService};

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds.
    pub expiration_seconds: i64,
    pub issuer: String,
}

/// Wire format of the claims.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    id: i32,
    first_name: String,
    last_name: String,
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
}

/// HS256 JWT token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.leeway = 0;

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = TimeDelta::try_seconds(self.config.expiration_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AuthError::Signing(format!(
                    "token lifetime of {}s is out of range",
                    self.config.expiration_seconds
                ))
            })?;

        let claims = Claims {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(TokenClaims {
            user_id: token_data.claims.id,
            first_name: token_data.claims.first_name,
            last_name: token_data.claims.last_name,
            exp: token_data.claims.exp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_seconds: 900,
            issuer: "test-issuer".to_string(),
        }
    }

    fn test_user() -> User {
        User {
            id: 42,
            username: "u1".to_string(),
            password_hash: "hash".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        }
    }

    #[test]
    fn test_validate_token_success() {
        let service = JwtTokenService::new(test_config());

        let token = service.generate_token(&test_user()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.first_name, "A");
        assert_eq!(claims.last_name, "B");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_expiry_is_in_seconds() {
        let service = JwtTokenService::new(test_config());
        let before = Utc::now().timestamp();

        let token = service.generate_token(&test_user()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert!(claims.exp >= before + 900);
        assert!(claims.exp <= Utc::now().timestamp() + 900);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_seconds: -60,
            ..test_config()
        });

        let token = service.generate_token(&test_user()).unwrap();

        assert!(matches!(
            service.validate_token(&token).unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = JwtTokenService::new(test_config());

        let result = service.validate_token("invalid-token");

        assert!(matches!(result.unwrap_err(), AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtTokenService::new(JwtConfig {
            secret: "other-secret".to_string(),
            ..test_config()
        });
        let verifier = JwtTokenService::new(test_config());

        let token = issuer.generate_token(&test_user()).unwrap();

        assert!(matches!(
            verifier.validate_token(&token).unwrap_err(),
            AuthError::InvalidToken(_)
        ));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let service1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        });
        let service2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        });

        let token = service1.generate_token(&test_user()).unwrap();

        assert!(service2.validate_token(&token).is_err());
    }

    #[test]
    fn test_out_of_range_lifetime_fails_to_sign() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_seconds: i64::MAX,
            ..test_config()
        });

        let result = service.generate_token(&test_user());

        assert!(matches!(result.unwrap_err(), AuthError::Signing(_)));
    }
}
