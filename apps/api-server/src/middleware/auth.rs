//! Bearer token extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use bookshelf_core::domain::UserId;
use bookshelf_core::ports::{AuthError, TokenClaims};

use crate::middleware::error::{AppError, SERVER_ERROR};
use crate::state::AppState;

/// Authenticated user identity, decoded from a valid bearer token.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub expires_at: i64,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            first_name: claims.first_name,
            last_name: claims.last_name,
            expires_at: claims.exp,
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(AppError::internal(
                SERVER_ERROR,
                "AppState not found in app data",
            )));
        };

        let result = bearer_token(req)
            .and_then(|token| state.tokens.validate_token(token))
            .map(Identity::from)
            .map_err(AppError::from);

        ready(result)
    }
}
