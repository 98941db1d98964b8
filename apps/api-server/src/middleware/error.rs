//! Error handling - every failure becomes a `{"message": ...}` body.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use bookshelf_core::error::{DomainError, RepoError};
use bookshelf_core::ports::AuthError;
use bookshelf_shared::ErrorResponse;
use std::fmt;

/// Generic message for dependency failures without a more specific one.
pub const SERVER_ERROR: &str = "Server connection error";

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    /// A duplicate reported under a configured status code.
    Duplicate(StatusCode, String),
    /// A dependency failure. `detail` is logged, only `message` is returned.
    Internal { message: String, detail: String },
}

impl AppError {
    pub fn internal(message: impl Into<String>, detail: impl fmt::Display) -> Self {
        AppError::Internal {
            message: message.into(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Duplicate(status, msg) => write!(f, "Duplicate ({}): {}", status, msg),
            AppError::Internal { message, detail } => {
                write!(f, "Internal error: {} ({})", message, detail)
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Duplicate(status, _) => *status,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg)
            | AppError::Duplicate(_, msg) => ErrorResponse::new(msg.clone()),
            AppError::Internal { message, detail } => {
                tracing::error!(error = %detail, "{}", message);
                ErrorResponse::new(message.clone())
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, .. } => {
                AppError::NotFound(format!("{} not found", entity_type))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                AppError::internal(SERVER_ERROR, format!("database connection: {}", msg))
            }
            RepoError::Query(msg) => {
                AppError::internal(SERVER_ERROR, format!("database query: {}", msg))
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired => AppError::Unauthorized("Token expired".to_string()),
            AuthError::InvalidToken(detail) => {
                tracing::debug!("Rejected token: {}", detail);
                AppError::Unauthorized("Invalid token".to_string())
            }
            AuthError::MissingAuth => AppError::Unauthorized(
                "Please provide a valid Bearer token in the Authorization header".to_string(),
            ),
            other @ (AuthError::Signing(_) | AuthError::HashingError(_)) => {
                AppError::internal(SERVER_ERROR, other)
            }
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_internal_error_hides_detail() {
        let err = AppError::from(RepoError::Query("relation \"books\" does not exist".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, ErrorResponse::new(SERVER_ERROR));
    }

    #[test]
    fn test_duplicate_uses_configured_status() {
        let err = AppError::Duplicate(StatusCode::NOT_FOUND, "Username already exists".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_names_entity() {
        let err = AppError::from(DomainError::NotFound {
            entity_type: "Book",
            id: 9,
        });
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Book not found"));
    }
}
