//! Request validation extractors.
//!
//! These run before the handler body and short-circuit the request on
//! failure, so a handler taking [`ValidBook`] or [`ExistingBook`] only ever
//! sees validated input.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;

use bookshelf_core::DomainError;
use bookshelf_core::domain::{Book, BookId, NewBook};
use bookshelf_core::ports::BaseRepository;
use bookshelf_shared::dto::CreateBookRequest;

use crate::middleware::error::{AppError, SERVER_ERROR};
use crate::state::AppState;

/// Check a create request, failing on the first missing field in the order
/// `title`, `description`, `user_id`.
pub fn validate_create_book(req: CreateBookRequest) -> Result<NewBook, DomainError> {
    let title = required(req.title, "title")?;
    let description = required(req.description, "description")?;
    let user_id = req
        .user_id
        .filter(|id| *id > 0)
        .ok_or_else(|| missing("user_id"))?;

    Ok(NewBook {
        title,
        description,
        user_id,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, DomainError> {
    value.filter(|v| !v.is_empty()).ok_or_else(|| missing(field))
}

fn missing(field: &str) -> DomainError {
    DomainError::Validation(format!("Missing required field: {}", field))
}

fn parse_book_id(raw: Option<&str>) -> Result<BookId, AppError> {
    raw.and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid book id".to_string()))
}

/// A create-book body that passed [`validate_create_book`].
pub struct ValidBook(pub NewBook);

impl FromRequest for ValidBook {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<CreateBookRequest>::from_request(req, payload);

        Box::pin(async move {
            let body = body.await?;
            let book = validate_create_book(body.into_inner()).map_err(AppError::from)?;
            Ok(ValidBook(book))
        })
    }
}

/// The book addressed by the `{id}` path segment, looked up before the handler runs.
///
/// Rejects with 400 for a non-numeric id and 404 when no such book exists.
pub struct ExistingBook(pub Book);

impl FromRequest for ExistingBook {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let raw_id = req.match_info().get("id").map(str::to_owned);

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                AppError::internal(SERVER_ERROR, "AppState not found in app data")
            })?;
            let id = parse_book_id(raw_id.as_deref())?;

            match state.books.find_by_id(id).await? {
                Some(book) => Ok(ExistingBook(book)),
                None => Err(DomainError::NotFound {
                    entity_type: "Book",
                    id,
                }
                .into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: Option<&str>, description: Option<&str>, user_id: Option<i32>) -> CreateBookRequest {
        CreateBookRequest {
            title: title.map(String::from),
            description: description.map(String::from),
            user_id,
        }
    }

    fn message(err: DomainError) -> String {
        match err {
            DomainError::Validation(msg) => msg,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_request() {
        let book = validate_create_book(request(Some("T"), Some("D"), Some(1))).unwrap();
        assert_eq!(
            book,
            NewBook {
                title: "T".to_string(),
                description: "D".to_string(),
                user_id: 1,
            }
        );
    }

    #[test]
    fn test_first_missing_field_is_named() {
        let err = validate_create_book(request(None, None, None)).unwrap_err();
        assert_eq!(message(err), "Missing required field: title");

        let err = validate_create_book(request(Some("T"), Some(""), Some(1))).unwrap_err();
        assert_eq!(message(err), "Missing required field: description");

        let err = validate_create_book(request(Some("T"), Some("D"), None)).unwrap_err();
        assert_eq!(message(err), "Missing required field: user_id");
    }

    #[test]
    fn test_non_positive_user_id_is_rejected() {
        assert!(validate_create_book(request(Some("T"), Some("D"), Some(0))).is_err());
        assert!(validate_create_book(request(Some("T"), Some("D"), Some(-3))).is_err());
    }

    #[test]
    fn test_parse_book_id() {
        assert_eq!(parse_book_id(Some("12")).unwrap(), 12);
        assert!(matches!(
            parse_book_id(Some("abc")),
            Err(AppError::BadRequest(_))
        ));
        assert!(parse_book_id(None).is_err());
    }
}
