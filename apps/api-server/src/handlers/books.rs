//! Book handlers.
//!
//! Id-scoped routes take an [`ExistingBook`], so the handler body only runs
//! once the addressed book is known to exist.

use actix_web::{HttpResponse, web};

use bookshelf_core::domain::{Book, BookChanges};
use bookshelf_core::error::RepoError;
use bookshelf_core::ports::{BaseRepository, BookRepository};
use bookshelf_shared::dto::{BookResponse, UpdateBookRequest};
use bookshelf_shared::{DataResponse, MessageResponse};

use crate::middleware::error::{AppError, AppResult, SERVER_ERROR};
use crate::middleware::validation::{ExistingBook, ValidBook};
use crate::state::AppState;

fn book_response(book: Book) -> BookResponse {
    BookResponse {
        id: book.id,
        title: book.title,
        description: book.description,
        user_id: book.user_id,
        created_at: book.created_at,
        updated_at: book.updated_at,
    }
}

fn book_not_found() -> AppError {
    AppError::NotFound("Book not found".to_string())
}

/// GET /books
pub async fn list_books(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let books = state
        .books
        .list()
        .await
        .map_err(|e| AppError::internal(SERVER_ERROR, e))?;

    let data: Vec<BookResponse> = books.into_iter().map(book_response).collect();
    Ok(HttpResponse::Ok().json(DataResponse::new(data)))
}

/// GET /books/{id}
pub async fn get_book(
    state: web::Data<AppState>,
    ExistingBook(book): ExistingBook,
) -> AppResult<HttpResponse> {
    // Re-read: the row may have been deleted since the existence check.
    let book = state
        .books
        .find_by_id(book.id)
        .await
        .map_err(|e| AppError::internal(SERVER_ERROR, e))?
        .ok_or_else(book_not_found)?;

    Ok(HttpResponse::Ok().json(DataResponse::new(vec![book_response(book)])))
}

/// POST /books
pub async fn create_book(
    state: web::Data<AppState>,
    ValidBook(new_book): ValidBook,
) -> AppResult<HttpResponse> {
    let book = state
        .books
        .insert(new_book)
        .await
        .map_err(|e| AppError::internal("Server could not create book", e))?;

    tracing::info!(book_id = book.id, user_id = book.user_id, "Book created");

    Ok(HttpResponse::Ok().json(DataResponse::with_message(
        book_response(book),
        "Book created successfully",
    )))
}

/// PUT /books/{id}
pub async fn update_book(
    state: web::Data<AppState>,
    ExistingBook(book): ExistingBook,
    body: web::Json<UpdateBookRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let changes = BookChanges::new(req.title, req.description);
    if changes.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let updated = state
        .books
        .update(book.id, changes)
        .await
        .map_err(|e| AppError::internal(SERVER_ERROR, e))?
        .ok_or_else(book_not_found)?;

    tracing::info!(book_id = updated.id, "Book updated");

    Ok(HttpResponse::Ok().json(DataResponse::with_message(
        book_response(updated),
        "Book updated successfully",
    )))
}

/// DELETE /books/{id}
pub async fn delete_book(
    state: web::Data<AppState>,
    ExistingBook(book): ExistingBook,
) -> AppResult<HttpResponse> {
    match state.books.delete(book.id).await {
        Ok(()) => {}
        Err(RepoError::NotFound) => return Err(book_not_found()),
        Err(e) => return Err(AppError::internal(SERVER_ERROR, e)),
    }

    tracing::info!(book_id = book.id, "Book deleted");

    Ok(HttpResponse::Ok().json(MessageResponse::new("Book deleted successfully")))
}
