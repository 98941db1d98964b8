//! HTTP handlers and route configuration.

mod auth;
mod books;
mod health;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    }))
    // Public routes
    .route("/test", web::get().to(health::smoke_test))
    .route("/health", web::get().to(health::health_check))
    // Auth routes
    .service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me)),
    )
    // Book routes
    .service(
        web::scope("/books")
            .route("", web::get().to(books::list_books))
            .route("", web::post().to(books::create_book))
            .route("/{id}", web::get().to(books::get_book))
            .route("/{id}", web::put().to(books::update_book))
            .route("/{id}", web::delete().to(books::delete_book)),
    );
}
