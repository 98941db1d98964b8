//! SeaORM entities for the `users` and `books` tables.

pub mod book;
pub mod user;
