//! Domain entities - the core business objects.

mod book;
mod user;

pub use book::{Book, BookChanges, BookId, NewBook};
pub use user::{NewUser, User, UserId};
