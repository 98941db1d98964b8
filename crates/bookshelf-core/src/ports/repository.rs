use async_trait::async_trait;

use crate::domain::{Book, BookChanges, BookId, NewBook, NewUser, User, UserId};
use crate::error::RepoError;

/// Generic repository trait shared by every stored entity.
///
/// `T` is the stored entity, `ID` its key and `N` the not-yet-stored form.
#[async_trait]
pub trait BaseRepository<T, ID, N>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity; the store assigns the ID.
    ///
    /// Unique-constraint violations surface as [`RepoError::Constraint`].
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Delete an entity by its ID. [`RepoError::NotFound`] if nothing was deleted.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, UserId, NewUser> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Book repository.
#[async_trait]
pub trait BookRepository: BaseRepository<Book, BookId, NewBook> {
    /// All books in storage order.
    async fn list(&self) -> Result<Vec<Book>, RepoError>;

    /// Apply `changes` and refresh `updated_at`. `None` if the book is gone.
    async fn update(&self, id: BookId, changes: BookChanges) -> Result<Option<Book>, RepoError>;
}
