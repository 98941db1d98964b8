//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Data is lost on process restart. Ids are assigned from a counter starting
//! at 1, mirroring a database sequence.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use bookshelf_core::domain::{Book, BookChanges, BookId, NewBook, NewUser, User, UserId};
use bookshelf_core::error::RepoError;
use bookshelf_core::ports::{BaseRepository, BookRepository, UserRepository};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-memory user store with a unique index on `username`.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, UserId, NewUser> for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|u| u.username == new.username) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint on username {:?}",
                new.username
            )));
        }

        let id = table.allocate_id();
        let user = new.with_id(id);
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), RepoError> {
        match self.table.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }
}

/// In-memory book store.
#[derive(Default)]
pub struct InMemoryBookRepository {
    table: RwLock<Table<Book>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Book, BookId, NewBook> for InMemoryBookRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, new: NewBook) -> Result<Book, RepoError> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let book = new.with_id(id, Utc::now());
        table.rows.insert(id, book.clone());
        Ok(book)
    }

    async fn delete(&self, id: BookId) -> Result<(), RepoError> {
        match self.table.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list(&self) -> Result<Vec<Book>, RepoError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn update(&self, id: BookId, changes: BookChanges) -> Result<Option<Book>, RepoError> {
        let mut table = self.table.write().await;
        let Some(book) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        changes.apply(book, Utc::now());
        Ok(Some(book.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        }
    }

    fn new_book(title: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            description: "D".to_string(),
            user_id: 1,
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        let first = repo.insert(new_user("u1")).await.unwrap();
        assert_eq!(first.id, 1);

        let err = repo.insert(new_user("u1")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));

        let found = repo.find_by_username("u1").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(repo.find_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_books_are_listed_in_insertion_order() {
        let repo = InMemoryBookRepository::new();
        assert!(repo.list().await.unwrap().is_empty());

        repo.insert(new_book("first")).await.unwrap();
        repo.insert(new_book("second")).await.unwrap();

        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_update_missing_book_returns_none() {
        let repo = InMemoryBookRepository::new();
        let changes = BookChanges::new(Some("T".to_string()), None);
        assert!(repo.update(42, changes).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let repo = InMemoryBookRepository::new();
        let book = repo.insert(new_book("T")).await.unwrap();

        repo.delete(book.id).await.unwrap();
        assert!(matches!(
            repo.delete(book.id).await.unwrap_err(),
            RepoError::NotFound
        ));
    }
}
