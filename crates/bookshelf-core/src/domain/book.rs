use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

pub type BookId = i32;

/// Book entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub description: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub user_id: UserId,
}

impl NewBook {
    /// Attach a store-assigned id; both timestamps are set to `now`.
    pub fn with_id(self, id: BookId, now: DateTime<Utc>) -> Book {
        Book {
            id,
            title: self.title,
            description: self.description,
            user_id: self.user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a book. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl BookChanges {
    /// Build a change set, dropping empty strings.
    pub fn new(title: Option<String>, description: Option<String>) -> Self {
        Self {
            title: title.filter(|t| !t.is_empty()),
            description: description.filter(|d| !d.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Apply the changes to `book`, refreshing `updated_at`.
    pub fn apply(self, book: &mut Book, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        book.updated_at = now;
    }
}
