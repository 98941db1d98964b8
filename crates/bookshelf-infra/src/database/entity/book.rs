//! Book entity for SeaORM.
//!
//! `user_id` is a plain column: ownership is not enforced by a foreign key.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "book_id")]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub user_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Book.
impl From<Model> for bookshelf_core::domain::Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            user_id: model.user_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// A new book gets both timestamps set to the insert time.
impl From<bookshelf_core::domain::NewBook> for ActiveModel {
    fn from(book: bookshelf_core::domain::NewBook) -> Self {
        let now: DateTimeWithTimeZone = Utc::now().into();
        Self {
            id: NotSet,
            title: Set(book.title),
            description: Set(book.description),
            user_id: Set(book.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
