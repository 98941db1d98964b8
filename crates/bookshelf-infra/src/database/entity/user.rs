//! User entity for SeaORM.
//!
//! Column names follow the legacy `users` table.

use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, column_name = "user_id")]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(column_name = "password")]
    pub password_hash: String,
    #[sea_orm(column_name = "firstname")]
    pub first_name: String,
    #[sea_orm(column_name = "lastname")]
    pub last_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for bookshelf_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            password_hash: model.password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
        }
    }
}

/// A new user leaves the id to the database sequence.
impl From<bookshelf_core::domain::NewUser> for ActiveModel {
    fn from(user: bookshelf_core::domain::NewUser) -> Self {
        Self {
            id: NotSet,
            username: Set(user.username),
            password_hash: Set(user.password_hash),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
        }
    }
}
