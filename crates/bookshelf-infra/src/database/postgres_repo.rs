//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use bookshelf_core::domain::{Book, BookChanges, BookId, User};
use bookshelf_core::error::RepoError;
use bookshelf_core::ports::{BookRepository, UserRepository};

use super::entity::book::{self, Entity as BookEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL book repository.
pub type PostgresBookRepository = PostgresBaseRepository<BookEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn list(&self) -> Result<Vec<Book>, RepoError> {
        let result = BookEntity::find()
            .order_by_asc(book::Column::Id)
            .all(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: BookId, changes: BookChanges) -> Result<Option<Book>, RepoError> {
        let now: DateTimeWithTimeZone = Utc::now().into();

        let mut query = BookEntity::update_many()
            .col_expr(book::Column::UpdatedAt, Expr::value(now))
            .filter(book::Column::Id.eq(id));
        if let Some(title) = changes.title {
            query = query.col_expr(book::Column::Title, Expr::value(title));
        }
        if let Some(description) = changes.description {
            query = query.col_expr(book::Column::Description, Expr::value(description));
        }

        let updated = query
            .exec_with_returning(&*self.db)
            .await
            .map_err(map_db_err)?;

        Ok(updated.into_iter().next().map(Into::into))
    }
}
