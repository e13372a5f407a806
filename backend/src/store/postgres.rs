use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{
    pooled_connection::{
        deadpool::{Object, Pool},
        AsyncDieselConnectionManager,
    },
    AsyncPgConnection, RunQueryDsl,
};
use shared::api::UpdateTodoRequest;
use shared::models::Todo;
use uuid::Uuid;

use super::{CredentialStore, StoreError, StoreResult, TodoStore};
use crate::models::{NewTodo, NewUser, TodoChangeset, TodoRow, User};
use crate::schema::{todos, users};

pub type DbPool = Pool<AsyncPgConnection>;

/// Postgres-backed store.
///
/// Username uniqueness is the `users_username_key` constraint created by the
/// migrations; a violation surfaces as [`StoreError::DuplicateUsername`].
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn connect(database_url: &str) -> anyhow::Result<Self> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(manager)
            .max_size(10)
            .build()
            .context("Failed to create database pool")?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> StoreResult<Object<AsyncPgConnection>> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

fn translate_insert_error(err: DieselError) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::DuplicateUsername
        }
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let mut conn = self.conn().await?;

        let user = users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first::<User>(&mut *conn)
            .await
            .optional()?;

        Ok(user)
    }

    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut conn = self.conn().await?;

        let new_user = NewUser {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: Utc::now(),
        };

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result::<User>(&mut *conn)
            .await
            .map_err(translate_insert_error)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn find(&self, owner: Uuid) -> StoreResult<Vec<Todo>> {
        let mut conn = self.conn().await?;

        let rows = todos::table
            .filter(todos::user_id.eq(owner))
            .order_by(todos::created_at.asc())
            .select(TodoRow::as_select())
            .load::<TodoRow>(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, owner: Uuid, title: &str) -> StoreResult<Todo> {
        let mut conn = self.conn().await?;
        let now = Utc::now();

        let new_todo = NewTodo {
            id: Uuid::new_v4(),
            user_id: owner,
            title,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let row = diesel::insert_into(todos::table)
            .values(&new_todo)
            .returning(TodoRow::as_returning())
            .get_result::<TodoRow>(&mut *conn)
            .await?;

        Ok(row.into())
    }

    async fn find_one_and_update(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &UpdateTodoRequest,
    ) -> StoreResult<Option<Todo>> {
        let mut conn = self.conn().await?;

        let changes = TodoChangeset {
            title: patch.title.as_deref(),
            completed: patch.completed,
            updated_at: Utc::now(),
        };

        let row = diesel::update(
            todos::table
                .filter(todos::id.eq(id))
                .filter(todos::user_id.eq(owner)),
        )
        .set(&changes)
        .returning(TodoRow::as_returning())
        .get_result::<TodoRow>(&mut *conn)
        .await
        .optional()?;

        Ok(row.map(Into::into))
    }

    async fn find_one_and_delete(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Todo>> {
        let mut conn = self.conn().await?;

        let row = diesel::delete(
            todos::table
                .filter(todos::id.eq(id))
                .filter(todos::user_id.eq(owner)),
        )
        .returning(TodoRow::as_returning())
        .get_result::<TodoRow>(&mut *conn)
        .await
        .optional()?;

        Ok(row.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Detail;

    impl diesel::result::DatabaseErrorInformation for Detail {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_username_key\""
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            Some("users")
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            Some("users_username_key")
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[test]
    fn test_unique_violation_becomes_duplicate_username() {
        let err = DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, Box::new(Detail));
        assert!(matches!(
            translate_insert_error(err),
            StoreError::DuplicateUsername
        ));
    }

    #[test]
    fn test_other_errors_pass_through() {
        assert!(matches!(
            translate_insert_error(DieselError::NotFound),
            StoreError::Database(DieselError::NotFound)
        ));
    }

    #[test]
    fn test_connect_builds_lazy_pool() {
        // Pool creation does not open a connection.
        assert!(PgStore::connect("postgres://localhost/todos_test").is_ok());
    }
}
