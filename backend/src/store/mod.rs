//! Persistence seams for the auth core and the todo handlers.
//!
//! Handlers only see the [`CredentialStore`] and [`TodoStore`] traits. Two
//! implementations exist: [`PgStore`] for Postgres and [`MemoryStore`] for
//! development and tests. Both enforce username uniqueness themselves, so
//! handlers never need a check-then-insert.

use async_trait::async_trait;
use shared::api::UpdateTodoRequest;
use shared::models::Todo;
use thiserror::Error;
use uuid::Uuid;

use crate::models::User;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{DbPool, PgStore};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The username uniqueness constraint rejected an insert
    #[error("username already exists")]
    DuplicateUsername,

    /// Query failed
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    /// Could not get a connection
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Username and password hash records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive lookup.
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Insert a new user.
    ///
    /// Fails with [`StoreError::DuplicateUsername`] if the username is taken
    /// at the moment of the insert, even under concurrent calls.
    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User>;
}

/// Todo items, every operation scoped to one owner.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find(&self, owner: Uuid) -> StoreResult<Vec<Todo>>;

    async fn create(&self, owner: Uuid, title: &str) -> StoreResult<Todo>;

    /// `None` when no todo with `id` belongs to `owner`.
    async fn find_one_and_update(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &UpdateTodoRequest,
    ) -> StoreResult<Option<Todo>>;

    /// `None` when no todo with `id` belongs to `owner`.
    async fn find_one_and_delete(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Todo>>;
}
