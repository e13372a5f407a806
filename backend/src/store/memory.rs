use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use shared::api::UpdateTodoRequest;
use shared::models::Todo;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialStore, StoreError, StoreResult, TodoStore};
use crate::models::User;

/// In-process store used for development and tests.
///
/// Users are keyed by username, so the existence check and the insert in
/// [`CredentialStore::create`] happen under one write lock.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    todos: RwLock<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(username) {
            return Err(StoreError::DuplicateUsername);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn find(&self, owner: Uuid) -> StoreResult<Vec<Todo>> {
        Ok(self
            .todos
            .read()
            .await
            .iter()
            .filter(|todo| todo.user_id == owner)
            .cloned()
            .collect())
    }

    async fn create(&self, owner: Uuid, title: &str) -> StoreResult<Todo> {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4(),
            user_id: owner,
            title: title.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        };
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn find_one_and_update(
        &self,
        id: Uuid,
        owner: Uuid,
        patch: &UpdateTodoRequest,
    ) -> StoreResult<Option<Todo>> {
        let mut todos = self.todos.write().await;
        let Some(todo) = todos
            .iter_mut()
            .find(|todo| todo.id == id && todo.user_id == owner)
        else {
            return Ok(None);
        };

        if let Some(title) = &patch.title {
            todo.title = title.clone();
        }
        if let Some(completed) = patch.completed {
            todo.completed = completed;
        }
        todo.updated_at = Utc::now();

        Ok(Some(todo.clone()))
    }

    async fn find_one_and_delete(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Todo>> {
        let mut todos = self.todos.write().await;
        let position = todos
            .iter()
            .position(|todo| todo.id == id && todo.user_id == owner);
        Ok(position.map(|idx| todos.remove(idx)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let store = MemoryStore::new();
        let created = CredentialStore::create(&store, "alice", "hash").await.unwrap();

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let store = MemoryStore::new();
        CredentialStore::create(&store, "alice", "hash").await.unwrap();

        assert!(store.find_by_username("Alice").await.unwrap().is_none());
        assert!(CredentialStore::create(&store, "Alice", "hash").await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryStore::new();
        CredentialStore::create(&store, "alice", "first").await.unwrap();

        let result = CredentialStore::create(&store, "alice", "second").await;
        assert!(matches!(result, Err(StoreError::DuplicateUsername)));

        let kept = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(kept.password_hash, "first");
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_one() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    CredentialStore::create(store.as_ref(), "bob", &format!("hash-{}", i)).await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StoreError::DuplicateUsername) => {}
                Err(other) => panic!("unexpected error: {:?}", other),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_todos_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let todo = TodoStore::create(&store, alice, "buy milk").await.unwrap();
        TodoStore::create(&store, bob, "walk dog").await.unwrap();

        let alice_todos = store.find(alice).await.unwrap();
        assert_eq!(alice_todos.len(), 1);
        assert_eq!(alice_todos[0].title, "buy milk");
        assert!(!alice_todos[0].completed);

        let patch = UpdateTodoRequest {
            title: None,
            completed: Some(true),
        };
        assert!(store
            .find_one_and_update(todo.id, bob, &patch)
            .await
            .unwrap()
            .is_none());
        assert!(store.find_one_and_delete(todo.id, bob).await.unwrap().is_none());

        let updated = store
            .find_one_and_update(todo.id, alice, &patch)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "buy milk");

        let deleted = store.find_one_and_delete(todo.id, alice).await.unwrap();
        assert_eq!(deleted.map(|t| t.id), Some(todo.id));
        assert!(store.find(alice).await.unwrap().is_empty());
    }
}
