use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};

use crate::services::ClientError;
use crate::session::TokenStorage;

pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Token persisted in the browser's `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTokenStorage;

impl TokenStorage for LocalTokenStorage {
    fn load(&self) -> Result<Option<String>, ClientError> {
        match LocalStorage::get::<String>(AUTH_TOKEN_KEY) {
            Ok(token) => Ok(Some(token)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(ClientError::Storage(err.to_string())),
        }
    }

    fn save(&self, token: &str) -> Result<(), ClientError> {
        LocalStorage::set(AUTH_TOKEN_KEY, token).map_err(|e| ClientError::Storage(e.to_string()))
    }

    fn clear(&self) -> Result<(), ClientError> {
        LocalStorage::delete(AUTH_TOKEN_KEY);
        Ok(())
    }
}
