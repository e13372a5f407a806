//! Todo list API server.
//!
//! Username/password accounts, stateless JWT bearer tokens, and owner-scoped
//! todo CRUD on top of a pluggable store.

use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
mod schema;
pub mod store;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::store::{CredentialStore, MemoryStore, PgStore, TodoStore};

pub use routes::create_app;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn CredentialStore>,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, tokens: TokenService, hasher: PasswordHasher) -> Self
    where
        S: CredentialStore + TodoStore + 'static,
    {
        Self {
            users: store.clone(),
            todos: store,
            tokens: Arc::new(tokens),
            hasher,
        }
    }

    /// Wire up state from configuration, choosing Postgres when a database
    /// URL is configured and the in-memory store otherwise.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl);
        let hasher = PasswordHasher::new(config.bcrypt_cost);

        let state = match &config.database_url {
            Some(url) => {
                tracing::info!("Using Postgres store");
                Self::new(Arc::new(PgStore::connect(url)?), tokens, hasher)
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
                Self::new(Arc::new(MemoryStore::new()), tokens, hasher)
            }
        };

        Ok(state)
    }
}
