//! Client-side session state.
//!
//! The session is nothing more than "do we hold a token". There is no expiry
//! check here; the server rejects stale tokens and the UI surfaces that.

use std::cell::{Cell, RefCell};

use shared::api::{AuthResponse, Credentials, MessageResponse};

use crate::services::ClientError;

/// Durable storage for the single session token.
pub trait TokenStorage {
    fn load(&self) -> Result<Option<String>, ClientError>;
    fn save(&self, token: &str) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Remote auth endpoints.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError>;
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError>;
    async fn logout(&self) -> Result<MessageResponse, ClientError>;
}

type Listener = Box<dyn Fn(bool)>;

/// Owns the token lifecycle: restore on start, persist on login/register,
/// drop on logout.
///
/// Only the methods below change the authenticated flag. A subscribed
/// listener is told about every change as it happens.
pub struct SessionManager<S, A> {
    storage: S,
    api: A,
    authenticated: Cell<bool>,
    listener: RefCell<Option<Listener>>,
}

impl<S: TokenStorage, A: AuthApi> SessionManager<S, A> {
    /// Starts unauthenticated; call [`restore`](Self::restore) to pick up a
    /// stored token.
    pub fn new(storage: S, api: A) -> Self {
        Self {
            storage,
            api,
            authenticated: Cell::new(false),
            listener: RefCell::new(None),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.get()
    }

    pub fn subscribe(&self, listener: impl Fn(bool) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    fn set_authenticated(&self, value: bool) {
        self.authenticated.set(value);
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(value);
        }
    }

    /// Authenticated iff a token is stored. Unreadable storage counts as
    /// logged out.
    pub fn restore(&self) -> bool {
        let has_token = match self.storage.load() {
            Ok(token) => token.is_some(),
            Err(err) => {
                tracing::error!("Error checking auth status: {}", err);
                false
            }
        };
        self.set_authenticated(has_token);
        has_token
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let credentials = Credentials::new(username, password);
        let response = self.api.login(&credentials).await.map_err(|err| {
            tracing::error!("Login error: {}", err);
            err
        })?;
        self.accept(response)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let credentials = Credentials::new(username, password);
        let response = self.api.register(&credentials).await.map_err(|err| {
            tracing::error!("Register error: {}", err);
            err
        })?;
        self.accept(response)
    }

    fn accept(&self, response: AuthResponse) -> Result<(), ClientError> {
        if response.token.is_empty() {
            tracing::warn!("Auth response carried no token: {}", response.message);
            return Ok(());
        }

        self.storage.save(&response.token)?;
        self.set_authenticated(true);
        Ok(())
    }

    /// Local logout first, then a best-effort server notification.
    ///
    /// Never fails: whatever the server says, the client stays logged out.
    pub async fn logout(&self) {
        if let Err(err) = self.storage.clear() {
            tracing::error!("Failed to clear stored token: {}", err);
        }
        self.set_authenticated(false);

        if let Err(err) = self.api.logout().await {
            tracing::warn!(
                "Server logout failed, but local logout successful: {}",
                err
            );
        }
    }
}
