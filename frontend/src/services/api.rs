use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::api::{
    AuthResponse, CreateTodoRequest, Credentials, ErrorResponse, MessageResponse,
    UpdateTodoRequest,
};
use shared::models::Todo;
use uuid::Uuid;

use crate::services::storage::LocalTokenStorage;
use crate::session::{AuthApi, TokenStorage};

pub const API_BASE_URL: &str = match option_env!("API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:5001/api",
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Non-2xx answer; `message` is the server's own text when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("{message}")]
    Network { message: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn from_status(status: u16, body: Option<ErrorResponse>, fallback: &str) -> Self {
        let message = body
            .map(|body| body.message)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Self::Server { status, message }
    }

    pub fn network(fallback: &str) -> Self {
        Self::Network {
            message: fallback.to_string(),
        }
    }

    /// The server refused the token (missing, bad signature or expired).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Server { status: 401 | 403, .. })
    }
}

pub fn bearer_value(token: Option<&str>) -> Option<String> {
    token
        .filter(|token| !token.is_empty())
        .map(|token| format!("Bearer {}", token))
}

async fn read<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, ClientError> {
    if !response.ok() {
        let status = response.status();
        let body = response.json::<ErrorResponse>().await.ok();
        return Err(ClientError::from_status(status, body, fallback));
    }

    response.json().await.map_err(|e| {
        tracing::error!("Failed to parse response: {:?}", e);
        ClientError::network(fallback)
    })
}

async fn send(builder: RequestBuilder, fallback: &str) -> Result<Response, ClientError> {
    builder.send().await.map_err(|e| {
        tracing::error!("Request failed: {:?}", e);
        ClientError::network(fallback)
    })
}

async fn send_json<B: serde::Serialize>(
    builder: RequestBuilder,
    body: &B,
    fallback: &str,
) -> Result<Response, ClientError> {
    let request = builder.json(body).map_err(|e| {
        tracing::error!("Failed to serialize request: {:?}", e);
        ClientError::network(fallback)
    })?;

    request.send().await.map_err(|e| {
        tracing::error!("Request failed: {:?}", e);
        ClientError::network(fallback)
    })
}

/// HTTP client for the backend. The stored token is read on every request,
/// so a login or logout takes effect immediately.
pub struct ApiService {
    base_url: String,
    storage: LocalTokenStorage,
}

impl ApiService {
    pub fn new(storage: LocalTokenStorage) -> Self {
        Self::with_base_url(API_BASE_URL, storage)
    }

    pub fn with_base_url(base_url: impl Into<String>, storage: LocalTokenStorage) -> Self {
        Self {
            base_url: base_url.into(),
            storage,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let token = match self.storage.load() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("Could not read stored token: {}", err);
                None
            }
        };

        match bearer_value(token.as_deref()) {
            Some(value) => builder.header("Authorization", &value),
            None => builder,
        }
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        const FALLBACK: &str = "Failed to fetch todos";
        let response = send(self.authorize(Request::get(&self.url("/todos"))), FALLBACK).await?;
        read(response, FALLBACK).await
    }

    pub async fn create_todo(&self, title: &str) -> Result<Todo, ClientError> {
        const FALLBACK: &str = "Failed to create todo";
        let body = CreateTodoRequest {
            title: title.to_string(),
        };
        let builder = self.authorize(Request::post(&self.url("/todos")));
        let response = send_json(builder, &body, FALLBACK).await?;
        read(response, FALLBACK).await
    }

    pub async fn update_todo(
        &self,
        id: Uuid,
        update: &UpdateTodoRequest,
    ) -> Result<Todo, ClientError> {
        const FALLBACK: &str = "Failed to update todo";
        let builder = self.authorize(Request::put(&self.url(&format!("/todos/{}", id))));
        let response = send_json(builder, update, FALLBACK).await?;
        read(response, FALLBACK).await
    }

    pub async fn delete_todo(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        const FALLBACK: &str = "Failed to delete todo";
        let builder = self.authorize(Request::delete(&self.url(&format!("/todos/{}", id))));
        let response = send(builder, FALLBACK).await?;
        read(response, FALLBACK).await
    }
}

impl AuthApi for ApiService {
    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        const FALLBACK: &str = "Registration failed";
        let builder = Request::post(&self.url("/auth/register"));
        let response = send_json(builder, credentials, FALLBACK).await?;
        read(response, FALLBACK).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        const FALLBACK: &str = "Login failed";
        let builder = Request::post(&self.url("/auth/login"));
        let response = send_json(builder, credentials, FALLBACK).await?;
        read(response, FALLBACK).await
    }

    async fn logout(&self) -> Result<MessageResponse, ClientError> {
        const FALLBACK: &str = "Logout failed";
        let builder = self.authorize(Request::post(&self.url("/auth/logout")));
        let response = send(builder, FALLBACK).await?;
        read(response, FALLBACK).await
    }
}
