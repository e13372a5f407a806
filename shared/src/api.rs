use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Auth API Types
// ============================================================================

/// Body of both `POST /auth/register` and `POST /auth/login`.
///
/// Absent fields deserialize as empty strings so the server can answer with a
/// single "missing credentials" error instead of a JSON rejection.
#[derive(Clone, PartialEq, Serialize, Deserialize, Default, Validate)]
pub struct Credentials {
    /// Bounded by the `users.username` column width.
    #[validate(length(max = 255))]
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// True when either field is empty.
    pub fn is_incomplete(&self) -> bool {
        self.username.is_empty() || self.password.is_empty()
    }
}

// Keep the password out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Todo API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
}

/// Partial update; fields left as `None` are not touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

// ============================================================================
// Error Types
// ============================================================================

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_fields_default_to_empty() {
        let creds: Credentials = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(creds.username, "alice");
        assert!(creds.password.is_empty());
        assert!(creds.is_incomplete());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("alice", "hunter2");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_username_length_limit() {
        assert!(Credentials::new("a".repeat(255), "pw").validate().is_ok());
        assert!(Credentials::new("a".repeat(256), "pw").validate().is_err());
        // Counted in characters, matching the column.
        assert!(Credentials::new("é".repeat(255), "pw").validate().is_ok());
    }

    #[test]
    fn test_update_request_omits_untouched_fields() {
        let patch = UpdateTodoRequest {
            title: None,
            completed: Some(true),
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "completed": true }));
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let request = CreateTodoRequest {
            title: String::new(),
        };
        assert!(request.validate().is_err());

        let patch = UpdateTodoRequest {
            title: Some(String::new()),
            completed: None,
        };
        assert!(patch.validate().is_err());
        assert!(UpdateTodoRequest::default().validate().is_ok());
    }
}
