//! Errors surfaced by the admin client and stores.

use thiserror::Error;

/// Message shown when no bearer token is stored.
pub const MISSING_TOKEN_MESSAGE: &str = "Authentication token not found. Please log in again.";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No token in local storage; raised before any request is sent.
    #[error("missing auth token")]
    MissingToken,
    /// Non-2xx response. `message` is the backend's own explanation, if any.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Http { status: u16, message: Option<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for the user: the backend message when there is one, otherwise
    /// the caller's per-operation fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::MissingToken => MISSING_TOKEN_MESSAGE.to_string(),
            ApiError::Http {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Pull the human-readable message out of an error body.
///
/// The backend uses `message`; some routes answer with `error` instead.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|k| value.get(k).and_then(|v| v.as_str()))
        .map(String::from)
}
