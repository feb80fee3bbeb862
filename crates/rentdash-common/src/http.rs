//! Transport seam between the admin client and the network.
//!
//! The client builds [`ApiRequest`]s; a [`Transport`] turns them into real
//! HTTP calls (gloo-net in the browser, `test_util::MockTransport` in tests).

use std::fmt;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        })
    }
}

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// Ordered `(field, part)` pairs; a field may repeat.
    Multipart(Vec<(String, FormPart)>),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// A fully-resolved request. `url` is absolute.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Value for the `Authorization` header.
    pub authorization: Option<String>,
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests. Implementations only fail with [`ApiError::Network`];
/// status handling belongs to the client.
///
/// The futures are not `Send`: everything runs on the browser's event loop.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Source of the bearer token. Read before every call, never written here.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Fixed token, mostly for tests and tooling.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Multipart builder that keeps the field order stable.
#[derive(Debug, Default)]
pub struct FormBuilder {
    parts: Vec<(String, FormPart)>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, field: &str, value: impl ToString) -> Self {
        self.parts
            .push((field.to_string(), FormPart::Text(value.to_string())));
        self
    }

    pub fn text_if_present(self, field: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.text(field, v),
            None => self,
        }
    }

    pub fn file(mut self, field: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        self.parts.push((
            field.to_string(),
            FormPart::File {
                file_name: file_name.to_string(),
                mime: mime.to_string(),
                bytes,
            },
        ));
        self
    }

    pub fn build(self) -> RequestBody {
        RequestBody::Multipart(self.parts)
    }
}
