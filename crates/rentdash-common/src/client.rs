//! Bearer-authenticated admin API client.
//!
//! Every call reads the token first and fails with
//! [`ApiError::MissingToken`] before touching the transport when there is
//! none. Non-2xx responses become [`ApiError::Http`] carrying the backend's
//! message, and `{ "data": ... }` envelopes are unwrapped.

use std::sync::Arc;

use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{extract_message, ApiError};
use crate::http::{ApiRequest, Method, RequestBody, TokenSource, Transport};

pub struct AdminClient<T> {
    transport: T,
    config: ApiConfig,
    tokens: Arc<dyn TokenSource>,
}

fn auth_header(token: &str) -> String {
    format!("Bearer {token}")
}

/// Strip a `{ "data": ... }` wrapper if the route uses one.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

impl<T: Transport> AdminClient<T> {
    pub fn new(transport: T, config: ApiConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            transport,
            config,
            tokens,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one request and return the (unwrapped) JSON body.
    ///
    /// An empty 2xx body yields `Value::Null`.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: RequestBody,
    ) -> Result<Value, ApiError> {
        let token = self
            .tokens
            .token()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApiError::MissingToken)?;

        let request = ApiRequest {
            method,
            url: self.config.url(path),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            authorization: Some(auth_header(&token)),
            body,
        };
        log::debug!("{method} {path}");
        let resp = self.transport.send(request).await?;

        if !resp.ok() {
            log::warn!("{method} {path} -> HTTP {}", resp.status);
            return Err(ApiError::Http {
                status: resp.status,
                message: extract_message(&resp.body),
            });
        }
        if resp.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        let value: Value = serde_json::from_str(&resp.body)?;
        Ok(unwrap_envelope(value))
    }

    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        self.execute(Method::Get, path, query, RequestBody::Empty)
            .await
    }

    pub async fn post(&self, path: &str, body: RequestBody) -> Result<Value, ApiError> {
        self.execute(Method::Post, path, &[], body).await
    }

    pub async fn patch(&self, path: &str, body: RequestBody) -> Result<Value, ApiError> {
        self.execute(Method::Patch, path, &[], body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(Method::Delete, path, &[], RequestBody::Empty)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ApiResponse, StaticToken};
    use crate::test_util::MockTransport;
    use futures::executor::block_on;

    fn client(token: Option<&str>) -> AdminClient<MockTransport> {
        AdminClient::new(
            MockTransport::new(),
            ApiConfig::new("https://api.test"),
            Arc::new(StaticToken(token.map(String::from))),
        )
    }

    #[test]
    fn missing_token_never_reaches_transport() {
        let c = client(None);
        let err = block_on(c.get("/api/v1/admin/properties", &[])).unwrap_err();
        assert_eq!(err, ApiError::MissingToken);
        assert!(c.transport().requests().is_empty());
    }

    #[test]
    fn sends_bearer_and_absolute_url() {
        let c = client(Some("tok-1"));
        c.transport()
            .push_response(ApiResponse::new(200, r#"{"data":[1,2]}"#));
        let v = block_on(c.get("/api/v1/admin/search-apartment", &[("searchTerm", "lekki")]))
            .unwrap();
        assert_eq!(v, serde_json::json!([1, 2]));

        let reqs = c.transport().requests();
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].url, "https://api.test/api/v1/admin/search-apartment");
        assert_eq!(reqs[0].authorization.as_deref(), Some("Bearer tok-1"));
        assert_eq!(reqs[0].query, vec![("searchTerm".into(), "lekki".into())]);
    }

    #[test]
    fn error_status_carries_backend_message() {
        let c = client(Some("tok"));
        c.transport()
            .push_response(ApiResponse::new(404, r#"{"message":"Property not found"}"#));
        let err = block_on(c.delete("/api/v1/admin/properties/p9")).unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 404,
                message: Some("Property not found".into())
            }
        );
    }

    #[test]
    fn empty_success_body_is_null() {
        let c = client(Some("tok"));
        c.transport().push_response(ApiResponse::new(204, ""));
        assert_eq!(block_on(c.delete("/x")).unwrap(), Value::Null);
    }

    #[test]
    fn garbage_success_body_is_decode_error() {
        let c = client(Some("tok"));
        c.transport().push_response(ApiResponse::new(200, "<html>"));
        assert!(matches!(block_on(c.get("/x", &[])), Err(ApiError::Decode(_))));
    }
}
