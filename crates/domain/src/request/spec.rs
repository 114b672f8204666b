//! Request specification type

use serde::{Deserialize, Serialize};

use super::body::BodySpec;
use super::method::HttpMethod;
use super::pair::KeyValuePair;
use crate::auth::AuthSpec;

/// Stored description of one HTTP request.
///
/// Any string field may contain `{{variable}}` references; they are resolved
/// right before the request is encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RequestSpec {
    /// HTTP method.
    #[serde(default)]
    pub method: HttpMethod,
    /// Target URL, possibly already carrying a query string.
    #[serde(default)]
    pub url: String,
    /// Request headers.
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    /// Query parameters appended to the URL.
    #[serde(default)]
    pub params: Vec<KeyValuePair>,
    /// Request body.
    #[serde(default)]
    pub body: BodySpec,
    /// Authentication.
    #[serde(default)]
    pub auth: AuthSpec,
}

impl RequestSpec {
    /// Creates a request with no headers, params, body or auth.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Adds an enabled header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(KeyValuePair::new(key, value));
        self
    }

    /// Adds an enabled query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(KeyValuePair::new(key, value));
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: BodySpec) -> Self {
        self.body = body;
        self
    }

    /// Replaces the auth.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthSpec) -> Self {
        self.auth = auth;
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_order() {
        let request = RequestSpec::get("https://api.example.com")
            .with_header("Accept", "application/json")
            .with_header("X-Trace", "1");
        let keys: Vec<_> = request.headers.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, vec!["Accept", "X-Trace"]);
    }

    #[test]
    fn test_minimal_document_deserializes_with_defaults() {
        let request: RequestSpec =
            serde_json::from_value(json!({"method": "DELETE", "url": "https://x/y"})).unwrap();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.body, BodySpec::None);
        assert!(request.auth.is_disabled());
    }
}
