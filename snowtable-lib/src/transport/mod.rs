//! HTTP transport seam.
//!
//! The client never talks to the network directly; every exchange goes
//! through a [`Transport`]. [`ReqwestTransport`] is the default, tests plug
//! in scripted implementations.

mod reqwest_transport;

use std::fmt;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;

use crate::error::ApiError;

pub use reqwest_transport::ReqwestTransport;

/// Credentials attached to every request.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    /// No credentials.
    #[default]
    None,
    /// HTTP basic authentication.
    Basic {
        username: String,
        password: Option<String>,
    },
    /// Bearer token.
    Bearer(String),
}

impl Auth {
    /// Creates basic credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: Some(password.into()),
        }
    }

    /// Creates a bearer token credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Auth::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// A fully resolved request, ready to go on the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Target URL, possibly already carrying a query string.
    pub url: String,
    /// Query pairs appended to `url`.
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub auth: Auth,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Returns the value of a query pair, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A response as handed back by the transport.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl HttpResponse {
    /// Creates a response with no headers.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Adds a header (builder pattern).
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Returns a header as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns every value of a repeatable header, in received order.
    ///
    /// Values that are not valid UTF-8 are skipped.
    pub fn header_values(&self, name: HeaderName) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(name)
            .into_iter()
            .filter_map(|v| v.to_str().ok())
    }
}

/// Sends a single HTTP request.
///
/// Implementations own connection handling and TLS. They must not retry or
/// interpret status codes: every response, successful or not, is returned as
/// an [`HttpResponse`], and only failures to complete the exchange are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_debug_redacts_secrets() {
        let basic = format!("{:?}", Auth::basic("admin", "hunter2"));
        assert!(basic.contains("admin"));
        assert!(!basic.contains("hunter2"));
        assert!(!format!("{:?}", Auth::bearer("tok")).contains("tok"));
    }
}
