//! `reqwest`-backed transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::Auth;
use super::HttpRequest;
use super::HttpResponse;
use super::Transport;
use crate::ClientConfig;
use crate::error::ApiError;

/// Transport that sends requests with a [`reqwest::Client`].
///
/// Cheap to clone; the underlying client pools connections.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Option<Duration>,
}

impl ReqwestTransport {
    /// Wraps an existing client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: None,
        }
    }

    /// Builds a client using the timeouts from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The per-request timeout covers reading the body too.
    fn map_error(&self, error: reqwest::Error) -> ApiError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut url = Url::parse(&request.url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", request.url, e)))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);

        builder = match request.auth {
            Auth::None => builder,
            Auth::Basic { username, password } => builder.basic_auth(username, password),
            Auth::Bearer(token) => builder.bearer_auth(token),
        };

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| self.map_error(e))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
