//! Request contexts and dispatch
//!
//! A [`PreparedRequest`] is one logical operation (get, insert, update,
//! delete or custom) against one resource. It owns its URL, its default
//! parameters and, when enabled, its report; the [`Session`] is shared.

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::Serialize;

use crate::ClientConfig;
use crate::Session;
use crate::api::query::ComposedParams;
use crate::api::query::QueryEncoder;
use crate::api::query::QuerySpec;
use crate::api::query::RequestOptions;
use crate::error::Error;
use crate::model::Record;
use crate::report::NoopReporter;
use crate::report::Report;
use crate::report::Reporter;
use crate::response::Response;
use crate::transport::HttpRequest;
use crate::transport::HttpResponse;

/// Where a resource lives: `base_url + base_path + api_path`.
///
/// Segments are concatenated as given; callers supply the delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocation {
    pub base_url: String,
    pub base_path: String,
    pub api_path: String,
}

impl ResourceLocation {
    pub fn new(
        base_url: impl Into<String>,
        base_path: impl Into<String>,
        api_path: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            base_path: base_path.into(),
            api_path: api_path.into(),
        }
    }

    /// Returns the collection URL.
    pub fn url(&self) -> String {
        format!("{}{}{}", self.base_url, self.base_path, self.api_path)
    }

    /// Returns the URL of a single record.
    pub fn record_url(&self, sys_id: &str) -> String {
        format!("{}/{}", self.url(), sys_id)
    }
}

/// Per-send overrides.
///
/// `params`, when set, replaces the context's default parameters entirely.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub params: Option<ComposedParams>,
    pub body: Option<String>,
    pub headers: HeaderMap,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the default parameters for this send.
    pub fn params(mut self, params: ComposedParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Sets a raw request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serializes `payload` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, Error> {
        Ok(self.body(to_body(payload)?))
    }

    /// Adds a header for this send only.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// The continuation context handed to a [`Response`].
///
/// Holds exactly what is needed to send another request on the same session
/// and report to the same sink, and nothing tied to the originating context's
/// URL.
#[derive(Clone)]
pub(crate) struct Sender {
    session: Session,
    reporter: Arc<dyn Reporter>,
}

/// One completed HTTP exchange.
pub(crate) struct Exchange {
    pub method: Method,
    pub url: String,
    pub response: HttpResponse,
    pub elapsed: Duration,
}

impl Sender {
    pub(crate) fn new(session: Session, reporter: Arc<dyn Reporter>) -> Self {
        Self { session, reporter }
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        url: &str,
        params: &ComposedParams,
        body: Option<String>,
        extra_headers: HeaderMap,
    ) -> Result<Exchange, Error> {
        let mut headers = self.session.headers();
        for (name, value) in extra_headers {
            if let Some(name) = name {
                headers.insert(name, value);
            }
        }
        if body.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        self.reporter.record_request(params);

        log::debug!("{} {} ({} params)", method, url, params.len());

        let request = HttpRequest {
            method: method.clone(),
            url: url.to_string(),
            query: params.to_pairs(),
            headers,
            auth: self.session.auth().clone(),
            body,
        };

        let started = Instant::now();
        let response = self.session.send(request).await?;
        let elapsed = started.elapsed();

        log::debug!("{} {} -> {} in {:?}", method, url, response.status, elapsed);

        Ok(Exchange {
            method,
            url: url.to_string(),
            response,
            elapsed,
        })
    }
}

/// One logical operation against a resource.
///
/// Obtained from [`Resource::request`](crate::api::Resource::request), or
/// implicitly through the `Resource` shortcuts.
pub struct PreparedRequest {
    location: ResourceLocation,
    url: String,
    sender: Sender,
    default_params: ComposedParams,
    generator_size: u32,
    raise_on_empty: bool,
    report: Option<Report>,
}

impl PreparedRequest {
    /// Creates a request context for `location`.
    pub fn new(location: ResourceLocation, session: Session, config: &ClientConfig) -> Self {
        let url = location.url();

        let report = config
            .enable_reporting
            .then(|| Report::new(url.clone(), config.generator_size));
        let reporter: Arc<dyn Reporter> = match &report {
            Some(report) => Arc::new(report.clone()),
            None => Arc::new(NoopReporter),
        };

        Self {
            location,
            url,
            sender: Sender::new(session, reporter),
            default_params: config.default_params.clone(),
            generator_size: config.generator_size,
            raise_on_empty: config.raise_on_empty,
            report,
        }
    }

    /// Returns the URL requests are sent to by default.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn location(&self) -> &ResourceLocation {
        &self.location
    }

    /// Returns the report, if reporting is enabled.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn default_params(&self) -> &ComposedParams {
        &self.default_params
    }

    /// Composes the parameters a `get` would send.
    pub fn encode(
        &self,
        query: &QuerySpec,
        options: &RequestOptions,
    ) -> Result<ComposedParams, Error> {
        QueryEncoder::new(&self.default_params, self.generator_size).encode(query, options)
    }

    /// Sends one request and returns the raw response.
    ///
    /// `url` overrides the context URL; `options.params` replaces the default
    /// parameters.
    pub async fn send(
        &self,
        method: Method,
        url: Option<&str>,
        options: SendOptions,
    ) -> Result<HttpResponse, Error> {
        Ok(self.exchange(method, url, options).await?.response)
    }

    /// Sends one request and wraps the response for record access.
    pub async fn fetch(
        &self,
        method: Method,
        url: Option<&str>,
        options: SendOptions,
    ) -> Result<Response, Error> {
        let exchange = self.exchange(method, url, options).await?;
        Response::new(
            exchange,
            self.sender.clone(),
            self.raise_on_empty,
            self.report.clone(),
        )
    }

    /// Fetches the records matching `query`.
    pub async fn get<Q>(&self, query: Q, options: &RequestOptions) -> Result<Response, Error>
    where
        Q: TryInto<QuerySpec>,
        Error: From<Q::Error>,
    {
        let query = query.try_into()?;
        let params = self.encode(&query, options)?;
        self.fetch(Method::GET, None, SendOptions::new().params(params))
            .await
    }

    /// Sends a request of any method, optionally below the resource path.
    ///
    /// `headers` are merged into the shared session and stay there for every
    /// later request on that session. `path_append` must start with `/`; it
    /// is appended to this context's URL for the rest of its lifetime.
    pub async fn custom(
        &mut self,
        method: Method,
        path_append: Option<&str>,
        headers: Option<HeaderMap>,
        options: SendOptions,
    ) -> Result<Response, Error> {
        if let Some(path) = path_append {
            if !path.starts_with('/') {
                return Err(Error::invalid_usage(
                    "path_append must be in the form /path-to-append[/.../...]",
                ));
            }
        }

        if let Some(headers) = headers {
            self.sender.session().update_headers(headers);
        }

        if let Some(path) = path_append {
            self.url.push_str(path);
        }

        self.fetch(method, None, options).await
    }

    /// Creates a record and returns it as stored.
    pub async fn insert<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Record, Error> {
        let options = SendOptions::new().json(payload)?;
        self.fetch(Method::POST, None, options)
            .await?
            .one()?
            .ok_or(Error::NoResults)
    }

    /// Updates the single record matching `query`.
    ///
    /// Costs two round trips: a lookup to learn the record's `sys_id`, then a
    /// `PUT` to the record URL. Nothing is modified unless the lookup finds
    /// exactly one record.
    pub async fn update<Q, P>(&self, query: Q, payload: &P) -> Result<Record, Error>
    where
        Q: TryInto<QuerySpec>,
        Error: From<Q::Error>,
        P: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(payload)
            .map_err(|e| Error::invalid_usage(format!("update payload: {}", e)))?;
        if !payload.is_object() {
            return Err(Error::invalid_usage("update payload must be a mapping"));
        }

        let record = self.lookup(query).await?;
        let url = self.location.record_url(record.sys_id()?);

        self.fetch(Method::PUT, Some(&url), SendOptions::new().body(payload.to_string()))
            .await?
            .one()?
            .ok_or(Error::NoResults)
    }

    /// Deletes the single record matching `query`.
    ///
    /// Same two-step addressing as [`update`](Self::update).
    pub async fn delete<Q>(&self, query: Q) -> Result<Record, Error>
    where
        Q: TryInto<QuerySpec>,
        Error: From<Q::Error>,
    {
        let record = self.lookup(query).await?;
        let url = self.location.record_url(record.sys_id()?);

        self.fetch(Method::DELETE, Some(&url), SendOptions::new())
            .await?
            .one()?
            .ok_or(Error::NoResults)
    }

    /// Resolves `query` to exactly one record, whatever `raise_on_empty` says.
    async fn lookup<Q>(&self, query: Q) -> Result<Record, Error>
    where
        Q: TryInto<QuerySpec>,
        Error: From<Q::Error>,
    {
        self.get(query, &RequestOptions::default())
            .await?
            .one_or_none()?
            .ok_or(Error::NoResults)
    }

    async fn exchange(
        &self,
        method: Method,
        url: Option<&str>,
        options: SendOptions,
    ) -> Result<Exchange, Error> {
        let url = url.unwrap_or(&self.url);
        let params = options.params.as_ref().unwrap_or(&self.default_params);
        self.sender
            .send(method, url, params, options.body, options.headers)
            .await
    }
}

pub(crate) fn to_body<T: Serialize + ?Sized>(payload: &T) -> Result<String, Error> {
    serde_json::to_string(payload).map_err(|e| Error::invalid_usage(format!("payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_concatenates_without_normalizing() {
        let location =
            ResourceLocation::new("https://dev.service-now.com", "/api/now", "/table/incident");
        assert_eq!(location.url(), "https://dev.service-now.com/api/now/table/incident");
        assert_eq!(
            location.record_url("abc123"),
            "https://dev.service-now.com/api/now/table/incident/abc123"
        );

        let sloppy = ResourceLocation::new("https://x/", "/api", "table");
        assert_eq!(sloppy.url(), "https://x//apitable");
    }
}
