//! Main TableClient

use std::sync::Arc;

use crate::ClientConfig;
use crate::Session;
use crate::api::Resource;
use crate::api::ResourceLocation;
use crate::error::Error;
use crate::transport::Auth;
use crate::transport::ReqwestTransport;
use crate::transport::Transport;

/// The main client for interacting with a table API instance.
///
/// This client is cheap to clone (uses `Arc` internally). Clones share one
/// [`Session`], including its persistent headers.
///
/// # Example
///
/// ```ignore
/// use snowtable_lib::{TableClient, transport::Auth};
///
/// let client = TableClient::builder()
///     .instance("dev12345")
///     .auth(Auth::basic("admin", "secret"))
///     .build()?;
///
/// let incident = client
///     .table("incident")
///     .get("number=INC0010001", &Default::default())
///     .await?
///     .one()?;
/// ```
#[derive(Clone)]
pub struct TableClient {
    inner: Arc<TableClientInner>,
}

struct TableClientInner {
    base_url: String,
    session: Session,
    config: Arc<ClientConfig>,
}

impl TableClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> TableClientBuilder<Missing> {
        TableClientBuilder::new()
    }

    /// Returns a resource at `base_url + base_path + api_path`.
    ///
    /// `api_path` is used as given, e.g. `/table/incident`.
    pub fn resource(&self, api_path: impl Into<String>) -> Resource {
        let location = ResourceLocation::new(
            self.inner.base_url.clone(),
            self.inner.config.base_path.clone(),
            api_path,
        );
        Resource::new(location, self.inner.session.clone(), self.inner.config.clone())
    }

    /// Returns the resource for a table, e.g. `incident`.
    pub fn table(&self, table: &str) -> Resource {
        self.resource(format!("/table/{}", table))
    }

    /// Returns the base URL of the instance.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the shared session.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`TableClient`].
///
/// Uses the typestate pattern to ensure the base URL is set at compile time.
///
/// # Required Fields
///
/// - `url` or `instance` - where the API lives
pub struct TableClientBuilder<Url> {
    url: Url,
    auth: Auth,
    transport: Option<Arc<dyn Transport>>,
    config: ClientConfig,
}

impl TableClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            auth: Auth::None,
            transport: None,
            config: ClientConfig::default(),
        }
    }

    /// Sets the base URL, e.g. `https://example.service-now.com`.
    ///
    /// Used verbatim; it must not end with a slash.
    pub fn url(self, url: impl Into<String>) -> TableClientBuilder<Set<String>> {
        TableClientBuilder {
            url: Set(url.into()),
            auth: self.auth,
            transport: self.transport,
            config: self.config,
        }
    }

    /// Sets the base URL from a hosted instance name.
    pub fn instance(self, instance: &str) -> TableClientBuilder<Set<String>> {
        self.url(format!("https://{}.service-now.com", instance))
    }
}

impl Default for TableClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> TableClientBuilder<U> {
    /// Sets the credentials sent with every request.
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Sets a custom transport.
    ///
    /// If not set, a [`ReqwestTransport`] is built from the config.
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets the client configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }
}

impl TableClientBuilder<Set<String>> {
    /// Builds the [`TableClient`].
    pub fn build(self) -> Result<TableClient, Error> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&self.config)?),
        };

        log::debug!("table client for {}{}", self.url.0, self.config.base_path);

        Ok(TableClient {
            inner: Arc::new(TableClientInner {
                base_url: self.url.0,
                session: Session::from_shared(transport, self.auth),
                config: Arc::new(self.config),
            }),
        })
    }
}
