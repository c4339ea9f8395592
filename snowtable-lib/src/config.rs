//! Client configuration

use std::time::Duration;

use crate::api::query::ComposedParams;
use crate::api::query::DISPLAY_VALUE;
use crate::api::query::EXCLUDE_REFERENCE_LINK;
use crate::api::query::ParamValue;

/// Configuration shared by every request a client makes.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use snowtable_lib::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_generator_size(500)
///     .with_reporting(true)
///     .with_param("sysparm_display_value", "all")
///     .with_timeout(Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Path between the base URL and the API path.
    ///
    /// Default: `/api/now`
    pub base_path: String,

    /// Page size used when streaming without a limit.
    ///
    /// Default: 10
    pub generator_size: u32,

    /// Whether a query with no matches is an error for single-record access.
    ///
    /// Default: `true`
    pub raise_on_empty: bool,

    /// Whether request contexts keep a [`Report`](crate::report::Report).
    ///
    /// Default: `false`
    pub enable_reporting: bool,

    /// Parameters sent with every request unless overridden.
    ///
    /// Default: `sysparm_display_value=false`, `sysparm_exclude_reference_link=false`
    pub default_params: ComposedParams,

    /// Per-request timeout for the default transport.
    pub timeout: Option<Duration>,

    /// Connection timeout for the default transport.
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_path: "/api/now".to_string(),
            generator_size: 10,
            raise_on_empty: true,
            enable_reporting: false,
            default_params: ComposedParams::new()
                .with(DISPLAY_VALUE, false)
                .with(EXCLUDE_REFERENCE_LINK, false),
            timeout: None,
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base path.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the streaming page size.
    pub fn with_generator_size(mut self, size: u32) -> Self {
        self.generator_size = size;
        self
    }

    /// Sets whether empty single-record results are errors.
    pub fn with_raise_on_empty(mut self, raise: bool) -> Self {
        self.raise_on_empty = raise;
        self
    }

    /// Enables or disables reporting.
    pub fn with_reporting(mut self, enabled: bool) -> Self {
        self.enable_reporting = enabled;
        self
    }

    /// Adds or overrides a default parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.default_params.insert(key, value);
        self
    }

    /// Replaces all default parameters.
    pub fn with_default_params(mut self, params: ComposedParams) -> Self {
        self.default_params = params;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}
