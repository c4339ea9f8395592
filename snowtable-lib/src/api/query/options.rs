//! Per-call request options.

/// Options for a `get` call.
///
/// # Example
///
/// ```
/// use snowtable_lib::api::query::RequestOptions;
///
/// let options = RequestOptions::new()
///     .fields(["number", "short_description"])
///     .order_by(["category", "-created_on"])
///     .limit(50);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Fields to return. Empty means all fields.
    pub fields: Vec<String>,
    /// Sort fields, primary first. A leading `-` sorts descending.
    pub order_by: Vec<String>,
    /// Maximum number of records in total. Disables page-link streaming.
    pub limit: Option<u32>,
    /// Number of records to skip.
    pub offset: Option<i64>,
    /// Page size for streaming. Only used when `limit` is unset.
    pub generator_size: Option<u32>,
}

impl RequestOptions {
    /// Creates new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fields to return.
    pub fn fields<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the sort fields.
    pub fn order_by<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.order_by = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Caps the total number of records.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips the first `offset` records.
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the page size used while streaming.
    pub fn generator_size(mut self, size: u32) -> Self {
        self.generator_size = Some(size);
        self
    }
}
