//! Composition of request parameters from a query and its options.

use crate::api::query::ComposedParams;
use crate::api::query::FIELDS;
use crate::api::query::LIMIT;
use crate::api::query::OFFSET;
use crate::api::query::OrderBy;
use crate::api::query::QUERY;
use crate::api::query::QuerySpec;
use crate::api::query::RequestOptions;
use crate::api::query::SUPPRESS_PAGINATION_HEADER;
use crate::api::query::order_to_query;
use crate::error::Error;

/// Turns a [`QuerySpec`] and [`RequestOptions`] into [`ComposedParams`].
///
/// An explicit `limit` and the streaming page size are mutually exclusive:
/// streaming follows the server's page links, and a capped response carries
/// none.
///
/// # Example
///
/// ```
/// use snowtable_lib::api::query::{
///     ComposedParams, Pagination, QueryEncoder, QuerySpec, RequestOptions,
/// };
///
/// let defaults = ComposedParams::new();
/// let encoder = QueryEncoder::new(&defaults, 100);
///
/// let params = encoder
///     .encode(&QuerySpec::from("active=true"), &RequestOptions::new().limit(5))
///     .unwrap();
/// assert_eq!(params.pagination(), Some(Pagination::Cap(5)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QueryEncoder<'a> {
    defaults: &'a ComposedParams,
    generator_size: u32,
}

impl<'a> QueryEncoder<'a> {
    /// Creates an encoder layering over `defaults`, using `generator_size`
    /// when the options name no page size.
    pub fn new(defaults: &'a ComposedParams, generator_size: u32) -> Self {
        Self {
            defaults,
            generator_size,
        }
    }

    /// Composes the parameters for one request.
    pub fn encode(
        &self,
        query: &QuerySpec,
        options: &RequestOptions,
    ) -> Result<ComposedParams, Error> {
        let mut params = self.defaults.clone();

        let mut encoded = query.render()?;
        let sort = order_to_query(&OrderBy::parse(&options.order_by)?);
        if !sort.is_empty() {
            if !encoded.is_empty() {
                encoded.push('^');
            }
            encoded.push_str(&sort);
        }
        if encoded.is_empty() {
            params.remove(QUERY);
        } else {
            params.insert(QUERY, encoded);
        }

        match options.limit.filter(|limit| *limit > 0) {
            Some(limit) => {
                params.insert(LIMIT, limit);
                params.insert(SUPPRESS_PAGINATION_HEADER, true);
            }
            None => {
                let size = options
                    .generator_size
                    .filter(|size| *size > 0)
                    .unwrap_or(self.generator_size);
                params.insert(LIMIT, size);
                params.remove(SUPPRESS_PAGINATION_HEADER);
            }
        }

        if options.fields.is_empty() {
            params.remove(FIELDS);
        } else {
            params.insert(FIELDS, options.fields.join(","));
        }

        if let Some(offset) = options.offset {
            params.insert(OFFSET, offset);
        }

        Ok(params)
    }
}
