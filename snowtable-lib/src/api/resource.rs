//! Per-collection operations

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;

use crate::ClientConfig;
use crate::Session;
use crate::api::PreparedRequest;
use crate::api::ResourceLocation;
use crate::api::SendOptions;
use crate::api::query::QuerySpec;
use crate::api::query::RequestOptions;
use crate::error::Error;
use crate::model::Record;
use crate::response::Response;

/// A collection on the API, such as `/table/incident`.
///
/// Every call creates a fresh [`PreparedRequest`], so URL changes made by
/// [`custom`](Resource::custom) never carry over between calls. Session
/// headers do.
///
/// # Example
///
/// ```ignore
/// use futures::TryStreamExt;
/// use snowtable_lib::api::query::{Filter, RequestOptions};
///
/// let incidents = client.table("incident");
///
/// let mut records = incidents
///     .get(Filter::eq("active", true), &RequestOptions::new().order_by(["-sys_created_on"]))
///     .await?
///     .stream();
///
/// while let Some(record) = records.try_next().await? {
///     println!("{:?}", record.get_str("number")?);
/// }
/// ```
#[derive(Clone)]
pub struct Resource {
    location: ResourceLocation,
    session: Session,
    config: Arc<ClientConfig>,
}

impl Resource {
    pub(crate) fn new(
        location: ResourceLocation,
        session: Session,
        config: Arc<ClientConfig>,
    ) -> Self {
        Self {
            location,
            session,
            config,
        }
    }

    pub fn location(&self) -> &ResourceLocation {
        &self.location
    }

    /// Creates a request context for this resource.
    pub fn request(&self) -> PreparedRequest {
        PreparedRequest::new(self.location.clone(), self.session.clone(), &self.config)
    }

    /// Fetches the records matching `query`.
    pub async fn get<Q>(&self, query: Q, options: &RequestOptions) -> Result<Response, Error>
    where
        Q: TryInto<QuerySpec>,
        Error: From<Q::Error>,
    {
        self.request().get(query, options).await
    }

    /// Creates a record.
    pub async fn insert<P: Serialize + ?Sized>(&self, payload: &P) -> Result<Record, Error> {
        self.request().insert(payload).await
    }

    /// Updates the single record matching `query`.
    pub async fn update<Q, P>(&self, query: Q, payload: &P) -> Result<Record, Error>
    where
        Q: TryInto<QuerySpec>,
        Error: From<Q::Error>,
        P: Serialize + ?Sized,
    {
        self.request().update(query, payload).await
    }

    /// Deletes the single record matching `query`.
    pub async fn delete<Q>(&self, query: Q) -> Result<Record, Error>
    where
        Q: TryInto<QuerySpec>,
        Error: From<Q::Error>,
    {
        self.request().delete(query).await
    }

    /// Sends a custom request; see [`PreparedRequest::custom`].
    pub async fn custom(
        &self,
        method: Method,
        path_append: Option<&str>,
        headers: Option<HeaderMap>,
        options: SendOptions,
    ) -> Result<Response, Error> {
        self.request()
            .custom(method, path_append, headers, options)
            .await
    }
}
