//! Record access over a dispatched request
//!
//! A [`Response`] wraps the first page of a result. Callers either ask for
//! exactly one record ([`Response::one`]) or walk every record lazily
//! ([`Response::stream`]), which fetches further pages by following the
//! server's `Link` headers only as the previous page runs out.

mod link;
mod page;

use async_stream::try_stream;
use futures::Stream;
use futures::StreamExt;
use futures::TryStreamExt;
use futures::stream::BoxStream;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::api::Exchange;
use crate::api::Sender;
use crate::api::query::ComposedParams;
use crate::error::Error;
use crate::model::Record;
use crate::report::Report;

pub use page::Page;

/// A lazy, single-pass stream of records across pages.
pub type RecordStream = BoxStream<'static, Result<Record, Error>>;

/// The result of a dispatched request.
///
/// # Example
///
/// ```ignore
/// // Exactly one record, or an error
/// let incident = resource
///     .get("number=INC0010001", &RequestOptions::new())
///     .await?
///     .one()?;
///
/// // Every match, page by page
/// let all: Vec<Record> = resource
///     .get(QuerySpec::all(), &RequestOptions::new().generator_size(500))
///     .await?
///     .collect_all()
///     .await?;
/// ```
pub struct Response {
    page: Page,
    sender: Sender,
    raise_on_empty: bool,
    report: Option<Report>,
}

impl Response {
    pub(crate) fn new(
        exchange: Exchange,
        sender: Sender,
        raise_on_empty: bool,
        report: Option<Report>,
    ) -> Result<Self, Error> {
        let page = Page::parse(exchange, sender.reporter())?;
        Ok(Self {
            page,
            sender,
            raise_on_empty,
            report,
        })
    }

    /// Returns the HTTP status of the first page.
    pub fn status(&self) -> StatusCode {
        self.page.status()
    }

    /// Returns the first page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Returns the report, if reporting is enabled.
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// Returns the only record.
    ///
    /// Fails with [`Error::MultipleResults`] if more than one record matched.
    /// With no match, fails with [`Error::NoResults`] when `raise_on_empty` is
    /// set and returns `Ok(None)` otherwise.
    pub fn one(self) -> Result<Option<Record>, Error> {
        let raise_on_empty = self.raise_on_empty;
        match self.one_or_none()? {
            None if raise_on_empty => Err(Error::NoResults),
            record => Ok(record),
        }
    }

    /// Returns the only record, or `None` without error if nothing matched.
    pub fn one_or_none(self) -> Result<Option<Record>, Error> {
        // A next link means the first page is not the whole result.
        if self.page.len() > 1 || (!self.page.is_empty() && self.page.has_more()) {
            return Err(Error::MultipleResults);
        }
        Ok(self.page.into_records().into_iter().next())
    }

    /// Returns the first record without checking for others.
    pub fn first(self) -> Result<Option<Record>, Error> {
        match self.page.into_records().into_iter().next() {
            None if self.raise_on_empty => Err(Error::NoResults),
            record => Ok(record),
        }
    }

    /// Streams every record, fetching continuation pages on demand.
    ///
    /// An empty result yields [`Error::NoResults`] when `raise_on_empty` is
    /// set, and ends immediately otherwise.
    pub fn stream(self) -> RecordStream {
        records(self.page, self.sender, self.raise_on_empty).boxed()
    }

    /// Collects every record across pages.
    pub async fn collect_all(self) -> Result<Vec<Record>, Error> {
        self.stream().try_collect().await
    }
}

fn records(
    first: Page,
    sender: Sender,
    raise_on_empty: bool,
) -> impl Stream<Item = Result<Record, Error>> + Send + 'static {
    try_stream! {
        if first.is_empty() && !first.has_more() && raise_on_empty {
            Err::<(), Error>(Error::NoResults)?;
        }

        let mut next = first.next_link().map(str::to_string);
        for record in first.into_records() {
            yield record;
        }

        while let Some(url) = next.take() {
            log::trace!("following next page link {}", url);
            let exchange = sender
                .send(Method::GET, &url, &ComposedParams::new(), None, HeaderMap::new())
                .await?;
            let page = Page::parse(exchange, sender.reporter())?;
            next = page.next_link().map(str::to_string);
            for record in page.into_records() {
                yield record;
            }
        }
    }
}
