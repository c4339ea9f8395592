//! Request/response reporting
//!
//! When reporting is enabled, each request context carries a [`Report`] that
//! records the parameters last sent and one [`PageReport`] per response. When
//! it is disabled a [`NoopReporter`] takes its place.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;

use crate::api::query::ComposedParams;

/// Receives request metadata from the dispatcher.
pub trait Reporter: Send + Sync {
    /// Called with the final parameters immediately before a request is sent.
    fn record_request(&self, params: &ComposedParams);

    /// Called once per response page.
    fn record_page(&self, page: PageReport);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn record_request(&self, _params: &ComposedParams) {}

    fn record_page(&self, _page: PageReport) {}
}

/// Metadata about one response page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    /// URL the page was fetched from, without the query pairs.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Time spent in the transport.
    pub elapsed: Duration,
    /// Number of records on the page.
    pub record_count: usize,
    /// Server-reported total (`X-Total-Count`), if present.
    pub total_count: Option<u64>,
}

/// Snapshot of a [`Report`].
#[derive(Debug, Clone)]
pub struct ReportState {
    /// URL of the resource the request context targets.
    pub resource: String,
    /// Page size configured for streaming.
    pub generator_size: u32,
    /// Parameters of the most recent request.
    pub request_params: Option<ComposedParams>,
    /// One entry per page received, in order.
    pub pages: Vec<PageReport>,
    pub created_at: DateTime<Utc>,
}

impl ReportState {
    /// Total time spent waiting on the transport.
    pub fn total_elapsed(&self) -> Duration {
        self.pages.iter().map(|p| p.elapsed).sum()
    }

    /// Total number of records received across pages.
    pub fn record_count(&self) -> usize {
        self.pages.iter().map(|p| p.record_count).sum()
    }
}

/// Shared, clonable report bound to one request context.
#[derive(Debug, Clone)]
pub struct Report {
    state: Arc<Mutex<ReportState>>,
}

impl Report {
    pub fn new(resource: impl Into<String>, generator_size: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(ReportState {
                resource: resource.into(),
                generator_size,
                request_params: None,
                pages: Vec::new(),
                created_at: Utc::now(),
            })),
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> ReportState {
        self.lock().clone()
    }

    /// Returns the parameters of the most recent request.
    pub fn request_params(&self) -> Option<ComposedParams> {
        self.lock().request_params.clone()
    }

    /// Returns the number of pages received so far.
    pub fn page_count(&self) -> usize {
        self.lock().pages.len()
    }

    fn lock(&self) -> MutexGuard<'_, ReportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Reporter for Report {
    fn record_request(&self, params: &ComposedParams) {
        self.lock().request_params = Some(params.clone());
    }

    fn record_page(&self, page: PageReport) {
        self.lock().pages.push(page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::LIMIT;

    fn page(records: usize, millis: u64) -> PageReport {
        PageReport {
            url: "https://dev.service-now.com/api/now/table/incident".to_string(),
            status: 200,
            elapsed: Duration::from_millis(millis),
            record_count: records,
            total_count: Some(7),
        }
    }

    #[test]
    fn test_clones_share_state() {
        let report = Report::new("https://dev.service-now.com/api/now/table/incident", 10);
        let clone = report.clone();

        clone.record_request(&ComposedParams::new().with(LIMIT, 10u32));
        clone.record_page(page(5, 20));
        clone.record_page(page(2, 30));

        let state = report.snapshot();
        assert_eq!(report.page_count(), 2);
        assert_eq!(state.record_count(), 7);
        assert_eq!(state.total_elapsed(), Duration::from_millis(50));
        assert!(report.request_params().unwrap().contains(LIMIT));
    }
}
