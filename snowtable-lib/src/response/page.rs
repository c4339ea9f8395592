//! One page of records.

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::LINK;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::link::next_link;
use crate::api::Exchange;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Record;
use crate::report::PageReport;
use crate::report::Reporter;

/// The records of one response, plus what is needed to fetch the next one.
#[derive(Debug, Clone)]
pub struct Page {
    records: Vec<Record>,
    status: StatusCode,
    /// Target of the `Link: <...>; rel="next"` header.
    next_link: Option<String>,
    /// `X-Total-Count` header.
    total_count: Option<u64>,
}

impl Page {
    /// Parses an exchange and reports it.
    ///
    /// `404` means no match. `204` answering a `DELETE` means the record was
    /// deleted, and is an empty page for any other method. Any other
    /// non-success status is an [`ApiError::Http`].
    pub(crate) fn parse(exchange: Exchange, reporter: &dyn Reporter) -> Result<Self, Error> {
        let Exchange {
            method,
            url,
            response,
            elapsed,
        } = exchange;
        let status = response.status;

        let records = match status {
            StatusCode::NO_CONTENT if method == Method::DELETE => {
                Ok(vec![Record::new().set("status", "record deleted")])
            }
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => Ok(Vec::new()),
            s if !s.is_success() => Err(ApiError::from_error_body(s.as_u16(), &response.body)),
            _ => parse_result(&response.body),
        };
        let next_link = response.header_values(LINK).find_map(next_link);
        let total_count = response
            .header("x-total-count")
            .and_then(|v| v.trim().parse().ok());

        reporter.record_page(PageReport {
            url,
            status: status.as_u16(),
            elapsed,
            record_count: records.as_ref().map_or(0, Vec::len),
            total_count,
        });

        Ok(Self {
            records: records?,
            status,
            next_link,
            total_count,
        })
    }

    /// Returns a reference to the records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the page and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the URL of the next page, if any.
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref()
    }

    /// Returns the server-reported total number of matches, if sent.
    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    /// Returns `true` if this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    result: Option<JsonValue>,
}

fn parse_result(body: &str) -> Result<Vec<Record>, ApiError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| ApiError::parse_with_body(format!("invalid JSON: {}", e), body))?;

    match envelope.result {
        Some(JsonValue::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                JsonValue::Object(map) => Ok(Record::from(map)),
                other => Err(ApiError::parse_with_body(
                    format!("expected a record object, got {}", other),
                    body,
                )),
            })
            .collect(),
        Some(JsonValue::Object(map)) => Ok(vec![Record::from(map)]),
        Some(other) => Err(ApiError::parse_with_body(
            format!("unexpected result {}", other),
            body,
        )),
        None => Err(ApiError::parse_with_body("response has no `result` member", body)),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::header::HeaderValue;
    use serde_json::json;

    use super::*;
    use crate::report::NoopReporter;
    use crate::report::Report;
    use crate::transport::HttpResponse;

    fn exchange(method: Method, response: HttpResponse) -> Exchange {
        Exchange {
            method,
            url: "https://dev.service-now.com/api/now/table/incident".to_string(),
            response,
            elapsed: Duration::from_millis(12),
        }
    }

    fn parse(status: StatusCode, body: &str) -> Result<Page, Error> {
        Page::parse(exchange(Method::GET, HttpResponse::new(status, body)), &NoopReporter)
    }

    #[test]
    fn test_list_result() {
        let page = parse(StatusCode::OK, r#"{"result":[{"sys_id":"a"},{"sys_id":"b"}]}"#).unwrap();
        assert_eq!(page.len(), 2);
        assert!(!page.has_more());
    }

    #[test]
    fn test_single_object_result() {
        let page = parse(StatusCode::CREATED, r#"{"result":{"sys_id":"a"}}"#).unwrap();
        assert_eq!(page.records()[0].sys_id().unwrap(), "a");
    }

    #[test]
    fn test_not_found_is_empty() {
        let body = r#"{"error":{"message":"No Record found","detail":""},"status":"failure"}"#;
        assert!(parse(StatusCode::NOT_FOUND, body).unwrap().is_empty());
    }

    #[test]
    fn test_no_content_after_delete_is_deleted_sentinel() {
        let response = HttpResponse::new(StatusCode::NO_CONTENT, "");
        let page = Page::parse(exchange(Method::DELETE, response), &NoopReporter).unwrap();
        assert_eq!(page.records()[0].get_str("status").unwrap(), Some("record deleted"));
    }

    #[test]
    fn test_no_content_for_other_methods_is_empty() {
        for method in [Method::GET, Method::POST, Method::PUT, Method::PATCH] {
            let response = HttpResponse::new(StatusCode::NO_CONTENT, "");
            let page = Page::parse(exchange(method, response), &NoopReporter).unwrap();
            assert!(page.is_empty());
        }
    }

    #[test]
    fn test_next_link_on_later_header_line() {
        let response = HttpResponse::new(StatusCode::OK, r#"{"result":[{"sys_id":"a"}]}"#)
            .with_header(LINK, HeaderValue::from_static("<https://x/first?o=0>;rel=\"first\""))
            .with_header(LINK, HeaderValue::from_static("<https://x/next?o=1>;rel=\"next\""));
        let page = Page::parse(exchange(Method::GET, response), &NoopReporter).unwrap();
        assert_eq!(page.next_link(), Some("https://x/next?o=1"));
    }

    #[test]
    fn test_error_status_is_api_error() {
        let body = json!({
            "error": {
                "message": "User Not Authenticated",
                "detail": "Required to provide Auth information",
            }
        })
        .to_string();
        let err = parse(StatusCode::UNAUTHORIZED, &body).unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Http { status: 401, .. })));
    }

    #[test]
    fn test_missing_result_is_parse_error() {
        let err = parse(StatusCode::OK, r#"{"records":[]}"#).unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Parse { .. })));
        let err = parse(StatusCode::OK, r#"{"result":[1]}"#).unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Parse { .. })));
    }

    #[test]
    fn test_headers_and_report() {
        let response = HttpResponse::new(StatusCode::OK, r#"{"result":[{"sys_id":"a"}]}"#)
            .with_header(LINK, HeaderValue::from_static("<https://x/next?o=1>;rel=\"next\""))
            .with_header(
                reqwest::header::HeaderName::from_static("x-total-count"),
                HeaderValue::from_static("3"),
            );
        let report = Report::new("https://x", 1);
        let page = Page::parse(exchange(Method::GET, response), &report).unwrap();

        assert_eq!(page.next_link(), Some("https://x/next?o=1"));
        assert_eq!(page.total_count(), Some(3));

        let state = report.snapshot();
        assert_eq!(state.pages.len(), 1);
        assert_eq!(state.pages[0].record_count, 1);
        assert_eq!(state.pages[0].total_count, Some(3));
    }
}
