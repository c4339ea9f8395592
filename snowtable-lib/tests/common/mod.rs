//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use reqwest::header::LINK;
use serde_json::Value;
use serde_json::json;
use snowtable_lib::ClientConfig;
use snowtable_lib::TableClient;
use snowtable_lib::error::ApiError;
use snowtable_lib::transport::HttpRequest;
use snowtable_lib::transport::HttpResponse;
use snowtable_lib::transport::Transport;

pub const BASE_URL: &str = "https://dev.example.com";
pub const INCIDENTS: &str = "https://dev.example.com/api/now/table/incident";

/// Replays queued responses in order and records every request.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, response: HttpResponse) -> &Self {
        self.state.lock().unwrap().responses.push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request);
        state
            .responses
            .pop_front()
            .ok_or_else(|| ApiError::parse("no scripted response left"))
    }
}

pub fn client(transport: &MockTransport, config: ClientConfig) -> TableClient {
    TableClient::builder()
        .url(BASE_URL)
        .transport(transport.clone())
        .config(config)
        .build()
        .unwrap()
}

pub fn ok(result: Value) -> HttpResponse {
    HttpResponse::new(StatusCode::OK, json!({ "result": result }).to_string())
}

pub fn not_found() -> HttpResponse {
    HttpResponse::new(
        StatusCode::NOT_FOUND,
        json!({
            "error": {"message": "No Record found", "detail": "Record doesn't exist"},
            "status": "failure",
        })
        .to_string(),
    )
}

pub fn with_next(response: HttpResponse, next: &str) -> HttpResponse {
    let value = format!("<{}>;rel=\"next\"", next);
    response.with_header(LINK, HeaderValue::from_str(&value).unwrap())
}

pub fn records(ids: &[&str]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| json!({ "sys_id": id, "number": format!("INC-{}", id) }))
            .collect(),
    )
}
