//! End-to-end tests of the default transport against a local server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use snowtable_lib::ClientConfig;
use snowtable_lib::TableClient;
use snowtable_lib::api::query::Filter;
use snowtable_lib::api::query::RequestOptions;
use snowtable_lib::error::ApiError;
use snowtable_lib::error::Error;
use snowtable_lib::transport::Auth;
use snowtable_lib::transport::HttpRequest;
use snowtable_lib::transport::ReqwestTransport;
use snowtable_lib::transport::Transport;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

// admin:secret
const BASIC_CREDENTIALS: &str = "Basic YWRtaW46c2VjcmV0";

async fn spawn_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| async move {
                    Ok::<_, Infallible>(route(req, addr))
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    addr
}

fn route(req: Request<Incoming>, addr: SocketAddr) -> Response<Full<Bytes>> {
    let authorized = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some(BASIC_CREDENTIALS);
    if !authorized {
        return json_response(
            StatusCode::UNAUTHORIZED,
            json!({"error": {
                "message": "User Not Authenticated",
                "detail": "Required to provide Auth information",
            }}),
        );
    }

    let query = req.uri().query().unwrap_or_default().to_string();
    match req.uri().path() {
        "/api/now/table/incident" if query == "page=2" => {
            json_response(StatusCode::OK, json!({"result": [{"sys_id": "c"}]}))
        }
        "/api/now/table/incident" if query.contains("sysparm_limit=2") => {
            let link = format!("<http://{}/api/now/table/incident?page=2>;rel=\"next\"", addr);
            let mut response = json_response(
                StatusCode::OK,
                json!({"result": [{"sys_id": "a"}, {"sys_id": "b"}]}),
            );
            response.headers_mut().insert("link", link.parse().unwrap());
            response.headers_mut().insert("x-total-count", "3".parse().unwrap());
            response
        }
        _ => json_response(
            StatusCode::NOT_FOUND,
            json!({"error": {"message": "No Record found", "detail": null}}),
        ),
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn client(addr: SocketAddr, auth: Auth) -> TableClient {
    TableClient::builder()
        .url(format!("http://{}", addr))
        .auth(auth)
        .config(ClientConfig::default().with_generator_size(2))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_streams_pages_over_http() {
    let addr = spawn_server().await;
    let incidents = client(addr, Auth::basic("admin", "secret")).table("incident");

    let response = incidents
        .get(Filter::eq("active", true), &RequestOptions::new())
        .await
        .unwrap();
    assert_eq!(response.page().total_count(), Some(3));

    let ids: Vec<String> = response
        .collect_all()
        .await
        .unwrap()
        .iter()
        .map(|r| r.sys_id().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[tokio::test]
async fn test_http_errors_carry_server_message() {
    let addr = spawn_server().await;
    let incidents = client(addr, Auth::basic("admin", "wrong")).table("incident");

    let err = incidents
        .get("", &RequestOptions::new())
        .await
        .err()
        .unwrap();
    match err {
        Error::Api(ApiError::Http { status, message, detail }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "User Not Authenticated");
            assert_eq!(detail.as_deref(), Some("Required to provide Auth information"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_no_match_is_empty_page() {
    let addr = spawn_server().await;
    let problems = client(addr, Auth::basic("admin", "secret")).table("problem");

    let err = problems
        .get("", &RequestOptions::new())
        .await
        .unwrap()
        .one()
        .unwrap_err();
    assert!(err.is_no_results());
}

#[tokio::test]
async fn test_rejects_unparseable_url() {
    let transport = ReqwestTransport::new(reqwest::Client::new());
    let request = HttpRequest {
        method: reqwest::Method::GET,
        url: "not a url".to_string(),
        query: Vec::new(),
        headers: Default::default(),
        auth: Auth::None,
        body: None,
    };

    let err = transport.send(request).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_body_read_timeout_is_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf).await;
        let head = "HTTP/1.1 200 OK\r\n\
                    content-type: application/json\r\n\
                    content-length: 1000\r\n\r\n\
                    {\"result\":";
        stream.write_all(head.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let transport = ReqwestTransport::new(reqwest::Client::new())
        .with_timeout(Duration::from_millis(200));
    let request = HttpRequest {
        method: reqwest::Method::GET,
        url: format!("http://{}/api/now/table/incident", addr),
        query: Vec::new(),
        headers: Default::default(),
        auth: Auth::None,
        body: None,
    };

    let err = transport.send(request).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout(t) if t == Duration::from_millis(200)));
}
