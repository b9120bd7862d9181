//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use canned::{CallRecord, Method};

/// Install a test subscriber once; `RUST_LOG` controls verbosity
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Body size served by `/large`
pub const LARGE_BODY_SIZE: usize = 1024;

/// Local HTTP server answering the fixed routes used by the recorder tests
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service_fn(route))
                        .await;
                });
            }
        });

        Self { addr, handle }
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn route(request: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let (status, body) = match request.uri().path() {
        "/500" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Bytes::from_static(b"500 Internal Server Error"),
        ),
        "/202" => (StatusCode::ACCEPTED, Bytes::from_static(b"OK")),
        "/404" => (StatusCode::NOT_FOUND, Bytes::from_static(b"404 Not Found")),
        "/status/wrong" => (
            StatusCode::BAD_REQUEST,
            Bytes::from_static(b"Invalid status code"),
        ),
        "/large" => (StatusCode::OK, Bytes::from(vec![b'x'; LARGE_BODY_SIZE])),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Bytes::from_static(b"No handler found for request"),
        ),
    };

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static("text/plain"));
    Ok(response)
}

/// The four exchanges the recorder scenarios produce, in call order
pub fn expected_records(host: &str, port: u16) -> Vec<CallRecord> {
    let record = |method, path: &str, status, body: &str| {
        CallRecord::new(method, format!("http://{host}:{port}{path}"))
            .with_status(status)
            .with_body(body)
            .with_content_type("text/plain")
    };

    vec![
        record(Method::Get, "/404", 404, "404 Not Found"),
        record(Method::Get, "/status/wrong", 400, "Invalid status code"),
        record(Method::Get, "/500", 500, "500 Internal Server Error"),
        record(Method::Put, "/202", 202, "OK"),
    ]
}
