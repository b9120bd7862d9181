//! Real-network transport over hyper

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::{Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, warn};

use super::{HttpRequest, HttpResponse, Transport, MAX_BODY_SIZE};
use crate::{CannedError, Result};

/// Transport that performs real HTTP/1.1 calls
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    max_body_size: usize,
}

impl HttpTransport {
    /// Create a transport with the default body limit
    #[must_use]
    pub fn new() -> Self {
        Self::with_body_limit(MAX_BODY_SIZE)
    }

    /// Create a transport that rejects bodies over `max_body_size` bytes
    #[must_use]
    pub fn with_body_limit(max_body_size: usize) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .build_http();

        Self {
            client,
            max_body_size,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let uri = request
            .url
            .parse::<Uri>()
            .map_err(|e| CannedError::Http(format!("Invalid URI '{}': {e}", request.url)))?;

        let mut builder = Request::builder()
            .method(hyper::Method::from(request.method))
            .uri(uri);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let body = request.body.map(Bytes::from).unwrap_or_default();
        let http_request = builder
            .body(Full::new(body))
            .map_err(|e| CannedError::Http(format!("Failed to build request: {e}")))?;

        let response = self.client.request(http_request).await.map_err(|e| {
            warn!("Request failed: {e}");
            CannedError::Http(format!("Request failed: {e}"))
        })?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or("<invalid>").to_string(),
                )
            })
            .collect();

        let declared = response
            .headers()
            .get(hyper::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<usize>().ok());

        let limit = self.max_body_size;
        let body = Limited::new(response.into_body(), limit)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    CannedError::DataTooLarge {
                        size: declared.unwrap_or(limit.saturating_add(1)),
                        limit,
                    }
                } else {
                    CannedError::Http(format!("Failed to read response body: {e}"))
                }
            })?
            .to_bytes();

        debug!("{} {} -> {status}", request.method, request.url);

        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}
