//! User-facing HTTP client

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{normalize_url, HttpRequest, HttpResponse, HttpTransport, Transport};
use crate::record::Method;
use crate::Result;

/// HTTP client whose calls can be intercepted by swapping its transport
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Create a client over `transport`
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client that talks to the real network
    #[must_use]
    pub fn http() -> Self {
        Self::new(Arc::new(HttpTransport::new()))
    }

    /// Send a fully built request
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute or the transport fails
    pub async fn send(&self, mut request: HttpRequest) -> Result<HttpResponse> {
        request.url = normalize_url(&request.url)?;
        debug!("{} {}", request.method, request.url);
        self.transport.send(request).await
    }

    /// Send a bodiless request
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute or the transport fails
    pub async fn request(&self, method: Method, url: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::new(method, url)).await
    }

    /// `GET url`
    ///
    /// # Errors
    ///
    /// See [`Client::send`]
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::Get, url).await
    }

    /// `HEAD url`
    ///
    /// # Errors
    ///
    /// See [`Client::send`]
    pub async fn head(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::Head, url).await
    }

    /// `DELETE url`
    ///
    /// # Errors
    ///
    /// See [`Client::send`]
    pub async fn delete(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::Delete, url).await
    }

    /// `PUT url`
    ///
    /// # Errors
    ///
    /// See [`Client::send`]
    pub async fn put(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::Put, url).await
    }

    /// `PATCH url`
    ///
    /// # Errors
    ///
    /// See [`Client::send`]
    pub async fn patch(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::Patch, url).await
    }

    /// `POST url` with a text body
    ///
    /// # Errors
    ///
    /// See [`Client::send`]
    pub async fn post(&self, url: &str, body: impl Into<String>) -> Result<HttpResponse> {
        self.send(HttpRequest::new(Method::Post, url).with_body(body))
            .await
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::http()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}
