//! HTTP client plumbing
//!
//! Calls go through a [`Client`], which hands each request to a
//! [`Transport`]. Swapping the transport is how calls get intercepted: the
//! real network, the mock registry, or a recorder wrapping either.

mod client;
mod http;

pub use client::Client;
pub use http::HttpTransport;

use async_trait::async_trait;
use hyper::Uri;

use crate::record::Method;
use crate::{CannedError, Result};

/// Default cap on response body size
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

/// Outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method
    pub method: Method,
    /// Absolute url
    pub url: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Request body text
    pub body: Option<String>,
}

impl HttpRequest {
    /// Create a request without headers or body
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach a body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Response as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Response headers, names lowercase
    pub headers: Vec<(String, String)>,
    /// Body text
    pub body: String,
}

impl HttpResponse {
    /// First value of a header, case-insensitive
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Value of the `Content-Type` header
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Something that can answer an HTTP request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the full response
    ///
    /// # Errors
    ///
    /// Returns error if no response could be produced
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Canonical form of an absolute url.
///
/// A bare authority gains a `/` path, so `http://host` and `http://host/`
/// compare equal.
///
/// # Errors
///
/// Returns `Http` if `url` is not an absolute URI
pub fn normalize_url(url: &str) -> Result<String> {
    let uri = url
        .trim()
        .parse::<Uri>()
        .map_err(|e| CannedError::Http(format!("Invalid URI '{url}': {e}")))?;

    let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) else {
        return Err(CannedError::Http(format!("URI '{url}' is not absolute")));
    };

    let path_and_query = uri.path_and_query().map_or("", |pq| pq.as_str());
    if path_and_query.starts_with('/') {
        Ok(format!("{scheme}://{authority}{path_and_query}"))
    } else {
        Ok(format!("{scheme}://{authority}/{path_and_query}"))
    }
}
