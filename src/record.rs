//! Captured HTTP exchanges

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use hyper::Uri;
use serde::{Deserialize, Serialize};

use crate::CannedError;

/// Content type assumed when a response does not carry one
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// HTTP verb of a recorded or mocked call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
    /// CONNECT
    Connect,
}

impl Method {
    /// Uppercase wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = CannedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            "CONNECT" => Ok(Self::Connect),
            _ => Err(CannedError::UnknownMethod(s.to_string())),
        }
    }
}

impl From<Method> for hyper::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => hyper::Method::GET,
            Method::Head => hyper::Method::HEAD,
            Method::Post => hyper::Method::POST,
            Method::Put => hyper::Method::PUT,
            Method::Patch => hyper::Method::PATCH,
            Method::Delete => hyper::Method::DELETE,
            Method::Options => hyper::Method::OPTIONS,
            Method::Trace => hyper::Method::TRACE,
            Method::Connect => hyper::Method::CONNECT,
        }
    }
}

/// One observed (or replayed) HTTP exchange.
///
/// Field order matches the persisted layout. `headers` comes last so TOML
/// can emit it as a sub-table after the plain values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Request method
    pub method: Method,
    /// Absolute request url
    pub url: String,
    /// Response body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Response status code
    pub status: u16,
    /// Response content type
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Derive `Content-Length` from the body on replay instead of trusting it
    #[serde(default)]
    pub auto_calculate_content_length: bool,
    /// Response headers kept by the recorder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

impl CallRecord {
    /// Create a record with an empty `200 text/plain` response
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            status: 200,
            content_type: default_content_type(),
            auto_calculate_content_length: false,
            headers: None,
        }
    }

    /// Set the response status
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set the response body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the response content type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Check status range and url shape
    ///
    /// # Errors
    ///
    /// Returns a message describing the first violated rule
    pub fn check(&self) -> std::result::Result<(), String> {
        if !(100..=599).contains(&self.status) {
            return Err(format!("status {} is outside 100-599", self.status));
        }

        let uri = self
            .url
            .parse::<Uri>()
            .map_err(|e| format!("url '{}' is not a valid URI: {e}", self.url))?;

        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(format!("url '{}' is not absolute", self.url));
        }

        Ok(())
    }
}
