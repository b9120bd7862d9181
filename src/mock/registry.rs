//! Ordered store of registered mock responses

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::network::{normalize_url, HttpRequest, HttpResponse};
use crate::record::{CallRecord, Method, DEFAULT_CONTENT_TYPE};
use crate::{CannedError, Result};

/// A canned response registered for a method and url
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockResponse {
    /// Method to match
    pub method: Method,
    /// Url to match
    pub url: String,
    /// Body to answer with
    pub body: Option<String>,
    /// Status to answer with
    pub status: u16,
    /// Content type to answer with
    pub content_type: String,
    /// Derive `Content-Length` from the body
    pub auto_calculate_content_length: bool,
    /// Extra headers to answer with
    pub headers: BTreeMap<String, String>,
}

impl MockResponse {
    /// Empty `200 text/plain` response for `method url`
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            status: 200,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            auto_calculate_content_length: false,
            headers: BTreeMap::new(),
        }
    }

    /// Set the status
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the content type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Add a response header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Toggle `Content-Length` derivation
    #[must_use]
    pub fn with_auto_calculate_content_length(mut self, enabled: bool) -> Self {
        self.auto_calculate_content_length = enabled;
        self
    }

    /// Whether this entry answers `method url`
    #[must_use]
    pub fn matches(&self, method: Method, url: &str) -> bool {
        self.method == method && self.url == url
    }

    /// `Content-Length` to send, if derived from the body
    #[must_use]
    pub fn content_length(&self) -> Option<usize> {
        self.auto_calculate_content_length
            .then(|| self.body.as_ref().map_or(0, String::len))
    }

    /// Build the response handed back to the client
    #[must_use]
    pub fn to_http_response(&self) -> HttpResponse {
        let mut headers = vec![("content-type".to_string(), self.content_type.clone())];
        if let Some(length) = self.content_length() {
            headers.push(("content-length".to_string(), length.to_string()));
        }
        headers.extend(
            self.headers
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone())),
        );

        HttpResponse {
            status: self.status,
            headers,
            body: self.body.clone().unwrap_or_default(),
        }
    }

    fn describe(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

impl From<CallRecord> for MockResponse {
    fn from(record: CallRecord) -> Self {
        Self {
            method: record.method,
            url: record.url,
            body: record.body,
            status: record.status,
            content_type: record.content_type,
            auto_calculate_content_length: record.auto_calculate_content_length,
            headers: record.headers.unwrap_or_default(),
        }
    }
}

impl From<&MockResponse> for CallRecord {
    fn from(mock: &MockResponse) -> Self {
        Self {
            method: mock.method,
            url: mock.url.clone(),
            body: mock.body.clone(),
            status: mock.status,
            content_type: mock.content_type.clone(),
            auto_calculate_content_length: mock.auto_calculate_content_length,
            headers: (!mock.headers.is_empty()).then(|| mock.headers.clone()),
        }
    }
}

/// How intercepted requests are matched against registrations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// First matching entry wins; duplicates are consumed in order and the
    /// last one keeps answering
    #[default]
    FirstMatch,
    /// Each request must match the next entry, which is then consumed
    Ordered,
}

/// Registered responses in registration order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    policy: MatchPolicy,
    entries: Vec<MockResponse>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
        }
    }

    /// Matching policy
    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Append a response, normalizing its url
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn add(&mut self, mut response: MockResponse) -> Result<()> {
        response.url = normalize_url(&response.url)?;
        self.entries.push(response);
        Ok(())
    }

    /// Registered responses in order
    #[must_use]
    pub fn registered(&self) -> &[MockResponse] {
        &self.entries
    }

    /// Number of registered responses
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every registration
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Find the response for `request` under the registry's policy
    ///
    /// # Errors
    ///
    /// Returns `ConnectionRefused` when nothing matches, or `OrderMismatch`
    /// when an ordered registry sees an unexpected request
    pub fn find(&mut self, request: &HttpRequest) -> Result<MockResponse> {
        match self.policy {
            MatchPolicy::FirstMatch => self.find_first(request),
            MatchPolicy::Ordered => self.find_ordered(request),
        }
    }

    fn find_first(&mut self, request: &HttpRequest) -> Result<MockResponse> {
        let mut found = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matches(request.method, &request.url))
            .map(|(i, _)| i);

        let Some(first) = found.next() else {
            return Err(refused(request));
        };

        if found.next().is_some() {
            Ok(self.entries.remove(first))
        } else {
            Ok(self.entries[first].clone())
        }
    }

    fn find_ordered(&mut self, request: &HttpRequest) -> Result<MockResponse> {
        let Some(next) = self.entries.first() else {
            return Err(refused(request));
        };

        if !next.matches(request.method, &request.url) {
            return Err(CannedError::OrderMismatch {
                expected: next.describe(),
                actual: format!("{} {}", request.method, request.url),
            });
        }

        Ok(self.entries.remove(0))
    }
}

fn refused(request: &HttpRequest) -> CannedError {
    CannedError::ConnectionRefused {
        method: request.method,
        url: request.url.clone(),
    }
}
