//! Transport wrapper that captures every observed response

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use super::{MAX_RECORDS, STRIPPED_HEADERS};
use crate::network::{HttpRequest, HttpResponse, Transport};
use crate::record::{CallRecord, DEFAULT_CONTENT_TYPE};
use crate::{CannedError, Result};

/// Forwards calls to an inner transport and appends a [`CallRecord`] for
/// each response
pub struct RecordingTransport {
    inner: Arc<dyn Transport>,
    captured: Arc<Mutex<Vec<CallRecord>>>,
    strip_headers: Vec<String>,
    max_records: usize,
}

impl RecordingTransport {
    /// Wrap `inner`, appending captures to `captured`
    #[must_use]
    pub fn new(inner: Arc<dyn Transport>, captured: Arc<Mutex<Vec<CallRecord>>>) -> Self {
        Self {
            inner,
            captured,
            strip_headers: Vec::new(),
            max_records: MAX_RECORDS,
        }
    }

    /// Also drop these response headers from captures
    #[must_use]
    pub fn with_strip_headers(mut self, names: &[String]) -> Self {
        self.strip_headers = names.iter().map(|n| n.to_ascii_lowercase()).collect();
        self
    }

    /// Cap the number of captures
    #[must_use]
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }

    fn keeps_header(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        !STRIPPED_HEADERS.contains(&name.as_str()) && !self.strip_headers.contains(&name)
    }

    fn captured(&self) -> MutexGuard<'_, Vec<CallRecord>> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_capacity(&self, captured: usize) -> Result<()> {
        if captured >= self.max_records {
            return Err(CannedError::RecordingFull {
                limit: self.max_records,
            });
        }
        Ok(())
    }

    fn capture(&self, request: &HttpRequest, response: &HttpResponse) -> CallRecord {
        // repeated headers are joined with ", "
        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in &response.headers {
            if !self.keeps_header(name) {
                continue;
            }
            headers
                .entry(name.to_ascii_lowercase())
                .and_modify(|joined| {
                    joined.push_str(", ");
                    joined.push_str(value);
                })
                .or_insert_with(|| value.clone());
        }

        CallRecord {
            method: request.method,
            url: request.url.clone(),
            body: Some(response.body.clone()),
            status: response.status,
            content_type: response
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string(),
            // replay trusts the recorded body instead of recomputing its length
            auto_calculate_content_length: false,
            headers: (!headers.is_empty()).then_some(headers),
        }
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        // a full recording refuses before the call reaches the server
        let count = self.captured().len();
        self.check_capacity(count)?;

        let response = self.inner.send(request.clone()).await?;
        let record = self.capture(&request, &response);

        let mut captured = self.captured();
        self.check_capacity(captured.len())?;
        captured.push(record);

        debug!(
            "Captured {} {} -> {} (count: {})",
            request.method,
            request.url,
            response.status,
            captured.len()
        );
        drop(captured);

        Ok(response)
    }
}
