//! Transport answering from the mock registry

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::registry::Registry;
use super::Call;
use crate::network::{HttpRequest, HttpResponse, Transport};
use crate::Result;

/// Transport that never touches the network
pub struct MockTransport {
    registry: Arc<Mutex<Registry>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl MockTransport {
    pub(super) fn new(registry: Arc<Mutex<Registry>>, calls: Arc<Mutex<Vec<Call>>>) -> Self {
        Self { registry, calls }
    }

    fn log(&self, request: HttpRequest, response: Option<HttpResponse>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call { request, response });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let found = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .find(&request);

        match found {
            Ok(mock) => {
                debug!("Mock hit: {} {} -> {}", request.method, request.url, mock.status);
                let response = mock.to_http_response();
                self.log(request, Some(response.clone()));
                Ok(response)
            }
            Err(e) => {
                warn!("Mock miss: {e}");
                self.log(request, None);
                Err(e)
            }
        }
    }
}
