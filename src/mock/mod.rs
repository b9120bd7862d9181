//! Interception layer: registered mock responses and a client that uses them

mod registry;
mod transport;

pub use registry::{MatchPolicy, MockResponse, Registry};
pub use transport::MockTransport;

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::codec::{DocumentCodec, YamlCodec};
use crate::config::Config;
use crate::network::{Client, HttpRequest, HttpResponse, Transport};
use crate::record::Method;
use crate::{replay, Result};

/// One request seen by the mock transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// The intercepted request
    pub request: HttpRequest,
    /// What it was answered with, `None` if refused
    pub response: Option<HttpResponse>,
}

/// Mock registry plus the codec used to replay recordings into it
#[derive(Clone)]
pub struct Mock {
    registry: Arc<Mutex<Registry>>,
    calls: Arc<Mutex<Vec<Call>>>,
    codec: Arc<dyn DocumentCodec>,
}

impl Mock {
    /// First-match registry replaying YAML recordings
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(MatchPolicy::default())
    }

    /// Registry with the given matching policy
    #[must_use]
    pub fn with_policy(policy: MatchPolicy) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new(policy))),
            calls: Arc::new(Mutex::new(Vec::new())),
            codec: Arc::new(YamlCodec),
        }
    }

    /// Replace the codec used by [`Mock::add_from_file`]
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn DocumentCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Build from configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::with_policy(config.match_policy).with_codec(config.format.codec())
    }

    /// Codec used for replay
    #[must_use]
    pub fn codec(&self) -> &Arc<dyn DocumentCodec> {
        &self.codec
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a response
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn add(&self, response: MockResponse) -> Result<()> {
        debug!("Registering {} {}", response.method, response.url);
        self.registry().add(response)
    }

    /// Register an empty `200` answer for `GET url`
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn get(&self, url: &str) -> Result<()> {
        self.add(MockResponse::new(Method::Get, url))
    }

    /// Register an empty `200` answer for `HEAD url`
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn head(&self, url: &str) -> Result<()> {
        self.add(MockResponse::new(Method::Head, url))
    }

    /// Register an empty `200` answer for `POST url`
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn post(&self, url: &str) -> Result<()> {
        self.add(MockResponse::new(Method::Post, url))
    }

    /// Register an empty `200` answer for `PUT url`
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn put(&self, url: &str) -> Result<()> {
        self.add(MockResponse::new(Method::Put, url))
    }

    /// Register an empty `200` answer for `PATCH url`
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn patch(&self, url: &str) -> Result<()> {
        self.add(MockResponse::new(Method::Patch, url))
    }

    /// Register an empty `200` answer for `DELETE url`
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn delete(&self, url: &str) -> Result<()> {
        self.add(MockResponse::new(Method::Delete, url))
    }

    /// Register an empty `200` answer for `OPTIONS url`
    ///
    /// # Errors
    ///
    /// Returns error if the url is not absolute
    pub fn options(&self, url: &str) -> Result<()> {
        self.add(MockResponse::new(Method::Options, url))
    }

    /// Snapshot of registered responses in registration order
    #[must_use]
    pub fn registered(&self) -> Vec<MockResponse> {
        self.registry().registered().to_vec()
    }

    /// Requests intercepted so far
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop registrations and the call log
    pub fn reset(&self) {
        self.registry().reset();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Transport answering from this registry
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::new(MockTransport::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.calls),
        ))
    }

    /// Client whose calls are answered by this registry
    #[must_use]
    pub fn client(&self) -> Client {
        Client::new(self.transport())
    }

    /// Run `work` with a mocked client, then reset.
    ///
    /// The registry is cleared whether or not `work` succeeds.
    ///
    /// # Errors
    ///
    /// Returns whatever `work` returns
    pub async fn activate<F, Fut, T>(&self, work: F) -> Result<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let result = work(self.client()).await;
        self.reset();
        result
    }

    /// Register every response in a recording, in file order, using the
    /// mock's codec
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not a valid recording;
    /// nothing is registered in that case
    pub fn add_from_file(&self, file_path: impl AsRef<Path>) -> Result<usize> {
        replay::add_from_file(self, file_path.as_ref(), self.codec.as_ref())
    }

    /// Like [`Mock::add_from_file`] with an explicit codec
    ///
    /// # Errors
    ///
    /// See [`Mock::add_from_file`]
    pub fn add_from_file_with(
        &self,
        file_path: impl AsRef<Path>,
        codec: &dyn DocumentCodec,
    ) -> Result<usize> {
        replay::add_from_file(self, file_path.as_ref(), codec)
    }
}

impl Default for Mock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CannedError;

    #[tokio::test]
    async fn test_client_answers_from_registry() {
        let mock = Mock::new();
        mock.add(
            MockResponse::new(Method::Get, "http://example.com/404")
                .with_status(404)
                .with_body("404 Not Found"),
        )
        .unwrap();

        let response = mock.client().get("http://example.com/404").await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, "404 Not Found");
        assert_eq!(response.content_type(), Some("text/plain"));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_call_is_refused_and_logged() {
        let mock = Mock::new();
        mock.get("http://example.com/").unwrap();

        let result = mock.client().put("http://example.com/").await;

        assert!(matches!(result, Err(CannedError::ConnectionRefused { .. })));
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].response.is_none());
    }

    #[tokio::test]
    async fn test_activate_resets_registry() {
        let mock = Mock::new();

        let status = mock
            .activate(|client| {
                let mock = mock.clone();
                async move {
                    mock.post("http://httpbin.org/form")?;
                    let response = client.post("http://httpbin.org/form", "x=1").await?;
                    assert_eq!(mock.registered().len(), 1);
                    Ok(response.status)
                }
            })
            .await
            .unwrap();

        assert_eq!(status, 200);
        assert!(mock.registered().is_empty());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_activate_resets_on_error() {
        let mock = Mock::new();
        mock.get("http://example.com/").unwrap();

        let result: Result<()> = mock
            .activate(|client| async move {
                client.delete("http://example.com/").await?;
                Ok(())
            })
            .await;

        assert!(result.is_err());
        assert!(mock.registered().is_empty());
    }

    #[test]
    fn test_shortcuts_register_in_order() {
        let mock = Mock::new();
        mock.patch("http://httpbin.org").unwrap();
        mock.delete("http://httpbin.org/item").unwrap();
        mock.options("http://httpbin.org/item").unwrap();

        let methods: Vec<Method> = mock.registered().iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![Method::Patch, Method::Delete, Method::Options]);
    }
}
