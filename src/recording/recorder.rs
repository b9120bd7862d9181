//! Recorder: run work, capture its calls, write them out

use std::fs::File;
use std::future::Future;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::{RecordingTransport, DEFAULT_RECORD_PATH, MAX_RECORDS};
use crate::codec::{DocumentCodec, YamlCodec};
use crate::config::Config;
use crate::document;
use crate::network::{Client, HttpTransport, Transport};
use crate::record::CallRecord;
use crate::Result;

/// Captures the HTTP calls made by a unit of work and writes them to a file
pub struct Recorder {
    codec: Arc<dyn DocumentCodec>,
    transport: Arc<dyn Transport>,
    last_session: Mutex<Vec<CallRecord>>,
    default_path: PathBuf,
    strip_headers: Vec<String>,
    max_records: usize,
}

impl Recorder {
    /// Recorder writing YAML and calling the real network
    #[must_use]
    pub fn new() -> Self {
        Self::with_codec(Arc::new(YamlCodec))
    }

    /// Recorder writing with `codec` and calling the real network
    #[must_use]
    pub fn with_codec(codec: Arc<dyn DocumentCodec>) -> Self {
        Self {
            codec,
            transport: Arc::new(HttpTransport::new()),
            last_session: Mutex::new(Vec::new()),
            default_path: PathBuf::from(DEFAULT_RECORD_PATH),
            strip_headers: Vec::new(),
            max_records: MAX_RECORDS,
        }
    }

    /// Build from configuration
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let mut recorder = Self::with_codec(config.format.codec())
            .with_transport(Arc::new(HttpTransport::with_body_limit(
                config.limits.max_body_size,
            )));
        recorder.default_path.clone_from(&config.record_path);
        recorder.strip_headers.clone_from(&config.strip_headers);
        recorder.max_records = config.limits.max_records;
        recorder
    }

    /// Send calls through `transport` instead of the real network
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Codec used for writing
    #[must_use]
    pub fn codec(&self) -> &Arc<dyn DocumentCodec> {
        &self.codec
    }

    fn last_session(&self) -> MutexGuard<'_, Vec<CallRecord>> {
        self.last_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Responses captured by the latest finished session, in call order
    #[must_use]
    pub fn registered(&self) -> Vec<CallRecord> {
        self.last_session().clone()
    }

    /// Forget captured responses
    pub fn reset(&self) {
        self.last_session().clear();
    }

    /// Run `work` with a recording client and write every call it made to
    /// `file_path`.
    ///
    /// Returns the work's value. If `work` fails, nothing is written and its
    /// error is returned.
    ///
    /// Each call captures into its own list: a client kept past the end of
    /// its session, or one from a concurrent session, never appears in this
    /// session's file.
    ///
    /// # Errors
    ///
    /// Returns the work's error, or an error writing the file
    pub async fn record<F, Fut, T>(&self, file_path: impl AsRef<Path>, work: F) -> Result<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let file_path = file_path.as_ref();
        let session = Arc::new(Mutex::new(Vec::new()));

        let transport =
            RecordingTransport::new(Arc::clone(&self.transport), Arc::clone(&session))
                .with_strip_headers(&self.strip_headers)
                .with_max_records(self.max_records);
        let client = Client::new(Arc::new(transport));

        info!("Recording session started: {}", file_path.display());

        let outcome = work(client).await;

        // a client kept past this point appends to `session`, which is never read again
        let registered =
            std::mem::take(&mut *session.lock().unwrap_or_else(PoisonError::into_inner));
        self.last_session().clone_from(&registered);

        let value = match outcome {
            Ok(value) => value,
            Err(e) => {
                warn!("Recording abandoned after {} responses: {e}", registered.len());
                return Err(e);
            }
        };

        self.dump_to_file(file_path, &registered)?;

        info!(
            "Recording session finished: {} responses -> {}",
            registered.len(),
            file_path.display()
        );

        Ok(value)
    }

    /// [`Recorder::record`] into the configured default path
    ///
    /// # Errors
    ///
    /// See [`Recorder::record`]
    pub async fn record_default<F, Fut, T>(&self, work: F) -> Result<T>
    where
        F: FnOnce(Client) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let path = self.default_path.clone();
        self.record(path, work).await
    }

    /// Write `registered` to `file_path` with the recorder's codec
    ///
    /// The document is encoded before the file is opened, so an encoding
    /// failure leaves an existing file untouched.
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails or the file cannot be created or written
    pub fn dump_to_file(&self, file_path: &Path, registered: &[CallRecord]) -> Result<()> {
        debug!(
            "Writing {} responses as {} to {}",
            registered.len(),
            self.codec.format(),
            file_path.display()
        );

        let mut encoded = Vec::new();
        document::dump(registered, &mut encoded, self.codec.as_ref())?;

        let file = File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&encoded)?;
        writer.flush()?;

        Ok(())
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}
