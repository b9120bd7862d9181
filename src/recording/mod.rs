//! Recording of real HTTP exchanges into replayable files

mod recorder;
mod transport;

pub use recorder::Recorder;
pub use transport::RecordingTransport;

/// File written when no path is given
pub const DEFAULT_RECORD_PATH: &str = "response.yaml";

/// Maximum number of responses captured in one session
pub const MAX_RECORDS: usize = 4096;

/// Response headers never written to a recording.
///
/// `content-type` has its own field; the others describe the upstream
/// connection rather than the response.
pub const STRIPPED_HEADERS: &[&str] = &[
    "content-type",
    "content-length",
    "transfer-encoding",
    "connection",
    "date",
];
