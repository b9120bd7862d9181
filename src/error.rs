//! Error types for Canned

use std::io;
use thiserror::Error;

use crate::codec::Format;
use crate::record::Method;

/// Result type for Canned operations
pub type Result<T> = std::result::Result<T, CannedError>;

/// Errors that can occur in Canned
#[derive(Debug, Error)]
pub enum CannedError {
    /// I/O error while reading or writing a recording
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Recording file could not be parsed into a document
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        /// Codec that attempted the parse
        format: Format,
        /// Parser message
        message: String,
    },

    /// Document could not be encoded by a codec
    #[error("Failed to serialize {format} document: {message}")]
    Serialize {
        /// Codec that attempted the encode
        format: Format,
        /// Serializer message
        message: String,
    },

    /// A document entry violates the field rules
    #[error("Invalid response at index {index}: {message}")]
    InvalidRecord {
        /// Zero-based position of the entry in the document
        index: usize,
        /// What is wrong with it
        message: String,
    },

    /// Unknown format name or file extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Unknown HTTP method name
    #[error("Unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// No registered mock matched an intercepted request
    #[error("Connection refused by mock registry: {method} {url}")]
    ConnectionRefused {
        /// Request method
        method: Method,
        /// Request url
        url: String,
    },

    /// Ordered registry received a request other than the next registered one
    #[error("Next registered response is {expected}, but request was {actual}")]
    OrderMismatch {
        /// Next registered `METHOD url`
        expected: String,
        /// Intercepted `METHOD url`
        actual: String,
    },

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body too large
    #[error("Data too large: {size} bytes exceeds limit of {limit} bytes")]
    DataTooLarge {
        /// Declared size, or `limit + 1` when the body was cut off while
        /// streaming
        size: usize,
        /// Size limit
        limit: usize,
    },

    /// Capture list reached its configured size
    #[error("Recording full: limit of {limit} responses reached")]
    RecordingFull {
        /// Configured maximum
        limit: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
