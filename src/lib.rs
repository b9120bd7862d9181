//! Canned - HTTP mocks for unit tests, with record and replay
//!
//! A [`Mock`] answers calls made through its [`Client`] from registered
//! responses. A [`Recorder`] runs a unit of work against real servers and
//! writes every exchange to a YAML or TOML file, which
//! [`Mock::add_from_file`] later registers again in the same order.

#![deny(unsafe_code)]
#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::multiple_crate_versions
)]

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod mock;
pub mod network;
pub mod record;
pub mod recording;
pub mod replay;

pub use codec::{DocumentCodec, Format, TomlCodec, YamlCodec};
pub use error::{CannedError, Result};
pub use mock::{MatchPolicy, Mock, MockResponse};
pub use network::{Client, HttpRequest, HttpResponse, Transport};
pub use record::{CallRecord, Method};
pub use recording::Recorder;
