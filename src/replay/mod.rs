//! Replay of recording files into the mock registry

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{debug, info};

use crate::codec::DocumentCodec;
use crate::mock::{Mock, MockResponse};
use crate::record::CallRecord;
use crate::Result;

/// Read and validate a recording, returning its records in file order
///
/// # Errors
///
/// Returns error if the file cannot be opened, fails to parse, or holds an
/// invalid entry
pub fn load_records(file_path: &Path, codec: &dyn DocumentCodec) -> Result<Vec<CallRecord>> {
    debug!("Loading {} recording: {}", codec.format(), file_path.display());

    let file = File::open(file_path)?;
    let mut reader = BufReader::new(file);
    let document = codec.load(&mut reader)?;

    document.into_records()
}

/// Register every response of a recording with `mock`, in file order.
///
/// The whole file is parsed and validated before the first registration.
/// Returns the number of responses registered.
///
/// # Errors
///
/// See [`load_records`]
pub fn add_from_file(mock: &Mock, file_path: &Path, codec: &dyn DocumentCodec) -> Result<usize> {
    let records = load_records(file_path, codec)?;
    let count = records.len();

    for record in records {
        mock.add(MockResponse::from(record))?;
    }

    info!(
        "Registered {} responses from '{}'",
        count,
        file_path.display()
    );

    Ok(count)
}
