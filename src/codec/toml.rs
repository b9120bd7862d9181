//! TOML codec

use std::io::{Read, Write};

use tracing::debug;

use super::{DocumentCodec, Format};
use crate::document::Document;
use crate::{CannedError, Result};

/// Reads and writes recording documents as TOML text
///
/// The document becomes an array of `[[responses]]` tables, each holding a
/// `[responses.response]` sub-table. TOML has no null, so an absent body is
/// simply left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl DocumentCodec for TomlCodec {
    fn format(&self) -> Format {
        Format::Toml
    }

    fn dump(&self, document: &Document, sink: &mut dyn Write) -> Result<()> {
        let text = ::toml::to_string(document).map_err(|e| CannedError::Serialize {
            format: Format::Toml,
            message: e.to_string(),
        })?;
        sink.write_all(text.as_bytes())?;

        debug!("Dumped {} responses as TOML", document.len());
        Ok(())
    }

    fn load(&self, source: &mut dyn Read) -> Result<Document> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;

        let text = std::str::from_utf8(&bytes).map_err(|e| CannedError::Parse {
            format: Format::Toml,
            message: format!("not UTF-8: {e}"),
        })?;

        ::toml::from_str(text).map_err(|e| CannedError::Parse {
            format: Format::Toml,
            message: e.to_string(),
        })
    }
}
