//! YAML codec (default)

use std::io::{Read, Write};

use tracing::debug;

use super::{DocumentCodec, Format};
use crate::document::Document;
use crate::{CannedError, Result};

/// Reads and writes recording documents as YAML text
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl DocumentCodec for YamlCodec {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn dump(&self, document: &Document, sink: &mut dyn Write) -> Result<()> {
        let text = serde_yaml::to_string(document).map_err(|e| CannedError::Serialize {
            format: Format::Yaml,
            message: e.to_string(),
        })?;
        sink.write_all(text.as_bytes())?;

        debug!("Dumped {} responses as YAML", document.len());
        Ok(())
    }

    fn load(&self, source: &mut dyn Read) -> Result<Document> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        let text = String::from_utf8(bytes).map_err(|e| CannedError::Parse {
            format: Format::Yaml,
            message: format!("not UTF-8: {e}"),
        })?;

        serde_yaml::from_str(&text).map_err(|e| CannedError::Parse {
            format: Format::Yaml,
            message: e.to_string(),
        })
    }
}
