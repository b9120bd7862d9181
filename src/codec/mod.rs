//! Pluggable text encodings for recording documents

mod toml;
mod yaml;

pub use self::toml::TomlCodec;
pub use self::yaml::YamlCodec;

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::{CannedError, Result};

/// Serializer/deserializer pair for one text encoding
pub trait DocumentCodec: fmt::Debug + Send + Sync {
    /// Encoding handled by this codec
    fn format(&self) -> Format;

    /// Encode `document` into `sink`
    ///
    /// # Errors
    ///
    /// Returns error if encoding or writing fails
    fn dump(&self, document: &Document, sink: &mut dyn Write) -> Result<()>;

    /// Decode a document from `source`
    ///
    /// # Errors
    ///
    /// Returns error if reading fails or the text is not a recording document
    fn load(&self, source: &mut dyn Read) -> Result<Document>;
}

/// Supported encodings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// YAML text
    #[default]
    Yaml,
    /// TOML text
    Toml,
}

impl Format {
    /// Pick a format from a file extension
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for a missing or unknown extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| CannedError::UnsupportedFormat(path.display().to_string()))?;
        extension.parse()
    }

    /// Shared codec instance for this format
    #[must_use]
    pub fn codec(self) -> Arc<dyn DocumentCodec> {
        match self {
            Self::Yaml => Arc::new(YamlCodec),
            Self::Toml => Arc::new(TomlCodec),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("YAML"),
            Self::Toml => f.write_str("TOML"),
        }
    }
}

impl FromStr for Format {
    type Err = CannedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(CannedError::UnsupportedFormat(s.to_string())),
        }
    }
}
