//! Configuration types for Canned

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::codec::Format;
use crate::mock::MatchPolicy;
use crate::network::MAX_BODY_SIZE;
use crate::recording::{DEFAULT_RECORD_PATH, MAX_RECORDS};
use crate::{CannedError, Result};

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Encoding for recordings
    #[serde(default)]
    pub format: Format,
    /// File written by `Recorder::record_default`
    #[serde(default = "default_record_path")]
    pub record_path: PathBuf,
    /// How the mock registry matches requests
    #[serde(default)]
    pub match_policy: MatchPolicy,
    /// Extra response headers dropped when capturing
    #[serde(default)]
    pub strip_headers: Vec<String>,
    /// Resource limits
    #[serde(default)]
    pub limits: LimitsConfig,
}

fn default_record_path() -> PathBuf {
    PathBuf::from(DEFAULT_RECORD_PATH)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: Format::default(),
            record_path: default_record_path(),
            match_policy: MatchPolicy::default(),
            strip_headers: Vec::new(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Resource limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum response body size in bytes
    pub max_body_size: usize,
    /// Maximum responses captured per recording session
    pub max_records: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: MAX_BODY_SIZE,
            max_records: MAX_RECORDS,
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CannedError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| CannedError::ConfigError(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        if self.record_path.as_os_str().is_empty() {
            return Err(CannedError::ConfigError(
                "record_path cannot be empty".to_string(),
            ));
        }

        // a recognised extension must agree with `format`
        if let Ok(by_extension) = Format::from_path(&self.record_path) {
            if by_extension != self.format {
                return Err(CannedError::ConfigError(format!(
                    "record_path {} does not match format {}",
                    self.record_path.display(),
                    self.format
                )));
            }
        }

        for (i, name) in self.strip_headers.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(CannedError::ConfigError(format!(
                    "strip_headers[{i}] cannot be empty"
                )));
            }
        }

        if self.limits.max_body_size == 0 {
            return Err(CannedError::ConfigError(
                "max_body_size must be > 0".to_string(),
            ));
        }

        if self.limits.max_records == 0 {
            return Err(CannedError::ConfigError(
                "max_records must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
