//! Persisted document shape shared by every codec
//!
//! A recording file is a mapping with a single `responses` key bound to an
//! ordered list of single-key `response` mappings:
//!
//! ```yaml
//! responses:
//! - response:
//!     method: GET
//!     url: http://example.com/404
//!     body: 404 Not Found
//!     status: 404
//!     content_type: text/plain
//!     auto_calculate_content_length: false
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::codec::DocumentCodec;
use crate::record::CallRecord;
use crate::{CannedError, Result};

/// Top-level recording document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Entries in call order
    pub responses: Vec<Entry>,
}

/// Single-key wrapper around one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    /// The wrapped record
    pub response: CallRecord,
}

impl Document {
    /// Wrap records in the persisted shape, keeping their order
    #[must_use]
    pub fn from_records(records: &[CallRecord]) -> Self {
        Self {
            responses: records
                .iter()
                .cloned()
                .map(|response| Entry { response })
                .collect(),
        }
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Whether the document has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Check every entry against the field rules
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecord` for the first offending entry
    pub fn validate(&self) -> Result<()> {
        for (index, entry) in self.responses.iter().enumerate() {
            entry
                .response
                .check()
                .map_err(|message| CannedError::InvalidRecord { index, message })?;
        }
        Ok(())
    }

    /// Validate and unwrap into records, in document order
    ///
    /// # Errors
    ///
    /// Returns `InvalidRecord` if any entry is invalid; nothing is returned
    /// in that case
    pub fn into_records(self) -> Result<Vec<CallRecord>> {
        self.validate()?;
        Ok(self.responses.into_iter().map(|e| e.response).collect())
    }
}

/// Wrap `records` in the document shape and hand it to `codec`
///
/// # Errors
///
/// Returns error if the codec fails to encode or the sink rejects the write
pub fn dump(records: &[CallRecord], sink: &mut dyn Write, codec: &dyn DocumentCodec) -> Result<()> {
    let document = Document::from_records(records);
    codec.dump(&document, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::YamlCodec;
    use crate::record::Method;

    fn sample() -> Vec<CallRecord> {
        vec![
            CallRecord::new(Method::Get, "http://example.com:8080/404")
                .with_status(404)
                .with_body("404 Not Found"),
            CallRecord::new(Method::Put, "http://example.com:8080/202")
                .with_status(202)
                .with_body("OK"),
        ]
    }

    #[test]
    fn test_from_records_keeps_order() {
        let document = Document::from_records(&sample());

        assert_eq!(document.len(), 2);
        assert_eq!(document.responses[0].response.status, 404);
        assert_eq!(document.responses[1].response.method, Method::Put);
    }

    #[test]
    fn test_into_records_rejects_bad_entry() {
        let mut records = sample();
        records[1].status = 1000;

        let err = Document::from_records(&records).into_records().unwrap_err();
        assert!(matches!(err, CannedError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_dump_writes_wrapped_shape() {
        let mut buffer = Vec::new();
        dump(&sample(), &mut buffer, &YamlCodec).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("responses:"));
        assert!(text.contains("- response:"));
        assert!(text.contains("auto_calculate_content_length: false"));
    }

    #[test]
    fn test_empty_document() {
        let document = Document::from_records(&[]);
        assert!(document.is_empty());
        assert!(document.into_records().unwrap().is_empty());
    }
}
