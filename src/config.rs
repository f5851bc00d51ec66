//! Configuration for the flat-record response format.
//!
//! Provides the delimiter configuration used when serializing observation
//! records, with defaults matching the historical SOS flat-text layout
//! (`,` between fields, `;` between records).

use crate::constants::{DEFAULT_FIELD_DELIMITER, DEFAULT_RECORD_SEPARATOR};
use serde::{Deserialize, Serialize};

/// Delimiters used by the record serializer and extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFormat {
    /// Delimiter between the fields of one observation record
    pub field_delimiter: char,

    /// Separator appended after each record when a station contributes more
    /// than one observation to the response
    pub record_separator: char,
}

impl Default for ResponseFormat {
    fn default() -> Self {
        Self {
            field_delimiter: DEFAULT_FIELD_DELIMITER,
            record_separator: DEFAULT_RECORD_SEPARATOR,
        }
    }
}

impl ResponseFormat {
    /// Create a format with explicit delimiters
    pub fn new(field_delimiter: char, record_separator: char) -> Self {
        Self {
            field_delimiter,
            record_separator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_matches_flat_text_layout() {
        let format = ResponseFormat::default();
        assert_eq!(format.field_delimiter, ',');
        assert_eq!(format.record_separator, ';');
    }

    #[test]
    fn test_custom_format() {
        let format = ResponseFormat::new('|', '\n');
        assert_eq!(format.field_delimiter, '|');
        assert_eq!(format.record_separator, '\n');
    }
}
