//! Flat record serialization
//!
//! Converts one matching observation into a delimited record of the form
//! `time=<ISO8601>,Station<N>,<var>=<value>,...`. A requested variable that
//! cannot be read poisons the whole record: any partial field output is
//! discarded and the record is replaced by a single `ERROR=` sentinel line.
//! The outcome is carried as a typed value and rendered to sentinel text only
//! at the response boundary, keeping the record-scoped failure distinct from
//! the response-scoped one handled by the extractor.

use crate::app::models::{iso_timestamp, Observation};
use crate::config::ResponseFormat;
use crate::constants::{RECORD_ERROR_PREFIX, RECORD_ERROR_SUFFIX, STATION_LABEL_PREFIX};
use tracing::warn;

/// Outcome of serializing one observation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedLine {
    /// Well-formed delimited record
    Record(String),
    /// Record-scoped failure; the cause replaces the record's fields
    RecordError(String),
}

impl SerializedLine {
    /// Render to response text, producing the in-band sentinel for the
    /// error case
    pub fn into_text(self) -> String {
        match self {
            SerializedLine::Record(record) => record,
            SerializedLine::RecordError(cause) => {
                format!("{}{}{}", RECORD_ERROR_PREFIX, cause, RECORD_ERROR_SUFFIX)
            }
        }
    }
}

/// Serializes observations into flat delimited records
pub struct RecordSerializer<'a> {
    variables: &'a [String],
    format: &'a ResponseFormat,
}

impl<'a> RecordSerializer<'a> {
    pub fn new(variables: &'a [String], format: &'a ResponseFormat) -> Self {
        Self { variables, format }
    }

    /// Serialize one observation for the station at the given ordinal
    ///
    /// Fields are emitted in a fixed order: timestamp, station ordinal, then
    /// the requested variables in request order. The first unreadable
    /// variable discards all partial output for the record.
    pub fn serialize(&self, observation: &Observation, station_ordinal: usize) -> SerializedLine {
        let mut fields = Vec::with_capacity(2 + self.variables.len());
        fields.push(format!("time={}", iso_timestamp(&observation.time)));
        fields.push(format!("{}{}", STATION_LABEL_PREFIX, station_ordinal));

        for variable in self.variables {
            match observation.value(variable) {
                Some(value) => fields.push(format!("{}={}", variable, value)),
                None => {
                    warn!(
                        variable = variable.as_str(),
                        station_ordinal, "requested variable absent from observation"
                    );
                    return SerializedLine::RecordError(format!(
                        "variable '{}' could not be read",
                        variable
                    ));
                }
            }
        }

        let delimiter = self.format.field_delimiter.to_string();
        SerializedLine::Record(fields.join(&delimiter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::ScalarValue;
    use crate::app::services::tests::utc;

    fn observation() -> Observation {
        Observation::new(
            utc("2020-01-01T00:00:00Z"),
            vec![
                ("air_temperature", ScalarValue::Float(4.5)),
                ("wind_speed", ScalarValue::Int(12)),
            ],
        )
    }

    #[test]
    fn test_record_fields_in_request_order() {
        let variables = vec!["wind_speed".to_string(), "air_temperature".to_string()];
        let format = ResponseFormat::default();
        let serializer = RecordSerializer::new(&variables, &format);

        let line = serializer.serialize(&observation(), 3);
        assert_eq!(
            line,
            SerializedLine::Record(
                "time=2020-01-01T00:00:00Z,Station3,wind_speed=12,air_temperature=4.5".to_string()
            )
        );
    }

    #[test]
    fn test_missing_variable_replaces_partial_record() {
        let variables = vec!["air_temperature".to_string(), "salinity".to_string()];
        let format = ResponseFormat::default();
        let serializer = RecordSerializer::new(&variables, &format);

        let text = serializer.serialize(&observation(), 0).into_text();
        assert!(text.starts_with("ERROR=reading data from dataset: "));
        assert!(text.contains("salinity"));
        // no partial field output survives
        assert!(!text.contains("time="));
        assert!(!text.contains("air_temperature=4.5"));
    }

    #[test]
    fn test_round_trip_of_well_formed_record() {
        let variables = vec!["air_temperature".to_string(), "wind_speed".to_string()];
        let format = ResponseFormat::default();
        let serializer = RecordSerializer::new(&variables, &format);
        let source = observation();

        let SerializedLine::Record(record) = serializer.serialize(&source, 2) else {
            panic!("expected a well-formed record");
        };

        let mut fields = record.split(',');
        assert_eq!(fields.next(), Some("time=2020-01-01T00:00:00Z"));
        assert_eq!(fields.next(), Some("Station2"));
        for field in fields {
            let (name, value) = field.split_once('=').unwrap();
            assert_eq!(value, source.value(name).unwrap().to_string());
        }
    }

    #[test]
    fn test_custom_field_delimiter() {
        let variables = vec!["wind_speed".to_string()];
        let format = ResponseFormat::new('|', ';');
        let serializer = RecordSerializer::new(&variables, &format);

        let text = serializer.serialize(&observation(), 0).into_text();
        assert_eq!(text, "time=2020-01-01T00:00:00Z|Station0|wind_speed=12");
    }
}
