//! Per-station time-series extraction
//!
//! Orchestrates one forward pass over a station's observation points: each
//! point is checked against the compiled temporal filter, matching points are
//! serialized and appended to the response. Two failure scopes apply and must
//! not be confused: a record-scoped read failure replaces one record with an
//! in-band sentinel and the pass continues; a failure of the per-station
//! cardinality query (which decides whether records need a terminating
//! separator) replaces the entire accumulated response. Setup failures
//! (opening the feature, reading a point) abort the request with a structured
//! error. The point cursor is released on every exit path when it drops.

use crate::app::models::Station;
use crate::app::services::catalog::StationCatalog;
use crate::app::services::serializer::RecordSerializer;
use crate::app::services::temporal::{EventTimeSpec, TemporalFilter};
use crate::config::ResponseFormat;
use crate::constants::RESPONSE_ERROR_PREFIX;
use crate::Result;
use tracing::{debug, error};

/// Streams one station's points through the temporal filter into a flat
/// text response
pub struct TimeSeriesExtractor<'a> {
    filter: TemporalFilter,
    variables: &'a [String],
    format: &'a ResponseFormat,
}

impl<'a> TimeSeriesExtractor<'a> {
    /// Compile the event-time spec and build an extractor
    ///
    /// A malformed interval endpoint surfaces here, before any I/O.
    pub fn new(
        spec: &EventTimeSpec,
        variables: &'a [String],
        format: &'a ResponseFormat,
    ) -> Result<Self> {
        Ok(Self {
            filter: TemporalFilter::compile(spec)?,
            variables,
            format,
        })
    }

    /// Produce the full concatenated response text for one station
    ///
    /// Opens a fresh forward-only cursor, so the extractor is safely
    /// re-invocable. Per-record sentinels do not stop the pass.
    pub fn extract<C: StationCatalog + ?Sized>(
        &self,
        catalog: &C,
        station: &Station,
        ordinal: usize,
    ) -> Result<String> {
        let feature = catalog.feature(station)?;
        let serializer = RecordSerializer::new(self.variables, self.format);

        let mut response = String::new();
        let mut matched = 0usize;

        let points = feature.points()?;
        for point in points {
            let observation = point?;
            if !self.filter.matches(observation.time) {
                continue;
            }
            matched += 1;

            let line = serializer.serialize(&observation, ordinal);
            response.push_str(&line.into_text());

            // terminate the line when the station contributes more than one
            // observation, so records (and sentinel lines) concatenate
            // unambiguously
            match feature.observation_count() {
                Ok(count) if count > 1 => response.push(self.format.record_separator),
                Ok(_) => {}
                Err(err) => {
                    // broader blast radius than a record failure: the whole
                    // accumulated response is replaced
                    error!(
                        station = station.name.as_str(),
                        error = %err,
                        "cardinality query failed, replacing accumulated response"
                    );
                    return Ok(format!("{}{}", RESPONSE_ERROR_PREFIX, err));
                }
            }
        }

        debug!(
            station = station.name.as_str(),
            ordinal, matched, "extraction pass complete"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::adapters::memory::MemoryCatalog;
    use crate::app::models::ScalarValue;
    use crate::app::services::tests::{catalog_with_observations, observation};

    fn extract(catalog: &MemoryCatalog, spec: &EventTimeSpec, variables: &[String]) -> String {
        let format = ResponseFormat::default();
        let extractor = TimeSeriesExtractor::new(spec, variables, &format).unwrap();
        let station = catalog.station_at(0).unwrap().clone();
        extractor.extract(catalog, &station, 0).unwrap()
    }

    #[test]
    fn test_unbounded_extraction_of_single_observation() {
        let catalog = catalog_with_observations(vec![observation("2020-01-01T00:00:00Z", 4.5)]);
        let variables = vec!["air_temperature".to_string()];

        let response = extract(&catalog, &EventTimeSpec::Unbounded, &variables);
        // single observation, no terminating separator
        assert_eq!(
            response,
            "time=2020-01-01T00:00:00Z,Station0,air_temperature=4.5"
        );
    }

    #[test]
    fn test_multiple_observations_are_separator_terminated() {
        let catalog = catalog_with_observations(vec![
            observation("2020-01-01T00:00:00Z", 4.5),
            observation("2020-01-01T01:00:00Z", 5.0),
        ]);
        let variables = vec!["air_temperature".to_string()];

        let response = extract(&catalog, &EventTimeSpec::Unbounded, &variables);
        assert_eq!(
            response,
            "time=2020-01-01T00:00:00Z,Station0,air_temperature=4.5;\
             time=2020-01-01T01:00:00Z,Station0,air_temperature=5;"
        );
    }

    #[test]
    fn test_instant_filter_selects_exactly_one_observation() {
        let catalog = catalog_with_observations(vec![
            observation("2020-01-01T00:00:00Z", 4.5),
            observation("2020-01-01T01:00:00Z", 5.0),
        ]);
        let variables = vec!["air_temperature".to_string()];
        let spec = EventTimeSpec::Instant("2020-01-01T01:00:00Z".to_string());

        let response = extract(&catalog, &spec, &variables);
        assert_eq!(
            response,
            "time=2020-01-01T01:00:00Z,Station0,air_temperature=5;"
        );
    }

    #[test]
    fn test_interval_filter_includes_boundary_observations() {
        let catalog = catalog_with_observations(vec![
            observation("2020-01-01T00:00:00Z", 1.0),
            observation("2020-01-01T01:00:00Z", 2.0),
            observation("2020-01-01T02:00:00Z", 3.0),
            observation("2020-01-01T03:00:00Z", 4.0),
        ]);
        let variables = vec!["air_temperature".to_string()];
        let spec = EventTimeSpec::Interval {
            start: "2020-01-01T00:00:00Z".to_string(),
            end: "2020-01-01T02:00:00Z".to_string(),
        };

        let response = extract(&catalog, &spec, &variables);
        assert!(response.contains("time=2020-01-01T00:00:00Z"));
        assert!(response.contains("time=2020-01-01T01:00:00Z"));
        assert!(response.contains("time=2020-01-01T02:00:00Z"));
        assert!(!response.contains("time=2020-01-01T03:00:00Z"));
    }

    #[test]
    fn test_record_error_does_not_stop_the_pass() {
        let mut good_first = observation("2020-01-01T00:00:00Z", 1.0);
        good_first.values.insert(
            "wind_speed".to_string(),
            ScalarValue::Float(10.0),
        );
        let missing_var = observation("2020-01-01T01:00:00Z", 2.0);
        let mut good_last = observation("2020-01-01T02:00:00Z", 3.0);
        good_last
            .values
            .insert("wind_speed".to_string(), ScalarValue::Float(12.0));

        let catalog = catalog_with_observations(vec![good_first, missing_var, good_last]);
        let variables = vec!["air_temperature".to_string(), "wind_speed".to_string()];

        let response = extract(&catalog, &EventTimeSpec::Unbounded, &variables);
        let records: Vec<&str> = response
            .split(';')
            .filter(|record| !record.is_empty())
            .collect();
        assert_eq!(records.len(), 3);
        assert_eq!(
            records
                .iter()
                .filter(|record| record.starts_with("time="))
                .count(),
            2
        );
        assert_eq!(
            records
                .iter()
                .filter(|record| record.starts_with("ERROR=reading data from dataset: "))
                .count(),
            1
        );
        assert!(response.contains("time=2020-01-01T02:00:00Z"));
    }

    #[test]
    fn test_cardinality_failure_replaces_entire_response() {
        let mut catalog = catalog_with_observations(vec![
            observation("2020-01-01T00:00:00Z", 1.0),
            observation("2020-01-01T01:00:00Z", 2.0),
        ]);
        catalog.fail_cardinality_for("41001");
        let variables = vec!["air_temperature".to_string()];

        let response = extract(&catalog, &EventTimeSpec::Unbounded, &variables);
        assert!(response.starts_with(
            "ERROR=received the following error when reading the data of the dataset: "
        ));
        // nothing of the accumulated records survives
        assert!(!response.contains("time="));
    }

    #[test]
    fn test_point_read_failure_is_fatal() {
        let mut catalog = catalog_with_observations(vec![observation("2020-01-01T00:00:00Z", 1.0)]);
        catalog.fail_points_for("41001");
        let variables = vec!["air_temperature".to_string()];
        let format = ResponseFormat::default();
        let extractor =
            TimeSeriesExtractor::new(&EventTimeSpec::Unbounded, &variables, &format).unwrap();
        let station = catalog.station_at(0).unwrap().clone();

        assert!(extractor.extract(&catalog, &station, 0).is_err());
    }

    #[test]
    fn test_extractor_is_reinvocable() {
        let catalog = catalog_with_observations(vec![observation("2020-01-01T00:00:00Z", 4.5)]);
        let variables = vec!["air_temperature".to_string()];
        let format = ResponseFormat::default();
        let extractor =
            TimeSeriesExtractor::new(&EventTimeSpec::Unbounded, &variables, &format).unwrap();
        let station = catalog.station_at(0).unwrap().clone();

        let first = extractor.extract(&catalog, &station, 0).unwrap();
        let second = extractor.extract(&catalog, &station, 0).unwrap();
        assert_eq!(first, second);
    }
}
