//! Shared fixtures for the service test modules

use crate::app::adapters::memory::MemoryCatalog;
use crate::app::models::{DatasetShape, Observation, ScalarValue, Station};
use chrono::{DateTime, Utc};

pub(crate) fn utc(iso: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(iso).unwrap().with_timezone(&Utc)
}

pub(crate) fn observation(iso: &str, temperature: f64) -> Observation {
    Observation::new(
        utc(iso),
        vec![("air_temperature", ScalarValue::Float(temperature))],
    )
}

/// Single station "41001" carrying the given points
pub(crate) fn catalog_with_observations(observations: Vec<Observation>) -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new(DatasetShape::PointTimeSeries);
    let station = Station::new("41001", None, 34.7, -72.7, Some(3.0)).unwrap();
    catalog.add_station(station, observations);
    catalog
}

/// Two stations with disjoint boxes and date ranges; the second has an empty
/// native name and no altitude
pub(crate) fn two_station_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new(DatasetShape::PointTimeSeries);
    catalog.add_station(
        Station::new(
            "41001",
            Some("urn:ioos:station:wmo:41001".to_string()),
            34.7,
            -72.7,
            Some(3.0),
        )
        .unwrap(),
        vec![
            observation("2020-01-01T00:00:00Z", 4.5),
            observation("2020-01-02T00:00:00Z", 5.5),
        ],
    );
    catalog.add_station(
        Station::new("", Some("urn:ioos:station:wmo:41002".to_string()), 31.9, -74.9, None)
            .unwrap(),
        vec![
            observation("2019-12-30T00:00:00Z", 7.0),
            observation("2020-01-03T00:00:00Z", 8.0),
        ],
    );
    catalog
}
