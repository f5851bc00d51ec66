//! Data models for station time-series extraction
//!
//! This module contains the core data structures for representing stations,
//! observation records, dataset shapes, and the spatiotemporal aggregates
//! computed across a resolved station set.

use crate::constants::ATTRIBUTE_MISSING;
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Render a timestamp in the canonical ISO-8601 form used throughout the
/// engine (`2020-01-01T00:00:00Z`)
///
/// Instant-filter matching compares these rendered strings, so two timestamps
/// that render identically after truncation to whole seconds are treated as
/// equal.
pub fn iso_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// =============================================================================
// Station
// =============================================================================

/// A named, located source of a time-ordered sequence of observations
///
/// Stations are owned by the underlying feature catalog; the engine works
/// with clones held in request order inside a resolved station set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// Native station name as stored in the dataset (may be empty)
    pub name: String,

    /// Compound URN identifier; its final colon-segment is the station's
    /// short label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urn: Option<String>,

    /// Latitude in WGS84 decimal degrees
    pub latitude: f64,

    /// Longitude in WGS84 decimal degrees
    pub longitude: f64,

    /// Elevation above sea level in meters; `None` when the dataset does not
    /// record an altitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
}

impl Station {
    /// Create a new Station with validation
    pub fn new(
        name: impl Into<String>,
        urn: Option<String>,
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
    ) -> Result<Self> {
        let station = Self {
            name: name.into(),
            urn,
            latitude,
            longitude,
            altitude,
        };
        station.validate()?;
        Ok(station)
    }

    /// Validate station coordinates for valid ranges
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::data_validation(format!(
                "invalid latitude {}: must be between -90 and 90 degrees",
                self.latitude
            )));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::data_validation(format!(
                "invalid longitude {}: must be between -180 and 180 degrees",
                self.longitude
            )));
        }

        Ok(())
    }

    /// Altitude with the undefined case normalized to `0.0`
    ///
    /// Both the bounds fold and the altitude accessors use this; the engine
    /// never reports NaN for an altitude.
    pub fn normalized_altitude(&self) -> f64 {
        match self.altitude {
            Some(altitude) if !altitude.is_nan() => altitude,
            _ => 0.0,
        }
    }

    /// Final colon-segment of the station URN, used as its short label
    pub fn urn_suffix(&self) -> Option<&str> {
        let urn = self.urn.as_deref()?;
        if urn.contains(':') {
            urn.rsplit(':').next()
        } else {
            None
        }
    }
}

// =============================================================================
// Observations
// =============================================================================

/// A scalar value read from one observation point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Float(f64),
    Int(i64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Float(value) => write!(f, "{}", value),
            ScalarValue::Int(value) => write!(f, "{}", value),
            ScalarValue::Text(value) => write!(f, "{}", value),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

/// One observation point: a timestamp plus the variable values recorded at it
///
/// Observations are transient; they are produced by a station's point cursor,
/// serialized immediately, and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Observation timestamp
    pub time: DateTime<Utc>,

    /// Variable name to recorded value
    pub values: BTreeMap<String, ScalarValue>,
}

impl Observation {
    /// Create an observation from a list of named values
    pub fn new(time: DateTime<Utc>, values: Vec<(&str, ScalarValue)>) -> Self {
        Self {
            time,
            values: values
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// Look up one variable's value; `None` when the variable is absent
    pub fn value(&self, name: &str) -> Option<&ScalarValue> {
        self.values.get(name)
    }
}

// =============================================================================
// Dataset Shape
// =============================================================================

/// Closed set of dataset shapes the underlying feature collection can expose
///
/// Replaces runtime type inspection of the collection handle: callers
/// dispatch on this tag, and shapes the engine cannot handle carry an
/// explicit `Unsupported` variant instead of a caught downcast failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetShape {
    /// Fixed stations, one time series each
    PointTimeSeries,
    /// Fixed stations with a vertical profile per time step
    Profile,
    /// Moving platform sampled along its track
    Trajectory,
    /// Moving platform with a profile per sample
    TrajectoryProfile,
    /// Gridded dataset described by its bounding box
    Grid,
    /// Unconnected point observations
    Point,
    /// Anything else the collection reports
    Unsupported(String),
}

impl DatasetShape {
    /// Feature-type name as spelled in dataset metadata, also the stem of
    /// generic station labels
    pub fn name(&self) -> &str {
        match self {
            DatasetShape::PointTimeSeries => "STATION",
            DatasetShape::Profile => "PROFILE",
            DatasetShape::Trajectory => "TRAJECTORY",
            DatasetShape::TrajectoryProfile => "TRAJECTORY_PROFILE",
            DatasetShape::Grid => "GRID",
            DatasetShape::Point => "POINT",
            DatasetShape::Unsupported(name) => name,
        }
    }

    /// Prefix of generic station labels for this shape (`STATION-`)
    pub fn generic_prefix(&self) -> String {
        format!("{}-", self.name())
    }
}

// =============================================================================
// Spatiotemporal Aggregates
// =============================================================================

/// Running lat/lon/alt extrema over a set of stations
///
/// Seeded from the first station and widened, never narrowed, by each
/// subsequent one; each axis widens independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub alt_min: f64,
    pub alt_max: f64,
}

impl BoundingBox {
    /// Seed the box from a single station's location
    pub fn from_station(station: &Station) -> Self {
        let altitude = station.normalized_altitude();
        Self {
            lat_min: station.latitude,
            lat_max: station.latitude,
            lon_min: station.longitude,
            lon_max: station.longitude,
            alt_min: altitude,
            alt_max: altitude,
        }
    }

    /// Widen the box to cover one more station
    pub fn widen(&mut self, station: &Station) {
        let altitude = station.normalized_altitude();
        self.lat_min = self.lat_min.min(station.latitude);
        self.lat_max = self.lat_max.max(station.latitude);
        self.lon_min = self.lon_min.min(station.longitude);
        self.lon_max = self.lon_max.max(station.longitude);
        self.alt_min = self.alt_min.min(altitude);
        self.alt_max = self.alt_max.max(altitude);
    }

    /// Southwest corner as a `"<lat> <lon>"` string
    pub fn lower_corner(&self) -> String {
        format!("{} {}", self.lat_min, self.lon_min)
    }

    /// Northeast corner as a `"<lat> <lon>"` string
    pub fn upper_corner(&self) -> String {
        format!("{} {}", self.lat_max, self.lon_max)
    }
}

/// A closed time interval covering one or more stations' native date ranges
///
/// All instants live in a single shared chronology (UTC), so cross-station
/// comparisons are well-defined regardless of how source timestamps were
/// encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSpan {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Widen the span to cover another station's native range
    pub fn widen(&mut self, other: &TimeSpan) {
        if other.start < self.start {
            self.start = other.start;
        }
        if other.end > self.end {
            self.end = other.end;
        }
    }

    /// Span start in canonical ISO-8601 form
    pub fn start_iso(&self) -> String {
        iso_timestamp(&self.start)
    }

    /// Span end in canonical ISO-8601 form
    pub fn end_iso(&self) -> String {
        iso_timestamp(&self.end)
    }
}

/// Immutable result of the bounds accumulation pass over a resolved station
/// set
///
/// Returned by value once accumulation finishes; no component reads running
/// extrema as ambient mutable state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkBounds {
    pub bounding_box: BoundingBox,
    pub time_span: TimeSpan,
}

// =============================================================================
// Dataset Variables
// =============================================================================

/// Metadata for one data variable of the dataset: its short name plus the
/// attribute map (`standard_name`, `long_name`, `units`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableMeta {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

impl VariableMeta {
    pub fn new(name: impl Into<String>, attributes: Vec<(&str, &str)>) -> Self {
        Self {
            name: name.into(),
            attributes: attributes
                .into_iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }

    /// Look up one attribute
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Look up a required attribute, substituting the missing-attribute
    /// sentinel rather than failing
    pub fn required_attribute(&self, key: &str) -> String {
        self.attribute(key)
            .map(str::to_string)
            .unwrap_or_else(|| ATTRIBUTE_MISSING.to_string())
    }
}

// =============================================================================
// Network Description
// =============================================================================

/// One identifying name/value pair of a described sensor network or station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmlIdentifier {
    pub name: String,
    pub definition: String,
    pub value: String,
}

/// One classifying name/value pair, with the category it classifies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmlClassifier {
    pub name: String,
    pub definition: String,
    pub category: String,
    pub value: String,
}

/// A responsible-party contact block built from prefixed dataset attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub role: String,
    pub organization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub address: BTreeMap<String, String>,
    pub phone: BTreeMap<String, String>,
}

/// Location of one described station: a single point for station datasets,
/// a box for grids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StationLocation {
    Point {
        latitude: f64,
        longitude: f64,
    },
    Box {
        lower_corner: String,
        upper_corner: String,
    },
}

/// One output entry of a station description: a requested variable with its
/// presentation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableOutput {
    pub name: String,
    pub title: String,
    pub definition: String,
    pub units: String,
}

/// Structured description of one station, consumed by an external document
/// formatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDescription {
    /// Full URN identity of the station
    pub station_urn: String,

    /// Short label derived from the URN's final colon-segment
    pub short_name: String,

    /// Long label from the platform variable's `long_name` attribute
    pub long_name: String,

    /// WMO identifier, when the platform variable carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wmo_id: Option<String>,

    /// Validity interval start, ISO-8601 (or the null-date sentinel)
    pub valid_time_begin: String,

    /// Validity interval end, ISO-8601 (or the null-date sentinel)
    pub valid_time_end: String,

    /// Station location
    pub location: StationLocation,

    /// One entry per data variable of the dataset
    pub outputs: Vec<VariableOutput>,
}

/// Structured description of the whole sensor network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    /// Network name (the all-stations network)
    pub name: String,

    /// Free-text description from the dataset title
    pub description: String,

    pub identifiers: Vec<SmlIdentifier>,
    pub classifiers: Vec<SmlClassifier>,
    pub contacts: Vec<Contact>,

    /// Network validity interval, ISO-8601
    pub valid_time_begin: String,
    pub valid_time_end: String,

    /// Aggregate bounding box corners, `"<lat> <lon>"`
    pub lower_corner: String,
    pub upper_corner: String,

    /// One component entry per resolved station
    pub components: Vec<StationDescription>,
}
