//! Station network facade
//!
//! Binds a station catalog to one request: resolves the requested
//! identifiers, runs the bounds accumulation pass, and exposes the accessor
//! surface consumed by the data-response and network-description layers.
//! Each request gets its own instance; after construction the resolved set
//! and aggregates are immutable.
//!
//! The accessors are deliberately non-throwing: probing with an out-of-range
//! ordinal (or against an empty network) returns fixed sentinel values
//! instead of failing, so callers can probe defensively. Only setup-time
//! failures (feature open, bounds computation) surface as errors, at
//! construction.

use crate::app::models::{iso_timestamp, DatasetShape, NetworkBounds, Station};
use crate::app::services::bounds::BoundsAccumulator;
use crate::app::services::catalog::StationCatalog;
use crate::app::services::extractor::TimeSeriesExtractor;
use crate::app::services::resolver::{ResolvedStationSet, StationResolver};
use crate::app::services::temporal::EventTimeSpec;
use crate::config::ResponseFormat;
use crate::constants::{ERROR_NULL_DATE, INVALID_STATION, INVALID_VALUE};
use crate::{Error, Result};
use tracing::{error, info};

/// One request's bound view of a station catalog
pub struct StationNetwork<'a, C: StationCatalog + ?Sized> {
    catalog: &'a C,
    stations: ResolvedStationSet,
    bounds: Option<NetworkBounds>,
    shape: DatasetShape,
    generic_prefix: String,
    format: ResponseFormat,
}

impl<'a, C: StationCatalog + ?Sized> StationNetwork<'a, C> {
    /// Resolve the requested identifiers and accumulate network bounds
    ///
    /// Only point time-series datasets are handled by this engine; any other
    /// shape is rejected up front instead of failing a downcast later. Zero
    /// resolved stations is not an error; it produces an empty network whose
    /// accessors answer with sentinels.
    pub fn bind(catalog: &'a C, requested: &[String]) -> Result<Self> {
        let shape = catalog.shape();
        if shape != DatasetShape::PointTimeSeries {
            error!(shape = shape.name(), "dataset shape not supported");
            return Err(Error::unsupported_feature_type(shape.name()));
        }

        let stations = StationResolver::new(catalog).resolve(requested);
        let bounds = BoundsAccumulator::for_stations(catalog, &stations)?;
        info!(
            requested = requested.len(),
            resolved = stations.len(),
            "station network bound"
        );

        Ok(Self {
            catalog,
            stations,
            bounds,
            generic_prefix: shape.generic_prefix(),
            shape,
            format: ResponseFormat::default(),
        })
    }

    /// Shape of the underlying dataset
    pub fn shape(&self) -> &DatasetShape {
        &self.shape
    }

    /// Replace the response format (delimiters) used for data responses
    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Number of resolved stations
    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    /// Resolved stations in request order
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    /// Station label: native name, generic `<FeatureType>-<ordinal>` when the
    /// native name is empty, or the invalid-station sentinel when the ordinal
    /// exceeds the resolved count
    pub fn station_label(&self, ordinal: usize) -> String {
        match self.stations.get(ordinal) {
            Some(station) if station.name.is_empty() => {
                format!("{}{}", self.generic_prefix, ordinal)
            }
            Some(station) => station.name.clone(),
            None => INVALID_STATION.to_string(),
        }
    }

    /// Full URN of the station, when it carries one
    pub fn station_urn(&self, ordinal: usize) -> Option<&str> {
        self.stations.get(ordinal)?.urn.as_deref()
    }

    // Point time-series stations occupy a single point, so the lower and
    // upper per-station accessors coincide.

    pub fn lower_latitude(&self, ordinal: usize) -> f64 {
        self.station_coordinate(ordinal, |station| station.latitude)
    }

    pub fn upper_latitude(&self, ordinal: usize) -> f64 {
        self.station_coordinate(ordinal, |station| station.latitude)
    }

    pub fn lower_longitude(&self, ordinal: usize) -> f64 {
        self.station_coordinate(ordinal, |station| station.longitude)
    }

    pub fn upper_longitude(&self, ordinal: usize) -> f64 {
        self.station_coordinate(ordinal, |station| station.longitude)
    }

    /// Lower altitude, never NaN: undefined altitudes normalize to `0.0`
    pub fn lower_altitude(&self, ordinal: usize) -> f64 {
        self.station_coordinate(ordinal, Station::normalized_altitude)
    }

    /// Upper altitude, never NaN: undefined altitudes normalize to `0.0`
    pub fn upper_altitude(&self, ordinal: usize) -> f64 {
        self.station_coordinate(ordinal, Station::normalized_altitude)
    }

    /// Per-station location as a `"<lat> <lon>"` string
    pub fn location_string(&self, ordinal: usize) -> String {
        format!(
            "{} {}",
            self.lower_latitude(ordinal),
            self.lower_longitude(ordinal)
        )
    }

    /// Start of the station's native date range, ISO-8601; the null-date
    /// sentinel when the range cannot be read
    pub fn time_begin(&self, ordinal: usize) -> String {
        self.station_time(ordinal, |range| range.start)
    }

    /// End of the station's native date range, ISO-8601; the null-date
    /// sentinel when the range cannot be read
    pub fn time_end(&self, ordinal: usize) -> String {
        self.station_time(ordinal, |range| range.end)
    }

    /// Aggregate bounds over the resolved set; `None` for an empty network
    pub fn bounds(&self) -> Option<&NetworkBounds> {
        self.bounds.as_ref()
    }

    pub fn bound_lower_latitude(&self) -> f64 {
        self.bound_value(|bounds| bounds.bounding_box.lat_min)
    }

    pub fn bound_upper_latitude(&self) -> f64 {
        self.bound_value(|bounds| bounds.bounding_box.lat_max)
    }

    pub fn bound_lower_longitude(&self) -> f64 {
        self.bound_value(|bounds| bounds.bounding_box.lon_min)
    }

    pub fn bound_upper_longitude(&self) -> f64 {
        self.bound_value(|bounds| bounds.bounding_box.lon_max)
    }

    pub fn bound_lower_altitude(&self) -> f64 {
        self.bound_value(|bounds| bounds.bounding_box.alt_min)
    }

    pub fn bound_upper_altitude(&self) -> f64 {
        self.bound_value(|bounds| bounds.bounding_box.alt_max)
    }

    /// Southwest corner of the aggregate box, `"<lat> <lon>"`
    pub fn bound_lower_corner(&self) -> String {
        format!(
            "{} {}",
            self.bound_lower_latitude(),
            self.bound_lower_longitude()
        )
    }

    /// Northeast corner of the aggregate box, `"<lat> <lon>"`
    pub fn bound_upper_corner(&self) -> String {
        format!(
            "{} {}",
            self.bound_upper_latitude(),
            self.bound_upper_longitude()
        )
    }

    /// Start of the aggregate time span, ISO-8601
    pub fn bound_time_begin(&self) -> String {
        match &self.bounds {
            Some(bounds) => iso_timestamp(&bounds.time_span.start),
            None => ERROR_NULL_DATE.to_string(),
        }
    }

    /// End of the aggregate time span, ISO-8601
    pub fn bound_time_end(&self) -> String {
        match &self.bounds {
            Some(bounds) => iso_timestamp(&bounds.time_span.end),
            None => ERROR_NULL_DATE.to_string(),
        }
    }

    /// Full flat-text data response for one station
    ///
    /// Runs one extraction pass with a fresh point cursor. Setup failures
    /// propagate; an out-of-range ordinal answers with the invalid-station
    /// sentinel like the other accessors.
    pub fn data_response(
        &self,
        ordinal: usize,
        spec: &EventTimeSpec,
        variables: &[String],
    ) -> Result<String> {
        let Some(station) = self.stations.get(ordinal) else {
            return Ok(INVALID_STATION.to_string());
        };

        let extractor = TimeSeriesExtractor::new(spec, variables, &self.format)?;
        extractor.extract(self.catalog, station, ordinal)
    }

    fn bound_value(&self, pick: impl Fn(&NetworkBounds) -> f64) -> f64 {
        match &self.bounds {
            Some(bounds) => pick(bounds),
            None => INVALID_VALUE,
        }
    }

    fn station_coordinate(&self, ordinal: usize, accessor: impl Fn(&Station) -> f64) -> f64 {
        match self.stations.get(ordinal) {
            Some(station) => accessor(station),
            None => INVALID_VALUE,
        }
    }

    fn station_time(
        &self,
        ordinal: usize,
        pick: impl Fn(&crate::app::models::TimeSpan) -> chrono::DateTime<chrono::Utc>,
    ) -> String {
        let Some(station) = self.stations.get(ordinal) else {
            return ERROR_NULL_DATE.to_string();
        };

        let range = self
            .catalog
            .feature(station)
            .and_then(|mut feature| {
                feature.ensure_bounds()?;
                feature.time_range()
            });

        match range {
            Ok(range) => iso_timestamp(&pick(&range)),
            Err(err) => {
                error!(
                    station = station.name.as_str(),
                    error = %err,
                    "failed to read native date range"
                );
                ERROR_NULL_DATE.to_string()
            }
        }
    }
}
