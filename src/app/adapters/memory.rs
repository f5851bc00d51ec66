//! In-memory feature catalog adapter
//!
//! A self-contained implementation of the catalog, feature, and metadata
//! boundary traits backed by plain collections. The test suite runs against
//! it, and it doubles as a reference for adapters over real dataset handles.
//! Failure injection hooks cover the error paths a real dataset can hit:
//! per-station cardinality queries, point reads, and bounds computation.

use crate::app::models::{DatasetShape, Observation, Station, TimeSpan, VariableMeta};
use crate::app::services::catalog::{
    DatasetMetadata, PointCursor, StationCatalog, StationFeature, Vocabulary,
};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap, HashSet};

/// In-memory station catalog with per-station observation lists
#[derive(Debug, Clone)]
pub struct MemoryCatalog {
    shape: DatasetShape,
    stations: Vec<Station>,
    observations: HashMap<String, Vec<Observation>>,
    role_index: HashMap<String, usize>,
    fail_cardinality: HashSet<String>,
    fail_points: HashSet<String>,
    fail_bounds: HashSet<String>,
}

impl MemoryCatalog {
    pub fn new(shape: DatasetShape) -> Self {
        Self {
            shape,
            stations: Vec::new(),
            observations: HashMap::new(),
            role_index: HashMap::new(),
            fail_cardinality: HashSet::new(),
            fail_points: HashSet::new(),
            fail_bounds: HashSet::new(),
        }
    }

    /// Add a station and its observation list
    ///
    /// The station's name and URN suffix both index it for role-id lookup.
    pub fn add_station(&mut self, station: Station, observations: Vec<Observation>) {
        let index = self.stations.len();
        self.role_index.insert(station.name.clone(), index);
        if let Some(suffix) = station.urn_suffix() {
            self.role_index.insert(suffix.to_string(), index);
        }
        self.observations.insert(station.name.clone(), observations);
        self.stations.push(station);
    }

    /// Make the cardinality query fail for one station
    pub fn fail_cardinality_for(&mut self, station_name: &str) {
        self.fail_cardinality.insert(station_name.to_string());
    }

    /// Make point reads fail for one station
    pub fn fail_points_for(&mut self, station_name: &str) {
        self.fail_points.insert(station_name.to_string());
    }

    /// Make bounds computation fail for one station
    pub fn fail_bounds_for(&mut self, station_name: &str) {
        self.fail_bounds.insert(station_name.to_string());
    }
}

impl StationCatalog for MemoryCatalog {
    fn shape(&self) -> DatasetShape {
        self.shape.clone()
    }

    fn station_count(&self) -> usize {
        self.stations.len()
    }

    fn station_at(&self, index: usize) -> Option<&Station> {
        self.stations.get(index)
    }

    fn station_by_role_id(&self, role_id: &str) -> Option<&Station> {
        self.role_index
            .get(role_id)
            .and_then(|&index| self.stations.get(index))
    }

    fn feature(&self, station: &Station) -> Result<Box<dyn StationFeature + '_>> {
        let observations = self
            .observations
            .get(&station.name)
            .ok_or_else(|| Error::feature_access(&station.name, "station not in catalog"))?;

        Ok(Box::new(MemoryFeature {
            station_name: station.name.clone(),
            observations,
            bounds: None,
            fail_cardinality: self.fail_cardinality.contains(&station.name),
            fail_points: self.fail_points.contains(&station.name),
            fail_bounds: self.fail_bounds.contains(&station.name),
        }))
    }
}

/// One station's feature handle over the in-memory observation list
struct MemoryFeature<'a> {
    station_name: String,
    observations: &'a [Observation],
    bounds: Option<TimeSpan>,
    fail_cardinality: bool,
    fail_points: bool,
    fail_bounds: bool,
}

impl StationFeature for MemoryFeature<'_> {
    fn ensure_bounds(&mut self) -> Result<()> {
        if self.bounds.is_some() {
            return Ok(());
        }
        if self.fail_bounds {
            return Err(Error::bounds_computation(
                &self.station_name,
                "injected bounds failure",
            ));
        }

        let mut times = self.observations.iter().map(|observation| observation.time);
        let first = times.next().ok_or_else(|| {
            Error::bounds_computation(&self.station_name, "station has no observations")
        })?;
        let (start, end) = times.fold((first, first), |(start, end), time| {
            (start.min(time), end.max(time))
        });

        self.bounds = Some(TimeSpan::new(start, end));
        Ok(())
    }

    fn time_range(&self) -> Result<TimeSpan> {
        self.bounds.clone().ok_or_else(|| {
            Error::bounds_computation(&self.station_name, "bounds not computed before time_range")
        })
    }

    fn observation_count(&self) -> Result<usize> {
        if self.fail_cardinality {
            return Err(Error::feature_access(
                &self.station_name,
                "injected cardinality failure",
            ));
        }
        Ok(self.observations.len())
    }

    fn points(&self) -> Result<PointCursor<'_>> {
        if self.fail_points {
            let station = self.station_name.clone();
            return Ok(Box::new(std::iter::once_with(move || {
                Err(Error::feature_access(&station, "injected point read failure"))
            })));
        }
        Ok(Box::new(self.observations.iter().cloned().map(Ok)))
    }
}

/// In-memory dataset metadata: global attributes, data variables, and
/// per-station platform variables
#[derive(Debug, Clone, Default)]
pub struct MemoryMetadata {
    attributes: BTreeMap<String, String>,
    variables: Vec<VariableMeta>,
    platform_variables: BTreeMap<String, VariableMeta>,
}

impl MemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn add_variable(&mut self, variable: VariableMeta) {
        self.variables.push(variable);
    }

    pub fn set_platform_variable(&mut self, station_name: &str, variable: VariableMeta) {
        self.platform_variables
            .insert(station_name.to_string(), variable);
    }
}

impl DatasetMetadata for MemoryMetadata {
    fn global_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn variables(&self) -> Vec<&VariableMeta> {
        self.variables.iter().collect()
    }

    fn platform_variable(&self, station_name: &str) -> Option<&VariableMeta> {
        self.platform_variables.get(station_name)
    }
}

impl Vocabulary for MemoryMetadata {}
