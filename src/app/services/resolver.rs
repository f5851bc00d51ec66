//! Station identifier resolution
//!
//! Maps a requested list of identifiers onto concrete catalog stations. A
//! requested identifier may be a plain name, a URN whose final colon-segment
//! is the station's role identifier, or a generic `<FeatureType>-<index>`
//! placeholder. Identifiers that resolve to nothing are dropped with a log
//! line, never raised as errors; an empty resolution becomes an empty-network
//! result at the caller.

use crate::app::models::Station;
use crate::app::services::catalog::StationCatalog;
use tracing::{debug, warn};

/// Ordered set of resolved stations, insertion order matching request order
///
/// Never longer than the requested identifier list; ordinals handed to the
/// accessor surface index into this set.
#[derive(Debug, Clone, Default)]
pub struct ResolvedStationSet {
    stations: Vec<Station>,
}

impl ResolvedStationSet {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station at the given ordinal
    pub fn get(&self, ordinal: usize) -> Option<&Station> {
        self.stations.get(ordinal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }
}

/// Resolves requested identifiers against a station catalog
pub struct StationResolver<'a, C: StationCatalog + ?Sized> {
    catalog: &'a C,
}

impl<'a, C: StationCatalog + ?Sized> StationResolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Resolve a list of requested identifiers into a station set
    ///
    /// For each identifier: (1) look up its final colon-segment as a role
    /// identifier; (2) failing that, if it starts with the catalog's generic
    /// prefix, parse the trailing index and index into the catalog directly;
    /// (3) otherwise drop it. The URN match takes precedence over the generic
    /// fallback.
    pub fn resolve(&self, requested: &[String]) -> ResolvedStationSet {
        let generic_prefix = self.catalog.shape().generic_prefix();
        let mut stations = Vec::with_capacity(requested.len());

        for identifier in requested {
            let role_id = identifier.rsplit(':').next().unwrap_or(identifier.as_str());

            if let Some(station) = self.catalog.station_by_role_id(role_id) {
                stations.push(station.clone());
            } else if let Some(trailing) = role_id.strip_prefix(generic_prefix.as_str()) {
                // generic name (ie: STATION-0); a malformed index is dropped,
                // not propagated
                match trailing.parse::<usize>() {
                    Ok(index) => match self.catalog.station_at(index) {
                        Some(station) => stations.push(station.clone()),
                        None => warn!(
                            identifier = identifier.as_str(),
                            index, "generic station index out of range, dropping identifier"
                        ),
                    },
                    Err(parse_error) => warn!(
                        identifier = identifier.as_str(),
                        error = %parse_error,
                        "malformed generic station index, dropping identifier"
                    ),
                }
            } else {
                debug!(
                    identifier = identifier.as_str(),
                    "requested station not found in catalog, dropping identifier"
                );
            }
        }

        ResolvedStationSet { stations }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::adapters::memory::MemoryCatalog;
    use crate::app::models::{DatasetShape, Station};

    fn test_catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new(DatasetShape::PointTimeSeries);
        for (index, name) in ["41001", "41002", "41004"].iter().enumerate() {
            let station = Station::new(
                *name,
                Some(format!("urn:ioos:station:wmo:{}", name)),
                30.0 + index as f64,
                -75.0,
                None,
            )
            .unwrap();
            catalog.add_station(station, Vec::new());
        }
        catalog
    }

    #[test]
    fn test_urn_suffix_resolves_directly() {
        let catalog = test_catalog();
        let resolver = StationResolver::new(&catalog);

        let resolved = resolver.resolve(&["urn:ioos:station:wmo:41002".to_string()]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get(0).unwrap().name, "41002");
    }

    #[test]
    fn test_plain_name_resolves_as_role_id() {
        let catalog = test_catalog();
        let resolver = StationResolver::new(&catalog);

        let resolved = resolver.resolve(&["41004".to_string()]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get(0).unwrap().name, "41004");
    }

    #[test]
    fn test_generic_index_fallback() {
        let catalog = test_catalog();
        let resolver = StationResolver::new(&catalog);

        let resolved = resolver.resolve(&["STATION-2".to_string()]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get(0).unwrap().name, "41004");
    }

    #[test]
    fn test_urn_match_takes_precedence_over_generic_fallback() {
        let mut catalog = test_catalog();
        // a station whose role id collides with a generic label
        let decoy = Station::new("STATION-0", None, 50.0, 10.0, None).unwrap();
        catalog.add_station(decoy, Vec::new());

        let resolver = StationResolver::new(&catalog);
        let resolved = resolver.resolve(&["STATION-0".to_string()]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get(0).unwrap().name, "STATION-0");
    }

    #[test]
    fn test_out_of_range_generic_index_is_dropped() {
        let catalog = test_catalog();
        let resolver = StationResolver::new(&catalog);

        let resolved = resolver.resolve(&["STATION-7".to_string()]);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_malformed_generic_index_is_dropped() {
        let catalog = test_catalog();
        let resolver = StationResolver::new(&catalog);

        let resolved = resolver.resolve(&["STATION-abc".to_string()]);
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_unknown_identifier_is_dropped_silently() {
        let catalog = test_catalog();
        let resolver = StationResolver::new(&catalog);

        let resolved = resolver.resolve(&[
            "urn:ioos:station:wmo:41001".to_string(),
            "nonexistent".to_string(),
            "41002".to_string(),
        ]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get(0).unwrap().name, "41001");
        assert_eq!(resolved.get(1).unwrap().name, "41002");
    }

    #[test]
    fn test_resolution_preserves_request_order() {
        let catalog = test_catalog();
        let resolver = StationResolver::new(&catalog);

        let resolved = resolver.resolve(&["41004".to_string(), "41001".to_string()]);
        assert_eq!(resolved.get(0).unwrap().name, "41004");
        assert_eq!(resolved.get(1).unwrap().name, "41001");
    }
}
