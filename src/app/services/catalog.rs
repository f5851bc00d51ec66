//! Boundary traits for the underlying feature collection
//!
//! The engine is a read-only consumer of an already-open dataset handle. The
//! catalog, per-station features, and dataset metadata are provided by
//! collaborators implementing these traits; the crate ships an in-memory
//! implementation under `app::adapters::memory` used by the test suite and as
//! a reference for real adapters.

use crate::app::models::{DatasetShape, Observation, Station, TimeSpan, VariableMeta};
use crate::constants::{ATTRIBUTE_MISSING, DEFINITION_URL_BASE};
use crate::Result;
use tracing::warn;

/// Forward-only cursor over one station's observation points
///
/// The cursor is never rewound; a fresh one is opened per extraction pass.
/// Underlying I/O resources are released when the cursor is dropped, on every
/// exit path.
pub type PointCursor<'a> = Box<dyn Iterator<Item = Result<Observation>> + 'a>;

/// Catalog of the stations exposed by the feature collection
pub trait StationCatalog {
    /// Shape of the underlying dataset
    fn shape(&self) -> DatasetShape;

    /// Number of stations in the catalog
    fn station_count(&self) -> usize;

    /// Station at the given catalog index
    fn station_at(&self, index: usize) -> Option<&Station>;

    /// Direct lookup by the station's role-based identifier (the last
    /// colon-segment of a requested URN)
    fn station_by_role_id(&self, role_id: &str) -> Option<&Station>;

    /// Open the time-series feature for one station
    ///
    /// Each call yields a fresh handle, so an extraction pass can be safely
    /// re-invoked. Failure here is fatal to the current request.
    fn feature(&self, station: &Station) -> Result<Box<dyn StationFeature + '_>>;
}

/// One station's time-series feature: its point stream and native bounds
pub trait StationFeature {
    /// Compute and cache the feature's native bounds; idempotent
    ///
    /// Must be called before [`StationFeature::time_range`].
    fn ensure_bounds(&mut self) -> Result<()>;

    /// Native per-station date range; requires bounds to have been computed
    fn time_range(&self) -> Result<TimeSpan>;

    /// Number of observation points the station contributes
    ///
    /// Queried to decide whether records need a terminating separator; a
    /// failure here has response-wide blast radius.
    fn observation_count(&self) -> Result<usize>;

    /// Open a forward-only cursor over the station's observation points
    fn points(&self) -> Result<PointCursor<'_>>;
}

/// Metadata of the open dataset: global attributes and data variables
pub trait DatasetMetadata {
    /// One global attribute, when present
    fn global_attribute(&self, name: &str) -> Option<&str>;

    /// All data variables of the dataset, in dataset order
    fn variables(&self) -> Vec<&VariableMeta>;

    /// One data variable by name, when the dataset carries it
    fn variable(&self, name: &str) -> Option<&VariableMeta> {
        self.variables().into_iter().find(|var| var.name == name)
    }

    /// The platform variable describing one station, when the dataset
    /// carries one
    fn platform_variable(&self, station_name: &str) -> Option<&VariableMeta>;

    /// A required global attribute, substituting the missing-attribute
    /// sentinel rather than failing
    fn required_attribute(&self, name: &str) -> String {
        match self.global_attribute(name) {
            Some(value) => value.to_string(),
            None => {
                warn!(attribute = name, "required global attribute missing");
                ATTRIBUTE_MISSING.to_string()
            }
        }
    }
}

/// Definition reference lookup for vocabulary terms
///
/// The real vocabulary table is an external collaborator; the default builds
/// an MMI-style definition URL from the term.
pub trait Vocabulary {
    fn definition(&self, term: &str) -> String {
        format!("{}{}", DEFINITION_URL_BASE, term)
    }
}
