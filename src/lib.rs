//! SOS Station Engine Library
//!
//! A Rust library for extracting observation records from station-oriented
//! time-series datasets and aggregating spatial and temporal bounds across a
//! sensor network, as needed by SOS-style GetObservation and DescribeSensor
//! responses.
//!
//! This library provides tools for:
//! - Resolving requested station identifiers (URN suffixes and generic
//!   `<FeatureType>-<index>` fallbacks) against a station catalog
//! - Streaming a station's observation points through a temporal filter
//!   (unbounded / single instant / closed interval)
//! - Serializing matching observations into flat delimited records with
//!   in-band error sentinels for degraded output
//! - Computing the bounding box and time span covering an arbitrary set of
//!   resolved stations
//! - Building structured per-station network descriptions for an external
//!   document formatter

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod assembler;
        pub mod bounds;
        pub mod catalog;
        pub mod extractor;
        pub mod network;
        pub mod resolver;
        pub mod serializer;
        pub mod temporal;

        #[cfg(test)]
        pub(crate) mod tests;
    }
    pub mod adapters {
        pub mod memory;
    }
}

// Re-export commonly used types
pub use app::models::{
    BoundingBox, DatasetShape, NetworkBounds, NetworkDescription, Observation, ScalarValue,
    Station, StationDescription, TimeSpan, VariableMeta,
};
pub use app::services::assembler::NetworkDescriptionAssembler;
pub use app::services::network::StationNetwork;
pub use app::services::temporal::EventTimeSpec;
pub use config::ResponseFormat;

/// Result type alias for the station engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for station extraction and aggregation operations
///
/// Only setup-time failures live here: anything recoverable (a resolution
/// miss, a missing variable) is logged and degraded in-band instead of
/// surfacing as an `Error`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Station feature could not be opened or read
    #[error("feature access error for station '{station}': {message}")]
    FeatureAccess { station: String, message: String },

    /// Native bounds could not be computed for a station feature
    #[error("bounds computation failed for station '{station}': {message}")]
    BoundsComputation { station: String, message: String },

    /// Date/time parsing error
    #[error("date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Dataset shape not handled by the engine
    #[error("unsupported feature type: {shape}")]
    UnsupportedFeatureType { shape: String },

    /// Data validation error
    #[error("data validation error: {message}")]
    DataValidation { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a feature access error
    pub fn feature_access(station: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FeatureAccess {
            station: station.into(),
            message: message.into(),
        }
    }

    /// Create a bounds computation error
    pub fn bounds_computation(station: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BoundsComputation {
            station: station.into(),
            message: message.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create an unsupported feature type error
    pub fn unsupported_feature_type(shape: impl Into<String>) -> Self {
        Self::UnsupportedFeatureType {
            shape: shape.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "date/time parsing failed".to_string(),
            source: error,
        }
    }
}
