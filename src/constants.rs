//! Application constants for the station engine
//!
//! This module contains the sentinel values, field delimiters, and attribute
//! names shared by the extraction and network-description services.

// =============================================================================
// Response Format Atoms
// =============================================================================

/// Prefix used for the station ordinal field in flat records (`Station<N>`)
pub const STATION_LABEL_PREFIX: &str = "Station";

/// Default delimiter between fields of one observation record
pub const DEFAULT_FIELD_DELIMITER: char = ',';

/// Default separator terminating each record when a station contributes
/// more than one observation to the response
pub const DEFAULT_RECORD_SEPARATOR: char = ';';

// =============================================================================
// Sentinel Values
// =============================================================================

/// Returned by label accessors when the requested ordinal exceeds the
/// resolved station count
pub const INVALID_STATION: &str = "INVALID_STATION";

/// Returned by coordinate accessors when the requested ordinal exceeds the
/// resolved station count or the network resolved to zero stations
pub const INVALID_VALUE: f64 = -9999999.0;

/// Returned by per-station time accessors when the native date range cannot
/// be read
pub const ERROR_NULL_DATE: &str = "ERROR NULL Date";

/// Substituted for any required dataset attribute that is absent; assembly
/// never aborts for a missing attribute
pub const ATTRIBUTE_MISSING: &str = "attribute missing";

// =============================================================================
// In-Band Error Sentinels
// =============================================================================

/// Prefix of the sentinel line that replaces a single record when one of its
/// requested variables cannot be read
pub const RECORD_ERROR_PREFIX: &str = "ERROR=reading data from dataset: ";

/// Suffix of the record-scoped sentinel line
pub const RECORD_ERROR_SUFFIX: &str =
    ". Most likely this property does not exist or is improperly stored in the dataset.";

/// Prefix of the sentinel that replaces the entire accumulated response when
/// the per-station cardinality query fails
pub const RESPONSE_ERROR_PREFIX: &str =
    "ERROR=received the following error when reading the data of the dataset: ";

// =============================================================================
// Dataset Attribute Names
// =============================================================================

/// Variable attribute carrying the CF standard name
pub const STANDARD_NAME: &str = "standard_name";

/// Variable attribute carrying the human-readable name
pub const LONG_NAME: &str = "long_name";

/// Variable attribute carrying the unit of measure
pub const UNITS: &str = "units";

/// Variable attribute carrying the WMO identifier of a platform
pub const WMO_CODE: &str = "wmo_code";

/// Global attribute naming the operating institution
pub const INSTITUTION: &str = "institution";

// =============================================================================
// Network Description
// =============================================================================

/// Network name used for the all-stations sensor network description
pub const NETWORK_ALL: &str = "network-all";

/// Base URL for vocabulary definition references
pub const DEFINITION_URL_BASE: &str = "http://mmisw.org/ont/ioos/definition/";
