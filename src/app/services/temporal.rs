//! Temporal filtering of observation timestamps
//!
//! An event-time request is one of: no constraint, a single instant, or a
//! closed interval. The request form is compiled once per extraction pass
//! into a predicate evaluated per observation; the pass never buffers or
//! reorders observations.

use crate::app::models::iso_timestamp;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requested event-time constraint, as it arrives from the outer service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTimeSpec {
    /// No temporal constraint
    Unbounded,
    /// Exactly one ISO-8601 instant
    Instant(String),
    /// Closed interval, inclusive at both ends; the engine does not validate
    /// start <= end
    Interval { start: String, end: String },
}

impl EventTimeSpec {
    /// Build a spec from the raw event-time list of a request
    ///
    /// No list or an empty list means unbounded; one entry is an instant;
    /// two or more entries form an interval from the first two.
    pub fn from_request(event_times: Option<&[String]>) -> Self {
        match event_times {
            None | Some([]) => EventTimeSpec::Unbounded,
            Some([instant]) => EventTimeSpec::Instant(instant.clone()),
            Some([start, end, ..]) => EventTimeSpec::Interval {
                start: start.clone(),
                end: end.clone(),
            },
        }
    }
}

/// Compiled tri-state temporal predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalFilter {
    /// Pass every observation
    PassAll,
    /// Pass when the observation's canonical ISO rendering equals the
    /// requested instant string
    Instant(String),
    /// Pass when the observation falls inside the closed interval
    Between {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl TemporalFilter {
    /// Compile an event-time spec into a predicate
    ///
    /// Interval endpoints are parsed once here; a malformed endpoint is a
    /// setup failure, not a per-observation one.
    pub fn compile(spec: &EventTimeSpec) -> Result<Self> {
        match spec {
            EventTimeSpec::Unbounded => Ok(TemporalFilter::PassAll),
            EventTimeSpec::Instant(instant) => Ok(TemporalFilter::Instant(instant.clone())),
            EventTimeSpec::Interval { start, end } => Ok(TemporalFilter::Between {
                start: parse_iso(start)?,
                end: parse_iso(end)?,
            }),
        }
    }

    /// Evaluate the predicate against one observation timestamp
    pub fn matches(&self, timestamp: DateTime<Utc>) -> bool {
        match self {
            TemporalFilter::PassAll => true,
            // string-level equality after canonical formatting: timestamps
            // that render identically after truncation are equal
            TemporalFilter::Instant(instant) => iso_timestamp(&timestamp) == *instant,
            // three explicit cases: equal to start, equal to end, strictly
            // between; the equality semantics here are raw-instant, so keep
            // the branches separate rather than folding into a range test
            TemporalFilter::Between { start, end } => {
                if timestamp == *start {
                    true
                } else if timestamp == *end {
                    true
                } else {
                    timestamp > *start && timestamp < *end
                }
            }
        }
    }
}

fn parse_iso(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| {
            Error::datetime_parsing(format!("invalid event time '{}'", value), source)
        })
}
