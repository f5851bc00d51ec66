//! Spatiotemporal bounds accumulation
//!
//! Folds a resolved station set into one bounding box and one time span.
//! The fold is a genuine sequential pass over shared running extrema, seeded
//! from the first station and widened by each subsequent one; the finished
//! aggregate is returned by value as an immutable [`NetworkBounds`].

use crate::app::models::{BoundingBox, NetworkBounds, Station, TimeSpan};
use crate::app::services::catalog::StationCatalog;
use crate::app::services::resolver::ResolvedStationSet;
use crate::Result;
use tracing::debug;

/// Mutable running aggregate of lat/lon/alt extrema and start/end instants
#[derive(Debug, Default)]
pub struct BoundsAccumulator {
    bounding_box: Option<BoundingBox>,
    time_span: Option<TimeSpan>,
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb one station's location and native time range
    ///
    /// The first absorbed station seeds both aggregates; later ones widen
    /// them per axis, never narrowing. Altitude participates with the
    /// undefined case normalized to `0.0`.
    pub fn absorb(&mut self, station: &Station, time_range: &TimeSpan) {
        match self.bounding_box.as_mut() {
            Some(bounding_box) => bounding_box.widen(station),
            None => self.bounding_box = Some(BoundingBox::from_station(station)),
        }
        match self.time_span.as_mut() {
            Some(time_span) => time_span.widen(time_range),
            None => self.time_span = Some(time_range.clone()),
        }
    }

    /// Finish the fold; `None` when no station was absorbed
    pub fn finish(self) -> Option<NetworkBounds> {
        Some(NetworkBounds {
            bounding_box: self.bounding_box?,
            time_span: self.time_span?,
        })
    }

    /// Accumulate bounds across a whole resolved station set
    ///
    /// Single O(n) pass in request order. Each station's native bounds are
    /// computed before its range is read (`ensure_bounds`, idempotent); a
    /// failure to open a feature or compute its bounds is fatal to the
    /// request.
    pub fn for_stations<C: StationCatalog + ?Sized>(
        catalog: &C,
        stations: &ResolvedStationSet,
    ) -> Result<Option<NetworkBounds>> {
        let mut accumulator = BoundsAccumulator::new();

        for station in stations.iter() {
            let mut feature = catalog.feature(station)?;
            feature.ensure_bounds()?;
            let time_range = feature.time_range()?;
            accumulator.absorb(station, &time_range);
        }

        let bounds = accumulator.finish();
        debug!(
            stations = stations.len(),
            seeded = bounds.is_some(),
            "bounds accumulation pass complete"
        );
        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::services::tests::utc;

    fn span(start: &str, end: &str) -> TimeSpan {
        TimeSpan::new(utc(start), utc(end))
    }

    fn station(name: &str, lat: f64, lon: f64, alt: Option<f64>) -> Station {
        Station::new(name, None, lat, lon, alt).unwrap()
    }

    #[test]
    fn test_empty_accumulator_finishes_to_none() {
        assert!(BoundsAccumulator::new().finish().is_none());
    }

    #[test]
    fn test_single_station_seeds_both_aggregates() {
        let mut accumulator = BoundsAccumulator::new();
        accumulator.absorb(
            &station("A", 51.5, -0.1, Some(25.0)),
            &span("2020-01-01T00:00:00Z", "2020-06-01T00:00:00Z"),
        );

        let bounds = accumulator.finish().unwrap();
        assert_eq!(bounds.bounding_box.lat_min, 51.5);
        assert_eq!(bounds.bounding_box.lat_max, 51.5);
        assert_eq!(bounds.bounding_box.alt_min, 25.0);
        assert_eq!(bounds.time_span.start_iso(), "2020-01-01T00:00:00Z");
        assert_eq!(bounds.time_span.end_iso(), "2020-06-01T00:00:00Z");
    }

    #[test]
    fn test_aggregate_extrema_are_order_independent() {
        let stations = [
            (station("A", 51.5, -0.1, Some(25.0)), span("2020-02-01T00:00:00Z", "2020-03-01T00:00:00Z")),
            (station("B", 48.9, 2.3, None), span("2020-01-01T00:00:00Z", "2020-02-15T00:00:00Z")),
            (station("C", 55.9, -3.2, Some(110.0)), span("2020-02-20T00:00:00Z", "2020-05-01T00:00:00Z")),
        ];

        let fold = |order: &[usize]| {
            let mut accumulator = BoundsAccumulator::new();
            for &index in order {
                let (station, range) = &stations[index];
                accumulator.absorb(station, range);
            }
            accumulator.finish().unwrap()
        };

        let forward = fold(&[0, 1, 2]);
        let reversed = fold(&[2, 1, 0]);
        let shuffled = fold(&[1, 2, 0]);

        assert_eq!(forward, reversed);
        assert_eq!(forward, shuffled);

        assert_eq!(forward.bounding_box.lat_min, 48.9);
        assert_eq!(forward.bounding_box.lat_max, 55.9);
        assert_eq!(forward.bounding_box.lon_min, -3.2);
        assert_eq!(forward.bounding_box.lon_max, 2.3);
        // station B's undefined altitude participates as 0.0
        assert_eq!(forward.bounding_box.alt_min, 0.0);
        assert_eq!(forward.bounding_box.alt_max, 110.0);
        assert_eq!(forward.time_span.start_iso(), "2020-01-01T00:00:00Z");
        assert_eq!(forward.time_span.end_iso(), "2020-05-01T00:00:00Z");
    }

    #[test]
    fn test_widening_is_idempotent() {
        let st = station("A", 51.5, -0.1, Some(25.0));
        let range = span("2020-01-01T00:00:00Z", "2020-06-01T00:00:00Z");

        let mut accumulator = BoundsAccumulator::new();
        accumulator.absorb(&st, &range);
        let once = {
            let mut second = BoundsAccumulator::new();
            second.absorb(&st, &range);
            second.absorb(&st, &range);
            second.finish().unwrap()
        };
        assert_eq!(accumulator.finish().unwrap(), once);
    }
}
