use chrono::{DateTime, Utc};

use crate::geo;
use crate::location::{Coordinate, LocationSample};
use crate::route::ChosenRoute;

/// The visual trail renders only this many of the newest samples. Distance
/// integration always runs over the full history.
pub const TRAIL_LEN: usize = 20;

/// One start-to-end tracked journey.
///
/// `travel_id` is only present once the backend registration round-trip has
/// completed; nothing may be pushed to the location-update endpoint before
/// that.
#[derive(Debug, Clone, PartialEq)]
pub struct Travel {
    pub travel_id: Option<String>,
    pub route: ChosenRoute,
    pub start_time: DateTime<Utc>,
    pub history: Vec<LocationSample>,
    pub active: bool,
}

impl Travel {
    pub fn new(route: ChosenRoute, start_time: DateTime<Utc>) -> Self {
        Self {
            travel_id: None,
            route,
            start_time,
            history: Vec::new(),
            active: true,
        }
    }

    /// Appends a fix. Samples arrive in completion order; a fix whose
    /// timestamp precedes the newest one is dropped so the history stays
    /// monotonic. Returns whether the sample was kept.
    pub fn push_sample(&mut self, sample: LocationSample) -> bool {
        if let Some(last) = self.history.last() {
            if sample.timestamp < last.timestamp {
                return false;
            }
        }
        self.history.push(sample);
        true
    }

    pub fn latest(&self) -> Option<&LocationSample> {
        self.history.last()
    }

    pub fn total_distance_km(&self) -> f64 {
        geo::cumulative_distance(&self.history)
    }

    pub fn trail(&self) -> &[LocationSample] {
        let skip = self.history.len().saturating_sub(TRAIL_LEN);
        &self.history[skip..]
    }

    pub fn distance_to_destination_km(&self, from: Coordinate) -> f64 {
        geo::haversine_distance(from, self.route.end)
    }

    /// Sub-50-meter arrival check against the route destination.
    pub fn has_arrived(&self, from: Coordinate) -> bool {
        self.distance_to_destination_km(from) < geo::ARRIVAL_THRESHOLD_KM
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::SafetyGrade;
    use chrono::TimeDelta;

    fn route() -> ChosenRoute {
        ChosenRoute {
            start: Coordinate::new(12.97, 77.59),
            end: Coordinate::new(12.98, 77.60),
            coordinates: vec![
                Coordinate::new(12.97, 77.59),
                Coordinate::new(12.98, 77.60),
            ],
            score: 88,
            grade: SafetyGrade::A,
        }
    }

    fn sample_at(lat: f64, lng: f64, offset_secs: i64) -> LocationSample {
        let base: DateTime<Utc> = "2025-06-01T12:00:00Z".parse().unwrap();
        LocationSample {
            lat,
            lng,
            accuracy: 8.0,
            speed: Some(1.4),
            heading: None,
            timestamp: base + TimeDelta::seconds(offset_secs),
        }
    }

    #[test]
    fn new_travel_has_no_id_and_empty_history() {
        let travel = Travel::new(route(), Utc::now());
        assert!(travel.travel_id.is_none());
        assert!(travel.history.is_empty());
        assert!(travel.active);
    }

    #[test]
    fn out_of_order_fix_is_dropped() {
        let mut travel = Travel::new(route(), Utc::now());
        assert!(travel.push_sample(sample_at(12.970, 77.590, 10)));
        assert!(!travel.push_sample(sample_at(12.971, 77.591, 5)));
        assert_eq!(travel.history.len(), 1);
        // Equal timestamps are fine, completion order wins.
        assert!(travel.push_sample(sample_at(12.971, 77.591, 10)));
    }

    #[test]
    fn trail_is_capped_but_distance_is_not() {
        let mut travel = Travel::new(route(), Utc::now());
        for i in 0..30 {
            travel.push_sample(sample_at(12.97 + i as f64 * 0.0001, 77.59, i));
        }
        assert_eq!(travel.trail().len(), TRAIL_LEN);
        assert_eq!(travel.history.len(), 30);
        // All 29 legs contribute, not just the trailing window.
        let full = travel.total_distance_km();
        let windowed = geo::cumulative_distance(travel.trail());
        assert!(full > windowed);
    }

    #[test]
    fn arrival_uses_the_50_meter_threshold() {
        let travel = Travel::new(route(), Utc::now());
        let end = travel.route.end;

        // ~0.04 km north of the destination: arrived.
        let near = Coordinate::new(end.lat + 0.04 / 111.0, end.lng);
        assert!(travel.has_arrived(near));

        // ~0.06 km north: not yet.
        let far = Coordinate::new(end.lat + 0.06 / 111.0, end.lng);
        assert!(!travel.has_arrived(far));
    }
}
