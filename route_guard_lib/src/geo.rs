//! Great-circle math and the walking-time estimate derived from it.

use crate::location::{Coordinate, LocationSample};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed walking speed for ETA estimates.
pub const WALKING_SPEED_KMH: f64 = 5.0;

/// A trip counts as arrived within 50 meters of the destination.
pub const ARRIVAL_THRESHOLD_KM: f64 = 0.05;

pub fn haversine_distance(p1: Coordinate, p2: Coordinate) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lng = (p2.lng - p1.lng).to_radians();
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();

    let a = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lng / 2.).powi(2);
    let c = 2. * f64::atan2(a.sqrt(), (1. - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sum of the consecutive legs of a sample history, in km.
pub fn cumulative_distance(samples: &[LocationSample]) -> f64 {
    samples
        .windows(2)
        .map(|pair| haversine_distance(pair[0].coordinate(), pair[1].coordinate()))
        .sum()
}

pub fn walking_eta_minutes(distance_km: f64) -> u32 {
    (distance_km / WALKING_SPEED_KMH * 60.0).round() as u32
}

/// "45m" below an hour, "1h 30m" from there on.
pub fn format_eta(minutes: u32) -> String {
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(lat: f64, lng: f64) -> LocationSample {
        LocationSample {
            lat,
            lng,
            accuracy: 10.0,
            speed: None,
            heading: None,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = Coordinate::new(12.97, 77.59);
        let b = Coordinate::new(12.98, 77.60);
        assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-12);
    }

    #[test]
    fn haversine_of_identical_points_is_zero() {
        let a = Coordinate::new(55.6761, 12.5683);
        assert_eq!(haversine_distance(a, a), 0.0);
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Copenhagen to Aarhus, roughly 157 km.
        let cph = Coordinate::new(55.6761, 12.5683);
        let aar = Coordinate::new(56.1629, 10.2039);
        let d = haversine_distance(cph, aar);
        assert!((d - 157.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn cumulative_distance_is_sum_of_pairwise_legs() {
        let samples = vec![
            sample(12.970, 77.590),
            sample(12.975, 77.595),
            sample(12.980, 77.600),
        ];
        let expected = haversine_distance(
            samples[0].coordinate(),
            samples[1].coordinate(),
        ) + haversine_distance(samples[1].coordinate(), samples[2].coordinate());
        assert!((cumulative_distance(&samples) - expected).abs() < 1e-12);
    }

    #[test]
    fn cumulative_distance_never_shrinks_as_samples_append() {
        let mut samples = vec![sample(12.970, 77.590)];
        let mut previous = cumulative_distance(&samples);
        for i in 1..10 {
            samples.push(sample(12.970 + i as f64 * 0.001, 77.590));
            let next = cumulative_distance(&samples);
            assert!(next >= previous);
            previous = next;
        }
    }

    #[test]
    fn eta_formatting() {
        assert_eq!(format_eta(45), "45m");
        assert_eq!(format_eta(90), "1h 30m");
        assert_eq!(format_eta(60), "1h 0m");
        assert_eq!(format_eta(0), "0m");
    }

    #[test]
    fn walking_eta_rounds_to_whole_minutes() {
        // 1 km at 5 km/h is 12 minutes.
        assert_eq!(walking_eta_minutes(1.0), 12);
        assert_eq!(walking_eta_minutes(0.0), 0);
        assert_eq!(walking_eta_minutes(7.5), 90);
    }
}
