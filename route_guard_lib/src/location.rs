use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic point. Serialized as a `[lat, lng]` pair, which is the
/// shape route geometry has on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(pair: [f64; 2]) -> Self {
        Self {
            lat: pair[0],
            lng: pair[1],
        }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lng]
    }
}

/// One GPS fix. Field names match the tracking and SOS location-update
/// payloads, so a sample serializes straight into either request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub lat: f64,
    pub lng: f64,
    /// Reported horizontal accuracy in meters.
    pub accuracy: f64,
    /// Ground speed in m/s, when the device reports one.
    pub speed: Option<f64>,
    /// Heading in degrees clockwise from north, when moving.
    pub heading: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed.unwrap_or(0.0) * 3.6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_round_trips_as_pair() {
        let c = Coordinate::new(12.97, 77.59);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "[12.97,77.59]");
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn speed_converts_to_kmh() {
        let sample = LocationSample {
            lat: 0.0,
            lng: 0.0,
            accuracy: 5.0,
            speed: Some(2.5),
            heading: None,
            timestamp: Utc::now(),
        };
        assert!((sample.speed_kmh() - 9.0).abs() < 1e-9);

        let still = LocationSample { speed: None, ..sample };
        assert_eq!(still.speed_kmh(), 0.0);
    }
}
