//! Place search and reverse lookup via Nominatim.

use route_guard_lib::location::Coordinate;
use serde::Deserialize;
use web_sys::js_sys;

use crate::api::{self, ApiError};

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";
const REVERSE_URL: &str = "https://nominatim.openstreetmap.org/reverse";

/// One geocoding match. Nominatim returns coordinates as strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    lat: String,
    lon: String,
    pub display_name: String,
}

impl Place {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(
            self.lat.parse().ok()?,
            self.lon.parse().ok()?,
        ))
    }

    /// First segment of the display name, used as the suggestion headline.
    pub fn main_text(&self) -> &str {
        self.display_name
            .split(',')
            .next()
            .unwrap_or(&self.display_name)
            .trim()
    }

    /// The next two segments, used as the suggestion subtitle.
    pub fn sub_text(&self) -> String {
        self.display_name
            .split(',')
            .skip(1)
            .take(2)
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub async fn search(query: &str, limit: u8) -> Result<Vec<Place>, ApiError> {
    let encoded = String::from(js_sys::encode_uri_component(query));
    let url = format!("{SEARCH_URL}?format=json&q={encoded}&limit={limit}&addressdetails=1");
    api::get_json(&url).await
}

#[derive(Deserialize)]
struct ReverseResult {
    #[serde(default)]
    display_name: String,
}

/// Best-effort street name for a coordinate; `None` when the lookup fails.
pub async fn reverse(coordinate: Coordinate) -> Option<String> {
    let url = format!(
        "{REVERSE_URL}?format=json&lat={}&lon={}",
        coordinate.lat, coordinate.lng
    );
    api::get_json::<ReverseResult>(&url)
        .await
        .ok()
        .map(|r| r.display_name)
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_splits_display_name() {
        let place = Place {
            lat: "12.9716".into(),
            lon: "77.5946".into(),
            display_name: "MG Road, Shivaji Nagar, Bengaluru, Karnataka, India".into(),
        };
        assert_eq!(place.main_text(), "MG Road");
        assert_eq!(place.sub_text(), "Shivaji Nagar, Bengaluru");
        let c = place.coordinate().unwrap();
        assert!((c.lat - 12.9716).abs() < 1e-9);
    }

    #[test]
    fn unparsable_coordinates_yield_none() {
        let place = Place {
            lat: "not-a-number".into(),
            lon: "77.0".into(),
            display_name: "nowhere".into(),
        };
        assert!(place.coordinate().is_none());
    }
}
