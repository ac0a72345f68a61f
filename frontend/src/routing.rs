//! Turn-by-turn routing via the public OSRM service. Alternatives come
//! back mapped to the legs the scoring endpoint expects.

use route_guard_lib::location::Coordinate;
use route_guard_lib::route::RouteLeg;
use serde::Deserialize;

use crate::api::{self, ApiError};

const OSRM_SERVICE_URL: &str = "https://router.project-osrm.org/route/v1/foot";

#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: `[lng, lat]`.
    coordinates: Vec<[f64; 2]>,
}

pub async fn fetch_alternatives(
    start: Coordinate,
    end: Coordinate,
) -> Result<Vec<RouteLeg>, ApiError> {
    let response: OsrmResponse = api::get_json(&route_url(start, end)).await?;
    if response.code != "Ok" {
        return Err(ApiError::Service(format!(
            "routing service returned {}",
            response.code
        )));
    }
    Ok(response.routes.into_iter().map(into_leg).collect())
}

fn into_leg(route: OsrmRoute) -> RouteLeg {
    RouteLeg {
        coordinates: route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinate::new(lat, lng))
            .collect(),
        distance: route.distance / 1000.0,
        duration: route.duration / 60.0,
    }
}

fn route_url(start: Coordinate, end: Coordinate) -> String {
    format!(
        "{OSRM_SERVICE_URL}/{:.6},{:.6};{:.6},{:.6}?alternatives=true&overview=full&geometries=geojson",
        start.lng, start.lat, end.lng, end.lat
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_url_is_lng_lat_ordered() {
        let url = route_url(Coordinate::new(12.97, 77.59), Coordinate::new(12.98, 77.60));
        assert!(url.contains("/77.590000,12.970000;77.600000,12.980000?"));
        assert!(url.contains("alternatives=true"));
    }

    #[test]
    fn legs_convert_units_and_axis_order() {
        let leg = into_leg(OsrmRoute {
            distance: 1500.0,
            duration: 1080.0,
            geometry: OsrmGeometry {
                coordinates: vec![[77.59, 12.97]],
            },
        });
        assert_eq!(leg.distance, 1.5);
        assert_eq!(leg.duration, 18.0);
        assert_eq!(leg.coordinates[0], Coordinate::new(12.97, 77.59));
    }
}
