//! JSON client for the RouteGuard backend. State-changing calls carry the
//! CSRF token from the `csrftoken` cookie as `X-CSRFToken`.

use chrono::{DateTime, Utc};
use gloo_net::http::{Request, Response};
use route_guard_lib::location::{Coordinate, LocationSample};
use route_guard_lib::news::NewsItem;
use route_guard_lib::route::{ChosenRoute, RouteLeg, SafetyGrade, ScoreRequest, ScoreResponse};
use route_guard_lib::sos::SosDispatch;
use route_guard_lib::user::UserInfo;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use wasm_bindgen::JsCast;
use web_sys::FormData;

#[derive(Debug)]
pub enum ApiError {
    Network(gloo_net::Error),
    Status(u16),
    Service(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "network error: {e}"),
            ApiError::Status(code) => write!(f, "server responded with status {code}"),
            ApiError::Service(message) => write!(f, "{message}"),
        }
    }
}

impl From<gloo_net::Error> for ApiError {
    fn from(e: gloo_net::Error) -> Self {
        ApiError::Network(e)
    }
}

fn csrf_token() -> Option<String> {
    let cookies = gloo_utils::document()
        .dyn_into::<web_sys::HtmlDocument>()
        .ok()?
        .cookie()
        .ok()?;
    cookie_value(&cookies, "csrftoken")
}

/// Extracts one value from a `;`-separated cookie string.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
        .map(str::to_owned)
}

pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    decode(Request::get(url).send().await?).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let mut request = Request::post(path);
    if let Some(token) = csrf_token() {
        request = request.header("X-CSRFToken", &token);
    }
    decode(request.json(body)?.send().await?).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }
    Ok(response.json().await?)
}

// ---------- route scoring ----------

pub async fn score_routes(legs: Vec<RouteLeg>) -> Result<ScoreResponse, ApiError> {
    let request = ScoreRequest {
        routes: legs,
        current_time: Utc::now(),
    };
    post_json("/api/calculate-route/", &request).await
}

// ---------- trip tracking ----------

#[derive(Serialize)]
struct RouteData<'a> {
    coordinates: &'a [Coordinate],
    score: u8,
    grade: SafetyGrade,
}

#[derive(Serialize)]
struct StartTrackingRequest<'a> {
    start_lat: f64,
    start_lng: f64,
    end_lat: f64,
    end_lng: f64,
    route_data: RouteData<'a>,
    safety_score: u8,
}

#[derive(Deserialize)]
struct TravelStarted {
    travel_id: String,
}

/// Registers a trip and returns the server-issued travel id. Location
/// updates may only flow once this has succeeded.
pub async fn start_tracking(route: &ChosenRoute) -> Result<String, ApiError> {
    let request = StartTrackingRequest {
        start_lat: route.start.lat,
        start_lng: route.start.lng,
        end_lat: route.end.lat,
        end_lng: route.end.lng,
        route_data: RouteData {
            coordinates: &route.coordinates,
            score: route.score,
            grade: route.grade,
        },
        safety_score: route.score,
    };
    let started: TravelStarted = post_json("/api/tracking/start/", &request).await?;
    Ok(started.travel_id)
}

#[derive(Serialize)]
struct TrackingUpdate<'a> {
    travel_id: &'a str,
    #[serde(flatten)]
    sample: &'a LocationSample,
}

pub async fn push_tracking_update(travel_id: &str, sample: &LocationSample) -> Result<(), ApiError> {
    let _: serde_json::Value =
        post_json("/api/tracking/update/", &TrackingUpdate { travel_id, sample }).await?;
    Ok(())
}

#[derive(Serialize)]
struct EndTrackingRequest<'a> {
    travel_id: &'a str,
    end_time: DateTime<Utc>,
    distance_km: f64,
}

pub async fn end_tracking(travel_id: &str, distance_km: f64) -> Result<(), ApiError> {
    let request = EndTrackingRequest {
        travel_id,
        end_time: Utc::now(),
        distance_km,
    };
    let _: serde_json::Value = post_json("/api/tracking/end/", &request).await?;
    Ok(())
}

// ---------- SOS ----------

#[derive(Serialize)]
struct TriggerSosRequest {
    latitude: f64,
    longitude: f64,
    timestamp: DateTime<Utc>,
}

pub async fn trigger_sos(position: &LocationSample) -> Result<SosDispatch, ApiError> {
    let request = TriggerSosRequest {
        latitude: position.lat,
        longitude: position.lng,
        timestamp: position.timestamp,
    };
    post_json("/api/sos/trigger/", &request).await
}

#[derive(Serialize)]
struct SosLocationUpdate<'a> {
    alert_id: &'a str,
    latitude: f64,
    longitude: f64,
    accuracy: f64,
    speed: Option<f64>,
    heading: Option<f64>,
    timestamp: DateTime<Utc>,
}

pub async fn push_sos_location(alert_id: &str, sample: &LocationSample) -> Result<(), ApiError> {
    let request = SosLocationUpdate {
        alert_id,
        latitude: sample.lat,
        longitude: sample.lng,
        accuracy: sample.accuracy,
        speed: sample.speed,
        heading: sample.heading,
        timestamp: sample.timestamp,
    };
    let _: serde_json::Value = post_json("/api/sos/update-location/", &request).await?;
    Ok(())
}

#[derive(Serialize)]
struct ResolveSosRequest<'a> {
    alert_id: &'a str,
    resolved_by: &'a str,
}

pub async fn resolve_sos(alert_id: &str) -> Result<(), ApiError> {
    let request = ResolveSosRequest {
        alert_id,
        resolved_by: "user",
    };
    let _: serde_json::Value = post_json("/api/sos/resolve/", &request).await?;
    Ok(())
}

// ---------- news, auth ----------

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

pub async fn latest_news() -> Result<Vec<NewsItem>, ApiError> {
    let response: NewsResponse = get_json("/api/news/latest/").await?;
    Ok(response.news)
}

pub async fn current_user() -> Result<UserInfo, ApiError> {
    get_json("/api/auth/user/").await
}

pub async fn logout() -> Result<(), ApiError> {
    let mut request = Request::post("/auth/logout/");
    if let Some(token) = csrf_token() {
        request = request.header("X-CSRFToken", &token);
    }
    let response = request.send().await?;
    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }
    Ok(())
}

// ---------- crime data management ----------

#[derive(Serialize)]
struct SampleDataRequest {
    lat: f64,
    lon: f64,
    num_points: u32,
    radius_km: f64,
}

#[derive(Deserialize)]
struct SampleDataResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    crimes_created: u64,
}

/// Seeds 100 sample crime points within 5 km of `center`.
pub async fn generate_sample_data(center: Coordinate) -> Result<u64, ApiError> {
    let request = SampleDataRequest {
        lat: center.lat,
        lon: center.lng,
        num_points: 100,
        radius_km: 5.0,
    };
    let response: SampleDataResponse = post_json("/api/generate-sample-data/", &request).await?;
    if !response.success {
        return Err(ApiError::Service("sample data generation failed".into()));
    }
    Ok(response.crimes_created)
}

#[derive(Deserialize)]
struct CsvImportResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    imported: u64,
    #[serde(default)]
    error: Option<String>,
}

pub async fn upload_crime_csv(file: web_sys::File) -> Result<u64, ApiError> {
    let form = FormData::new().map_err(|_| ApiError::Service("could not build form".into()))?;
    form.append_with_blob("csv_file", &file)
        .map_err(|_| ApiError::Service("could not attach file".into()))?;
    let _ = form.append_with_str("clear_existing", "false");

    let mut request = Request::post("/api/upload-csv/");
    if let Some(token) = csrf_token() {
        request = request.header("X-CSRFToken", &token);
    }
    let response = request.body(form)?.send().await?;
    if !response.ok() {
        return Err(ApiError::Status(response.status()));
    }
    let result: CsvImportResponse = response.json().await?;
    if !result.success {
        return Err(ApiError::Service(
            result.error.unwrap_or_else(|| "import failed".into()),
        ));
    }
    Ok(result.imported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_value_finds_the_named_cookie() {
        let cookies = "sessionid=abc123; csrftoken=tok-42; theme=dark";
        assert_eq!(cookie_value(cookies, "csrftoken"), Some("tok-42".into()));
        assert_eq!(cookie_value(cookies, "sessionid"), Some("abc123".into()));
        assert_eq!(cookie_value(cookies, "missing"), None);
    }

    #[test]
    fn cookie_value_does_not_match_prefixes() {
        let cookies = "xcsrftoken=no; csrftoken=yes";
        assert_eq!(cookie_value(cookies, "csrftoken"), Some("yes".into()));
    }
}
