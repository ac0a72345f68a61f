use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::location::Coordinate;

/// Polyline color for routes that have no grade yet (unscored
/// alternatives shown while a candidate set is being previewed).
pub const UNGRADED_COLOR: &str = "#64748b";

/// Letter rating the backend assigns to a scored route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyGrade {
    A,
    B,
    C,
    D,
    F,
}

impl SafetyGrade {
    /// Color the route polyline is drawn with on the map.
    pub fn color(self) -> &'static str {
        match self {
            SafetyGrade::A => "#10b981",
            SafetyGrade::B => "#3b82f6",
            SafetyGrade::C => "#f59e0b",
            SafetyGrade::D => "#ef4444",
            SafetyGrade::F => "#dc2626",
        }
    }

    /// CSS class of the grade badge on a route card.
    pub fn badge_class(self) -> &'static str {
        match self {
            SafetyGrade::A | SafetyGrade::B => "badge-success",
            SafetyGrade::C => "badge-warning",
            SafetyGrade::D | SafetyGrade::F => "badge-danger",
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            SafetyGrade::A => "A",
            SafetyGrade::B => "B",
            SafetyGrade::C => "C",
            SafetyGrade::D => "D",
            SafetyGrade::F => "F",
        }
    }
}

/// One routing alternative as sent to the scoring endpoint: the geometry
/// plus the routing service's own distance (km) and duration (minutes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub coordinates: Vec<Coordinate>,
    pub distance: f64,
    pub duration: f64,
}

/// Safety assessment of one alternative, as returned by the backend.
/// Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRoute {
    pub score: u8,
    pub grade: SafetyGrade,
    pub distance_km: f64,
    pub duration_minutes: f64,
    #[serde(default)]
    pub crime_count: u32,
    #[serde(default)]
    pub safety_zone_count: u32,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub routes: Vec<RouteLeg>,
    pub current_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub routes: Vec<ScoredRoute>,
    pub recommended_index: usize,
    #[serde(default)]
    pub ai_explanation: Option<String>,
}

/// A scored alternative paired with its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteCandidate {
    pub leg: RouteLeg,
    pub scored: ScoredRoute,
}

impl RouteCandidate {
    /// Promotes this candidate to the route a trip is started with.
    pub fn choose(&self, start: Coordinate, end: Coordinate) -> ChosenRoute {
        ChosenRoute {
            start,
            end,
            coordinates: self.leg.coordinates.clone(),
            score: self.scored.score,
            grade: self.scored.grade,
        }
    }
}

/// The candidate the user committed to, with both endpoints resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenRoute {
    pub start: Coordinate,
    pub end: Coordinate,
    pub coordinates: Vec<Coordinate>,
    pub score: u8,
    pub grade: SafetyGrade,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_colors_follow_the_severity_ramp() {
        assert_eq!(SafetyGrade::A.color(), "#10b981");
        assert_eq!(SafetyGrade::B.color(), "#3b82f6");
        assert_eq!(SafetyGrade::C.color(), "#f59e0b");
        assert_eq!(SafetyGrade::D.color(), "#ef4444");
        assert_eq!(SafetyGrade::F.color(), "#dc2626");
    }

    #[test]
    fn badge_classes_group_grades() {
        assert_eq!(SafetyGrade::A.badge_class(), "badge-success");
        assert_eq!(SafetyGrade::B.badge_class(), "badge-success");
        assert_eq!(SafetyGrade::C.badge_class(), "badge-warning");
        assert_eq!(SafetyGrade::F.badge_class(), "badge-danger");
    }

    #[test]
    fn scored_route_deserializes_from_backend_shape() {
        let json = r#"{
            "score": 88,
            "grade": "A",
            "distance_km": 1.42,
            "duration_minutes": 17.0,
            "crime_count": 2,
            "safety_zone_count": 3,
            "details": "Mostly well-lit streets"
        }"#;
        let route: ScoredRoute = serde_json::from_str(json).unwrap();
        assert_eq!(route.score, 88);
        assert_eq!(route.grade, SafetyGrade::A);
        assert_eq!(route.crime_count, 2);
    }

    #[test]
    fn two_route_response_picks_recommended_and_colors() {
        let json = r#"{
            "routes": [
                {"score": 88, "grade": "A", "distance_km": 1.2, "duration_minutes": 15.0},
                {"score": 55, "grade": "C", "distance_km": 1.0, "duration_minutes": 12.0}
            ],
            "recommended_index": 0,
            "ai_explanation": "Route 1 avoids two recent incident clusters."
        }"#;
        let response: ScoreResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.recommended_index, 0);
        // Grade A draws green, grade C draws amber.
        assert_eq!(response.routes[0].grade.color(), "#10b981");
        assert_eq!(response.routes[1].grade.color(), "#f59e0b");
        assert!(response.ai_explanation.is_some());
    }

    #[test]
    fn score_request_serializes_geometry_as_pairs() {
        let request = ScoreRequest {
            routes: vec![RouteLeg {
                coordinates: vec![Coordinate::new(12.97, 77.59)],
                distance: 1.2,
                duration: 14.0,
            }],
            current_time: "2025-06-01T12:00:00Z".parse().unwrap(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["routes"][0]["coordinates"][0][0], 12.97);
        assert_eq!(json["routes"][0]["coordinates"][0][1], 77.59);
    }
}
