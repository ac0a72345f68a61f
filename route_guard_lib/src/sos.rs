use serde::{Deserialize, Serialize};

/// SOS lifecycle: idle → counting down → active → idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SosPhase {
    #[default]
    Idle,
    CountingDown,
    Active,
}

pub const COUNTDOWN_START: u8 = 3;

/// The 3-2-1 gate in front of an activation, ticked once a second.
/// Cancelling during the countdown must have no side effects, so the
/// countdown itself carries no session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SosCountdown {
    remaining: u8,
}

impl SosCountdown {
    pub fn new() -> Self {
        Self {
            remaining: COUNTDOWN_START,
        }
    }

    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    /// Returns `true` when the countdown reached zero and the alert fires.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }
}

impl Default for SosCountdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Recording timer display, "MM:SS".
pub fn format_clock(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub name: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestStation {
    pub name: String,
    #[serde(default)]
    pub distance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub number: String,
}

/// Response to an alert creation. `backup_mode` flags that no responder
/// was available and the user is pointed at direct emergency numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SosDispatch {
    pub alert_id: String,
    #[serde(default)]
    pub officer: Option<Officer>,
    #[serde(default)]
    pub backup_mode: bool,
    #[serde(default)]
    pub nearest_station: Option<NearestStation>,
    #[serde(default)]
    pub emergency_contacts: Vec<EmergencyContact>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_fires_on_the_third_tick() {
        let mut countdown = SosCountdown::new();
        assert_eq!(countdown.remaining(), 3);
        assert!(!countdown.tick());
        assert!(!countdown.tick());
        assert!(countdown.tick());
        // Further ticks stay at zero instead of wrapping.
        assert!(countdown.tick());
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(600), "10:00");
    }

    #[test]
    fn dispatch_parses_the_assigned_officer_shape() {
        let json = r#"{
            "success": true,
            "alert_id": "42",
            "officer": {"name": "A. Kumar", "badge": "B-117", "station": "Central", "phone": "100"}
        }"#;
        let dispatch: SosDispatch = serde_json::from_str(json).unwrap();
        assert_eq!(dispatch.alert_id, "42");
        assert!(!dispatch.backup_mode);
        assert_eq!(dispatch.officer.unwrap().name, "A. Kumar");
        assert!(dispatch.emergency_contacts.is_empty());
    }

    #[test]
    fn dispatch_parses_the_backup_mode_shape() {
        let json = r#"{
            "alert_id": "43",
            "officer": null,
            "backup_mode": true,
            "nearest_station": {"name": "North Station", "distance": "4.2 km"},
            "emergency_contacts": [{"name": "Police", "number": "100"}],
            "message": "No on-duty officer nearby"
        }"#;
        let dispatch: SosDispatch = serde_json::from_str(json).unwrap();
        assert!(dispatch.backup_mode);
        assert_eq!(dispatch.nearest_station.unwrap().name, "North Station");
        assert_eq!(dispatch.emergency_contacts.len(), 1);
    }
}
