//! Live route tracking: one chosen route, one position feed, one travel
//! record on the backend.

use chrono::Utc;
use route_guard_lib::location::LocationSample;
use route_guard_lib::route::ChosenRoute;
use route_guard_lib::travel::Travel;
use yew::Callback;

use crate::geolocation::{Cadence, GeoError, PositionFeed};

/// Position capture cadence while a session is live. Shared with the SOS
/// flow, which polls the same way against the alert endpoint.
pub const LOCATION_TICK_MS: u32 = 5_000;

/// A running trip. The position feed is owned here, so dropping the
/// tracker cancels the polling with it.
pub struct LiveTracker {
    pub travel: Travel,
    _feed: PositionFeed,
}

impl LiveTracker {
    /// Starts polling for a registered trip. Taking the travel id by value
    /// makes it impossible to begin the feed before registration
    /// completed, so no location update can ever be sent without one.
    pub fn start(
        travel_id: String,
        route: ChosenRoute,
        on_fix: Callback<LocationSample>,
        on_error: Callback<GeoError>,
    ) -> Result<Self, GeoError> {
        let mut travel = Travel::new(route, Utc::now());
        travel.travel_id = Some(travel_id);
        let feed = PositionFeed::start(
            Cadence::Poll {
                interval_ms: LOCATION_TICK_MS,
            },
            on_fix,
            on_error,
        )?;
        Ok(Self {
            travel,
            _feed: feed,
        })
    }
}
