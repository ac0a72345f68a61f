//! Uniform wrapper over the browser's one-shot and continuous position
//! APIs. Sessions consume fixes through one capability with a configurable
//! cadence instead of hand-rolled `setInterval`/`watchPosition` pairs.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Utc;
use futures::channel::oneshot;
use gloo_timers::callback::Interval;
use route_guard_lib::location::LocationSample;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Geolocation, Position, PositionError, PositionOptions};
use yew::Callback;

/// High-accuracy fix acquisition: never serve a cached position, give up
/// after ten seconds.
const FIX_TIMEOUT_MS: u32 = 10_000;

/// A continuous watch may reuse fixes up to a second old.
const WATCH_MAX_AGE_MS: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    PermissionDenied,
    Unavailable,
    Timeout,
    Unsupported,
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            GeoError::PermissionDenied => "Location permission denied",
            GeoError::Unavailable => "Location unavailable",
            GeoError::Timeout => "Location timeout",
            GeoError::Unsupported => "Geolocation not supported",
        };
        write!(f, "{message}")
    }
}

fn geolocation() -> Result<Geolocation, GeoError> {
    web_sys::window()
        .and_then(|window| window.navigator().geolocation().ok())
        .ok_or(GeoError::Unsupported)
}

fn one_shot_options() -> PositionOptions {
    let options = PositionOptions::new();
    options.set_enable_high_accuracy(true);
    options.set_timeout(FIX_TIMEOUT_MS);
    options.set_maximum_age(0);
    options
}

fn watch_options() -> PositionOptions {
    let options = PositionOptions::new();
    options.set_enable_high_accuracy(true);
    options.set_timeout(FIX_TIMEOUT_MS);
    options.set_maximum_age(WATCH_MAX_AGE_MS);
    options
}

fn sample_from(position: &Position) -> LocationSample {
    let coords = position.coords();
    LocationSample {
        lat: coords.latitude(),
        lng: coords.longitude(),
        accuracy: coords.accuracy(),
        speed: coords.speed(),
        heading: coords.heading(),
        timestamp: Utc::now(),
    }
}

fn error_from(error: &PositionError) -> GeoError {
    // 1 = permission denied, 2 = position unavailable, 3 = timeout.
    match error.code() {
        1 => GeoError::PermissionDenied,
        2 => GeoError::Unavailable,
        _ => GeoError::Timeout,
    }
}

/// Acquires a single high-accuracy fix.
pub async fn current_position() -> Result<LocationSample, GeoError> {
    let geolocation = geolocation()?;
    let (tx, rx) = oneshot::channel();
    let sender = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let sender = sender.clone();
        Closure::once(move |position: Position| {
            if let Some(tx) = sender.borrow_mut().take() {
                let _ = tx.send(Ok(sample_from(&position)));
            }
        })
    };
    let on_error = {
        let sender = sender.clone();
        Closure::once(move |error: PositionError| {
            if let Some(tx) = sender.borrow_mut().take() {
                let _ = tx.send(Err(error_from(&error)));
            }
        })
    };

    geolocation
        .get_current_position_with_error_callback_and_options(
            on_success.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
            &one_shot_options(),
        )
        .map_err(|_| GeoError::Unsupported)?;

    rx.await.unwrap_or(Err(GeoError::Unavailable))
}

/// How a session consumes fixes: repeated one-shot polls at a fixed
/// cadence, or the browser's continuous watch. The payload shape is the
/// same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Poll { interval_ms: u32 },
    Watch,
}

/// A running position subscription. Dropping it clears the interval or
/// watch registration, so a stale subscription cannot outlive its session.
pub enum PositionFeed {
    Poll {
        _interval: Interval,
    },
    Watch {
        watch_id: i32,
        _on_fix: Closure<dyn FnMut(Position)>,
        _on_error: Closure<dyn FnMut(PositionError)>,
    },
}

impl PositionFeed {
    /// Starts the feed. In poll mode the first fix is requested
    /// immediately, not after the first interval tick.
    pub fn start(
        cadence: Cadence,
        on_fix: Callback<LocationSample>,
        on_error: Callback<GeoError>,
    ) -> Result<Self, GeoError> {
        match cadence {
            Cadence::Poll { interval_ms } => {
                // Probe for API presence up front so a missing geolocation
                // object fails the start instead of every tick.
                geolocation()?;
                request_fix(on_fix.clone(), on_error.clone());
                let interval = Interval::new(interval_ms, move || {
                    request_fix(on_fix.clone(), on_error.clone());
                });
                Ok(PositionFeed::Poll {
                    _interval: interval,
                })
            }
            Cadence::Watch => {
                let geolocation = geolocation()?;
                let fix = Closure::new(move |position: Position| {
                    on_fix.emit(sample_from(&position));
                });
                let error = Closure::new(move |e: PositionError| {
                    on_error.emit(error_from(&e));
                });
                let watch_id = geolocation
                    .watch_position_with_error_callback_and_options(
                        fix.as_ref().unchecked_ref(),
                        Some(error.as_ref().unchecked_ref()),
                        &watch_options(),
                    )
                    .map_err(|_| GeoError::Unsupported)?;
                Ok(PositionFeed::Watch {
                    watch_id,
                    _on_fix: fix,
                    _on_error: error,
                })
            }
        }
    }
}

fn request_fix(on_fix: Callback<LocationSample>, on_error: Callback<GeoError>) {
    spawn_local(async move {
        match current_position().await {
            Ok(sample) => on_fix.emit(sample),
            Err(error) => on_error.emit(error),
        }
    });
}

impl Drop for PositionFeed {
    fn drop(&mut self) {
        if let PositionFeed::Watch { watch_id, .. } = self {
            if let Ok(geolocation) = geolocation() {
                geolocation.clear_watch(*watch_id);
            }
        }
    }
}
