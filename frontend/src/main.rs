use gloo_console::{info, warn};
use gloo_timers::callback::Timeout;
use route_guard_lib::location::{Coordinate, LocationSample};
use route_guard_lib::news::NewsItem;
use route_guard_lib::panel::{Panel, PanelState};
use route_guard_lib::route::{RouteCandidate, RouteLeg, ScoreResponse};
use route_guard_lib::travel::Travel;
use route_guard_lib::user::UserInfo;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiError;
use crate::components::map_component::{DEFAULT_CENTER, MapComponent};
use crate::components::nav_bar::NavBar;
use crate::components::news_panel::NewsPanel;
use crate::components::options_panel::OptionsPanel;
use crate::components::profile_panel::ProfilePanel;
use crate::components::results_panel::ResultsPanel;
use crate::components::route_panel::{Field, RoutePanel};
use crate::components::sos::SosOverlay;
use crate::components::tracking_panel::TrackingPanel;
use crate::geolocation::GeoError;
use crate::tracking::LiveTracker;
use crate::util::confirm;

mod api;
mod components;
mod geocode;
mod geolocation;
mod media;
mod routing;
mod tracking;
mod util;

const TOAST_MS: u32 = 4_000;
const NEWS_STARTUP_DELAY_MS: u32 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn color(self) -> &'static str {
        match self {
            ToastKind::Success => "#10b981",
            ToastKind::Error => "#ef4444",
            ToastKind::Warning => "#f59e0b",
            ToastKind::Info => "#1e293b",
        }
    }
}

pub type ToastMsg = (String, ToastKind);

#[derive(Debug, Clone, PartialEq)]
struct Toast {
    id: usize,
    message: String,
    kind: ToastKind,
}

pub enum Msg {
    ShowPanel(Panel),
    ClosePanel,
    MapClicked(Coordinate),
    SetStart {
        coordinate: Coordinate,
        label: Option<String>,
    },
    SetEnd {
        coordinate: Coordinate,
        label: Option<String>,
    },
    UseCurrentLocation,
    CurrentLocated(Result<LocationSample, GeoError>),
    ClearRoute,
    CalculateRoute,
    RoutesScored(Result<(Vec<RouteLeg>, ScoreResponse), ApiError>),
    ChooseRoute(usize),
    TrackingRegistered {
        result: Result<String, ApiError>,
        route: route_guard_lib::route::ChosenRoute,
    },
    TrackingFix(LocationSample),
    TrackingGeoFailure(GeoError),
    StopTracking,
    UserLoaded(UserInfo),
    Logout,
    LoggedOut,
    NewsLoaded(Vec<NewsItem>),
    ToggleNews,
    GenerateSampleData,
    SampleDataDone(Result<u64, ApiError>),
    UploadCsv(web_sys::File),
    CsvUploaded(Result<u64, ApiError>),
    Toast(String, ToastKind),
    ToastExpired(usize),
}

/// Application root. Sole owner of the panel state machine, the route
/// candidates and the live tracking session; children receive them as
/// props and talk back through callbacks.
struct Model {
    panels: PanelState,
    start: Option<Coordinate>,
    end: Option<Coordinate>,
    start_label: Option<String>,
    end_label: Option<String>,
    candidates: Vec<RouteCandidate>,
    recommended: usize,
    ai_explanation: Option<String>,
    tracker: Option<LiveTracker>,
    user: Option<UserInfo>,
    news: Vec<NewsItem>,
    news_open: bool,
    toasts: Vec<Toast>,
    next_toast_id: usize,
    loading: bool,
    data_busy: bool,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            if let Ok(user) = api::current_user().await {
                link.send_message(Msg::UserLoaded(user));
            }
        });

        // The news feed is not worth delaying first paint for.
        let link = ctx.link().clone();
        Timeout::new(NEWS_STARTUP_DELAY_MS, move || {
            spawn_local(async move {
                if let Ok(news) = api::latest_news().await {
                    link.send_message(Msg::NewsLoaded(news));
                }
            });
        })
        .forget();

        Self {
            panels: PanelState::default(),
            start: None,
            end: None,
            start_label: None,
            end_label: None,
            candidates: Vec::new(),
            recommended: 0,
            ai_explanation: None,
            tracker: None,
            user: None,
            news: Vec::new(),
            news_open: false,
            toasts: Vec::new(),
            next_toast_id: 0,
            loading: false,
            data_busy: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::ShowPanel(panel) => {
                if !self.panels.show(panel) {
                    return false;
                }
                if panel == Panel::Profile {
                    // Entering the profile refreshes the account info.
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        if let Ok(user) = api::current_user().await {
                            link.send_message(Msg::UserLoaded(user));
                        }
                    });
                }
                true
            }
            Msg::ClosePanel => self.panels.close(),
            Msg::MapClicked(coordinate) => {
                if self.start.is_none() {
                    self.set_start(coordinate, None);
                } else if self.end.is_none() {
                    self.set_end(coordinate, None);
                } else {
                    self.clear_route_state();
                    self.set_start(coordinate, None);
                }
                true
            }
            Msg::SetStart { coordinate, label } => {
                self.set_start(coordinate, label);
                true
            }
            Msg::SetEnd { coordinate, label } => {
                self.set_end(coordinate, label);
                true
            }
            Msg::UseCurrentLocation => {
                self.loading = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::CurrentLocated(
                        crate::geolocation::current_position().await,
                    ));
                });
                true
            }
            Msg::CurrentLocated(result) => {
                self.loading = false;
                match result {
                    Ok(fix) => {
                        self.set_start(fix.coordinate(), None);
                        self.push_toast(ctx, "Current location set", ToastKind::Success);
                    }
                    Err(error) => {
                        self.push_toast(ctx, error.to_string(), ToastKind::Error);
                    }
                }
                true
            }
            Msg::ClearRoute => {
                self.clear_route_state();
                self.push_toast(ctx, "Route cleared", ToastKind::Info);
                true
            }
            Msg::CalculateRoute => {
                let (Some(start), Some(end)) = (self.start, self.end) else {
                    self.push_toast(
                        ctx,
                        "Please set both start and end points",
                        ToastKind::Warning,
                    );
                    return true;
                };
                self.loading = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = async {
                        let legs = routing::fetch_alternatives(start, end).await?;
                        if legs.is_empty() {
                            let empty = ScoreResponse {
                                routes: Vec::new(),
                                recommended_index: 0,
                                ai_explanation: None,
                            };
                            return Ok((legs, empty));
                        }
                        let scored = api::score_routes(legs.clone()).await?;
                        Ok((legs, scored))
                    }
                    .await;
                    link.send_message(Msg::RoutesScored(result));
                });
                true
            }
            Msg::RoutesScored(result) => {
                self.loading = false;
                match result {
                    Ok((legs, response)) => {
                        if legs.is_empty() {
                            self.push_toast(ctx, "No routes found", ToastKind::Warning);
                            return true;
                        }
                        self.candidates = legs
                            .into_iter()
                            .zip(response.routes)
                            .map(|(leg, scored)| RouteCandidate { leg, scored })
                            .collect();
                        self.recommended = response
                            .recommended_index
                            .min(self.candidates.len().saturating_sub(1));
                        self.ai_explanation = response.ai_explanation;
                        self.panels.show(Panel::Results);
                        self.push_toast(ctx, "Routes calculated successfully!", ToastKind::Success);
                    }
                    Err(error) => {
                        warn!(format!("route calculation failed: {error}"));
                        self.push_toast(ctx, "Failed to calculate routes", ToastKind::Error);
                    }
                }
                true
            }
            Msg::ChooseRoute(index) => {
                if self.tracker.is_some() {
                    self.push_toast(
                        ctx,
                        "A trip is already being tracked. End it before starting another.",
                        ToastKind::Warning,
                    );
                    return true;
                }
                let (Some(start), Some(end)) = (self.start, self.end) else {
                    self.push_toast(ctx, "Set start and destination first", ToastKind::Warning);
                    return true;
                };
                let Some(candidate) = self.candidates.get(index) else {
                    return false;
                };
                let route = candidate.choose(start, end);
                self.loading = true;
                let link = ctx.link().clone();
                let request_route = route.clone();
                spawn_local(async move {
                    let result = api::start_tracking(&request_route).await;
                    link.send_message(Msg::TrackingRegistered {
                        result,
                        route: request_route,
                    });
                });
                true
            }
            Msg::TrackingRegistered { result, route } => {
                self.loading = false;
                match result {
                    Ok(travel_id) => {
                        info!(format!("travel record created: {travel_id}"));
                        let on_fix = ctx.link().callback(Msg::TrackingFix);
                        let on_error = ctx.link().callback(Msg::TrackingGeoFailure);
                        match LiveTracker::start(travel_id.clone(), route, on_fix, on_error) {
                            Ok(tracker) => {
                                self.tracker = Some(tracker);
                                self.candidates.clear();
                                self.ai_explanation = None;
                                self.panels.show(Panel::Tracking);
                                self.push_toast(ctx, "🚀 Live tracking started!", ToastKind::Success);
                            }
                            Err(error) => {
                                // The trip is registered but can't be fed;
                                // close it out instead of leaving it open.
                                spawn_local(async move {
                                    let _ = api::end_tracking(&travel_id, 0.0).await;
                                });
                                self.push_toast(ctx, error.to_string(), ToastKind::Error);
                            }
                        }
                    }
                    Err(error) => {
                        warn!(format!("tracking registration failed: {error}"));
                        self.push_toast(ctx, "Failed to start tracking", ToastKind::Error);
                    }
                }
                true
            }
            Msg::TrackingFix(sample) => {
                let Some(tracker) = &mut self.tracker else {
                    return false;
                };
                let position = sample.coordinate();
                if !tracker.travel.push_sample(sample.clone()) {
                    return false;
                }
                if let Some(travel_id) = tracker.travel.travel_id.clone() {
                    // Best effort: a failed push is logged, never retried,
                    // and does not stop the interval.
                    spawn_local(async move {
                        if let Err(error) = api::push_tracking_update(&travel_id, &sample).await {
                            warn!(format!("location push failed: {error}"));
                        }
                    });
                }
                if tracker.travel.has_arrived(position) {
                    self.finish_trip(ctx, true);
                }
                true
            }
            Msg::TrackingGeoFailure(error) => {
                warn!(format!("tracking location error: {error}"));
                self.push_toast(ctx, error.to_string(), ToastKind::Error);
                true
            }
            Msg::StopTracking => {
                if self.tracker.is_none() {
                    return false;
                }
                if !confirm("Are you sure you want to end this trip?") {
                    return false;
                }
                self.finish_trip(ctx, false);
                true
            }
            Msg::UserLoaded(user) => {
                self.user = Some(user);
                true
            }
            Msg::Logout => {
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api::logout().await {
                        Ok(()) => link.send_message(Msg::LoggedOut),
                        Err(error) => link.send_message(Msg::Toast(
                            format!("Logout failed: {error}"),
                            ToastKind::Error,
                        )),
                    }
                });
                false
            }
            Msg::LoggedOut => {
                if let Some(window) = web_sys::window() {
                    let _ = window.location().set_href("/auth/login/");
                }
                false
            }
            Msg::NewsLoaded(news) => {
                self.news = news;
                true
            }
            Msg::ToggleNews => {
                self.news_open = !self.news_open;
                if self.news_open {
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        if let Ok(news) = api::latest_news().await {
                            link.send_message(Msg::NewsLoaded(news));
                        }
                    });
                }
                true
            }
            Msg::GenerateSampleData => {
                self.data_busy = true;
                let fallback = self.start.or(self.end);
                let link = ctx.link().clone();
                spawn_local(async move {
                    let center = match crate::geolocation::current_position().await {
                        Ok(fix) => fix.coordinate(),
                        Err(_) => fallback
                            .unwrap_or(Coordinate::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1)),
                    };
                    link.send_message(Msg::SampleDataDone(
                        api::generate_sample_data(center).await,
                    ));
                });
                true
            }
            Msg::SampleDataDone(result) => {
                self.data_busy = false;
                match result {
                    Ok(count) => self.push_toast(
                        ctx,
                        format!("Generated {count} sample crime points"),
                        ToastKind::Success,
                    ),
                    Err(error) => {
                        warn!(format!("sample data generation failed: {error}"));
                        self.push_toast(ctx, "Failed to generate sample data", ToastKind::Error);
                    }
                }
                true
            }
            Msg::UploadCsv(file) => {
                self.data_busy = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    link.send_message(Msg::CsvUploaded(api::upload_crime_csv(file).await));
                });
                true
            }
            Msg::CsvUploaded(result) => {
                self.data_busy = false;
                match result {
                    Ok(count) => self.push_toast(
                        ctx,
                        format!("Imported {count} crime records"),
                        ToastKind::Success,
                    ),
                    Err(error) => {
                        self.push_toast(ctx, format!("Import failed: {error}"), ToastKind::Error)
                    }
                }
                true
            }
            Msg::Toast(message, kind) => {
                self.push_toast(ctx, message, kind);
                true
            }
            Msg::ToastExpired(id) => {
                self.toasts.retain(|toast| toast.id != id);
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let travel = self.tracker.as_ref().map(|tracker| tracker.travel.clone());

        html! {
            <div class="app">
                <MapComponent
                    start={self.start}
                    end={self.end}
                    candidates={self.candidates.clone()}
                    travel={travel.clone()}
                    on_click={link.callback(Msg::MapClicked)}
                />

                {self.tracking_bar(ctx)}
                {self.active_panel(ctx, travel)}

                <NavBar
                    highlight={self.panels.nav_highlight()}
                    on_select={link.callback(Msg::ShowPanel)}
                />

                <SosOverlay on_toast={link.callback(|(message, kind)| Msg::Toast(message, kind))} />

                <NewsPanel
                    news={self.news.clone()}
                    open={self.news_open}
                    on_toggle={link.callback(|_| Msg::ToggleNews)}
                />

                {self.toast_stack()}

                if self.loading {
                    <div class="loading-overlay"><div class="spinner"></div></div>
                }
            </div>
        }
    }
}

impl Model {
    fn set_start(&mut self, coordinate: Coordinate, label: Option<String>) {
        self.start = Some(coordinate);
        self.start_label =
            Some(label.unwrap_or_else(|| format!("{:.5}, {:.5}", coordinate.lat, coordinate.lng)));
    }

    fn set_end(&mut self, coordinate: Coordinate, label: Option<String>) {
        self.end = Some(coordinate);
        self.end_label =
            Some(label.unwrap_or_else(|| format!("{:.5}, {:.5}", coordinate.lat, coordinate.lng)));
    }

    fn clear_route_state(&mut self) {
        self.start = None;
        self.end = None;
        self.start_label = None;
        self.end_label = None;
        self.candidates.clear();
        self.recommended = 0;
        self.ai_explanation = None;
    }

    /// Ends the running trip: drops the tracker (which cancels the
    /// location interval), reports the final distance and notifies the
    /// user. Harmless when no trip is running.
    fn finish_trip(&mut self, ctx: &Context<Self>, arrived: bool) {
        let Some(tracker) = self.tracker.take() else {
            return;
        };
        let distance_km = tracker.travel.total_distance_km();
        if let Some(travel_id) = tracker.travel.travel_id.clone() {
            spawn_local(async move {
                if let Err(error) = api::end_tracking(&travel_id, distance_km).await {
                    warn!(format!("end tracking failed: {error}"));
                }
            });
        }
        let message = if arrived {
            "🎉 You have arrived at your destination!"
        } else {
            "Trip ended successfully"
        };
        self.push_toast(ctx, message, ToastKind::Success);
    }

    fn push_toast(&mut self, ctx: &Context<Self>, message: impl Into<String>, kind: ToastKind) {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
        });
        let link = ctx.link().clone();
        Timeout::new(TOAST_MS, move || link.send_message(Msg::ToastExpired(id))).forget();
    }

    fn tracking_bar(&self, ctx: &Context<Self>) -> Html {
        let Some(tracker) = &self.tracker else {
            return html! {};
        };
        let speed = tracker
            .travel
            .latest()
            .map(|sample| sample.speed_kmh())
            .unwrap_or(0.0);
        let distance = tracker.travel.total_distance_km();

        html! {
            <div class="tracking-bar">
                <div class="tracking-dot"></div>
                <div>
                    <div class="tracking-bar-title">{"Live Tracking Active"}</div>
                    <div class="tracking-bar-stats">
                        {format!("Speed: {speed:.1} km/h | Distance: {distance:.2} km")}
                    </div>
                </div>
                <button
                    class="btn-danger end-trip-btn"
                    onclick={ctx.link().callback(|_| Msg::StopTracking)}
                >
                    {"End Trip"}
                </button>
            </div>
        }
    }

    fn active_panel(&self, ctx: &Context<Self>, travel: Option<Travel>) -> Html {
        let link = ctx.link();
        let Some(panel) = self.panels.open() else {
            return html! {};
        };

        let inner = match panel {
            Panel::Route => html! {
                <RoutePanel
                    start_label={self.start_label.clone()}
                    end_label={self.end_label.clone()}
                    on_set={link.callback(|(field, coordinate, label): (Field, Coordinate, String)| {
                        match field {
                            Field::Start => Msg::SetStart { coordinate, label: Some(label) },
                            Field::End => Msg::SetEnd { coordinate, label: Some(label) },
                        }
                    })}
                    on_use_current={link.callback(|_| Msg::UseCurrentLocation)}
                    on_calculate={link.callback(|_| Msg::CalculateRoute)}
                    on_clear={link.callback(|_| Msg::ClearRoute)}
                    can_calculate={self.start.is_some() && self.end.is_some()}
                    on_toast={link.callback(|(message, kind)| Msg::Toast(message, kind))}
                />
            },
            Panel::Results => html! {
                <ResultsPanel
                    candidates={self.candidates.clone()}
                    recommended={self.recommended}
                    ai_explanation={self.ai_explanation.clone()}
                    on_choose={link.callback(Msg::ChooseRoute)}
                />
            },
            Panel::Tracking => html! {
                <TrackingPanel
                    travel={travel}
                    on_stop={link.callback(|_| Msg::StopTracking)}
                />
            },
            Panel::Options => html! {
                <OptionsPanel
                    busy={self.data_busy}
                    on_generate={link.callback(|_| Msg::GenerateSampleData)}
                    on_csv={link.callback(Msg::UploadCsv)}
                    on_toast={link.callback(|(message, kind)| Msg::Toast(message, kind))}
                />
            },
            Panel::Profile => html! {
                <ProfilePanel
                    user={self.user.clone()}
                    on_logout={link.callback(|_| Msg::Logout)}
                />
            },
        };

        html! {
            <div class="mobile-panel show">
                <button class="panel-close" onclick={link.callback(|_| Msg::ClosePanel)}>
                    {"✕"}
                </button>
                {inner}
            </div>
        }
    }

    fn toast_stack(&self) -> Html {
        html! {
            <div id="toast-container">
                { for self.toasts.iter().map(|toast| html! {
                    <div class="toast" style={format!("background: {};", toast.kind.color())}>
                        {toast.message.clone()}
                    </div>
                })}
            </div>
        }
    }
}

fn main() {
    yew::Renderer::<Model>::new().render();
}
