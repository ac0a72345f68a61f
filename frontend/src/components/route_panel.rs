use gloo_timers::callback::Timeout;
use route_guard_lib::location::Coordinate;
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

use crate::api::ApiError;
use crate::geocode::{self, Place};
use crate::{ToastKind, ToastMsg};

/// Queries shorter than this only show the quick-location shortcuts.
const MIN_QUERY_LEN: usize = 3;
const SEARCH_DEBOUNCE_MS: u32 = 400;
const SUGGESTION_LIMIT: u8 = 5;

const QUICK_LOCATIONS: [(&str, &str); 3] =
    [("🏠", "Home"), ("💼", "Work"), ("🏥", "Hospital")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Start,
    End,
}

pub enum RouteMsg {
    Input(Field, String),
    RunSearch(Field),
    SearchResults(Field, Result<Vec<Place>, ApiError>),
    Select(Field, Place),
    QuickLocation(Field, &'static str),
    Focus(Field),
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub start_label: Option<String>,
    pub end_label: Option<String>,
    pub on_set: Callback<(Field, Coordinate, String)>,
    pub on_use_current: Callback<()>,
    pub on_calculate: Callback<()>,
    pub on_clear: Callback<()>,
    pub can_calculate: bool,
    pub on_toast: Callback<ToastMsg>,
}

/// Start/destination entry: free-text search with suggestions, quick
/// locations, current-location shortcut. Selecting a place hands the
/// resolved coordinate up; this panel never owns route state itself.
pub struct RoutePanel {
    query: String,
    active_field: Option<Field>,
    suggestions: Vec<Place>,
    show_quick: bool,
    debounce: Option<Timeout>,
}

impl Component for RoutePanel {
    type Message = RouteMsg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            query: String::new(),
            active_field: None,
            suggestions: Vec::new(),
            show_quick: false,
            debounce: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            RouteMsg::Focus(field) => {
                self.active_field = Some(field);
                self.show_quick = self.query.is_empty();
                true
            }
            RouteMsg::Input(field, value) => {
                self.active_field = Some(field);
                self.query = value;
                self.show_quick = self.query.is_empty();
                self.suggestions.clear();
                self.debounce = None;
                if self.query.trim().len() >= MIN_QUERY_LEN {
                    let link = ctx.link().clone();
                    self.debounce = Some(Timeout::new(SEARCH_DEBOUNCE_MS, move || {
                        link.send_message(RouteMsg::RunSearch(field));
                    }));
                }
                true
            }
            RouteMsg::RunSearch(field) => {
                let query = self.query.trim().to_owned();
                if query.len() < MIN_QUERY_LEN {
                    return false;
                }
                let link = ctx.link().clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let results = geocode::search(&query, SUGGESTION_LIMIT).await;
                    link.send_message(RouteMsg::SearchResults(field, results));
                });
                false
            }
            RouteMsg::SearchResults(field, results) => {
                if self.active_field != Some(field) {
                    return false;
                }
                match results {
                    Ok(places) => {
                        self.suggestions = places;
                        true
                    }
                    Err(error) => {
                        ctx.props()
                            .on_toast
                            .emit((format!("Location search failed: {error}"), ToastKind::Error));
                        false
                    }
                }
            }
            RouteMsg::Select(field, place) => {
                let Some(coordinate) = place.coordinate() else {
                    ctx.props()
                        .on_toast
                        .emit(("Could not read that location".into(), ToastKind::Error));
                    return false;
                };
                ctx.props()
                    .on_set
                    .emit((field, coordinate, place.main_text().to_owned()));
                self.query.clear();
                self.suggestions.clear();
                self.active_field = None;
                self.show_quick = false;
                true
            }
            RouteMsg::QuickLocation(field, name) => {
                let link = ctx.link().clone();
                let on_toast = ctx.props().on_toast.clone();
                let query = name.to_owned();
                wasm_bindgen_futures::spawn_local(async move {
                    match geocode::search(&query, 1).await {
                        Ok(places) => match places.into_iter().next() {
                            Some(place) => link.send_message(RouteMsg::Select(field, place)),
                            None => on_toast.emit((
                                format!("No match for {query}"),
                                ToastKind::Warning,
                            )),
                        },
                        Err(error) => on_toast.emit((
                            format!("Location search failed: {error}"),
                            ToastKind::Error,
                        )),
                    }
                });
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let link = ctx.link();

        let on_use_current = {
            let cb = props.on_use_current.clone();
            Callback::from(move |_| cb.emit(()))
        };
        let on_calculate = {
            let cb = props.on_calculate.clone();
            Callback::from(move |_| cb.emit(()))
        };
        let on_clear = {
            let cb = props.on_clear.clone();
            Callback::from(move |_| cb.emit(()))
        };

        html! {
            <div class="panel component-container route-panel">
                <h1>{"Plan a Safe Route"}</h1>
                {self.location_input(ctx, Field::Start, "Start location", &props.start_label)}
                {self.location_input(ctx, Field::End, "Destination", &props.end_label)}
                {self.suggestion_list(link)}
                <div class="route-actions">
                    <button class="btn-secondary" onclick={on_use_current}>
                        {"📍 Use current location"}
                    </button>
                    <button
                        class="btn-primary"
                        disabled={!props.can_calculate}
                        onclick={on_calculate}
                    >
                        {"Find Safe Routes"}
                    </button>
                    <button class="btn-secondary" onclick={on_clear}>{"Clear"}</button>
                </div>
                <p class="map-hint">{"Tip: tap the map to drop start and destination pins."}</p>
            </div>
        }
    }
}

impl RoutePanel {
    fn location_input(
        &self,
        ctx: &Context<Self>,
        field: Field,
        placeholder: &str,
        label: &Option<String>,
    ) -> Html {
        let editing = self.active_field == Some(field);
        let value = if editing {
            self.query.clone()
        } else {
            label.clone().unwrap_or_default()
        };

        let oninput = ctx.link().callback(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            RouteMsg::Input(field, input.value())
        });
        let onfocus = ctx.link().callback(move |_| RouteMsg::Focus(field));

        html! {
            <input
                class="location-input"
                type="text"
                placeholder={placeholder.to_owned()}
                {value}
                {oninput}
                {onfocus}
            />
        }
    }

    fn suggestion_list(&self, link: &Scope<Self>) -> Html {
        let Some(field) = self.active_field else {
            return html! {};
        };

        if self.show_quick {
            return html! {
                <div class="quick-locations">
                    { for QUICK_LOCATIONS.iter().copied().map(|(icon, name)| {
                        let onclick = link.callback(move |_| RouteMsg::QuickLocation(field, name));
                        html! {
                            <button class="quick-location-btn" {onclick}>
                                {format!("{icon} {name}")}
                            </button>
                        }
                    })}
                </div>
            };
        }

        if self.suggestions.is_empty() {
            return html! {};
        }

        html! {
            <div class="suggestions">
                { for self.suggestions.iter().map(|place| {
                    let onclick = {
                        let place = place.clone();
                        link.callback(move |_| RouteMsg::Select(field, place.clone()))
                    };
                    html! {
                        <div class="suggestion-item" {onclick}>
                            <span class="suggestion-icon">{"📍"}</span>
                            <div class="suggestion-text">
                                <div class="suggestion-main">{place.main_text()}</div>
                                <div class="suggestion-sub">{place.sub_text()}</div>
                            </div>
                        </div>
                    }
                })}
            </div>
        }
    }
}
