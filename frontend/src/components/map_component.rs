use gloo_utils::document;
use leaflet::{LatLng, Map, MapOptions, Marker, MouseEvents, Polyline};
use route_guard_lib::location::Coordinate;
use route_guard_lib::route::RouteCandidate;
use route_guard_lib::travel::Travel;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement, Node};
use yew::prelude::*;

use super::map_util::{add_osm_tiles, emoji_marker, fit_view, latlng, route_polyline};
use crate::geolocation;

/// Initial view over the subcontinent until a location fix narrows it.
pub const DEFAULT_CENTER: (f64, f64) = (20.5937, 78.9629);
const DEFAULT_ZOOM: f64 = 5.0;
const LOCATED_ZOOM: f64 = 13.0;
const FOCUS_ZOOM: f64 = 15.0;

pub enum MapMsg {
    Located(Coordinate),
}

/// The planning map. Owns the Leaflet instance; everything it shows is
/// driven by props, so the rest of the app never touches the widget.
pub struct MapComponent {
    map: Map,
    container: HtmlElement,
    start_marker: Option<Marker>,
    end_marker: Option<Marker>,
    route_lines: Vec<Polyline>,
    travel_line: Option<Polyline>,
    user_marker: Option<Marker>,
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub start: Option<Coordinate>,
    pub end: Option<Coordinate>,
    /// Scored alternatives; each polyline is colored by its own grade.
    pub candidates: Vec<RouteCandidate>,
    /// The running trip: its route line plus the live position marker.
    pub travel: Option<Travel>,
    pub on_click: Callback<Coordinate>,
}

impl MapComponent {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }
}

impl Component for MapComponent {
    type Message = MapMsg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let container: Element = document().create_element("div").unwrap();
        let container: HtmlElement = container.dyn_into().unwrap();
        container.set_class_name("map");

        let map = Map::new_with_element(&container, &MapOptions::default());

        let callback = ctx.props().on_click.clone();
        map.on_mouse_click(Box::new(move |event| {
            let position = event.lat_lng();
            callback.emit(Coordinate::new(position.lat(), position.lng()));
        }));

        Self {
            map,
            container,
            start_marker: None,
            end_marker: None,
            route_lines: Vec::new(),
            travel_line: None,
            user_marker: None,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.map.set_view(
                &LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
                DEFAULT_ZOOM,
            );
            add_osm_tiles(&self.map);

            // Narrow the view to the user once, permission permitting.
            let link = ctx.link().clone();
            spawn_local(async move {
                if let Ok(fix) = geolocation::current_position().await {
                    link.send_message(MapMsg::Located(fix.coordinate()));
                }
            });
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            MapMsg::Located(center) => {
                self.map.set_view(&latlng(center), LOCATED_ZOOM);
                false
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        self.map.invalidate_size(false);
        let props = ctx.props();

        if props.start != old_props.start {
            if let Some(marker) = self.start_marker.take() {
                marker.remove();
            }
            if let Some(start) = props.start {
                let marker = emoji_marker(start, "🚶", "#667eea", "Start Location");
                marker.add_to(&self.map);
                self.start_marker = Some(marker);
            }
        }

        if props.end != old_props.end {
            if let Some(marker) = self.end_marker.take() {
                marker.remove();
            }
            if let Some(end) = props.end {
                let marker = emoji_marker(end, "🎯", "#10b981", "Destination");
                marker.add_to(&self.map);
                self.end_marker = Some(marker);
            }
        }

        if props.candidates != old_props.candidates {
            for line in self.route_lines.drain(..) {
                line.remove();
            }
            for candidate in &props.candidates {
                let line = route_polyline(
                    &candidate.leg.coordinates,
                    candidate.scored.grade.color(),
                    6.0,
                    0.7,
                    None,
                );
                line.add_to(&self.map);
                self.route_lines.push(line);
            }
            let all: Vec<Coordinate> = props
                .candidates
                .iter()
                .flat_map(|c| c.leg.coordinates.iter().copied())
                .collect();
            fit_view(&self.map, &all);
        }

        match (&props.travel, &old_props.travel) {
            (Some(travel), old) => {
                if old.as_ref().map(|t| &t.route) != Some(&travel.route) {
                    if let Some(line) = self.travel_line.take() {
                        line.remove();
                    }
                    let line = route_polyline(
                        &travel.route.coordinates,
                        travel.route.grade.color(),
                        6.0,
                        0.7,
                        None,
                    );
                    line.add_to(&self.map);
                    self.travel_line = Some(line);
                }
                if let Some(latest) = travel.latest() {
                    let position = latest.coordinate();
                    match &self.user_marker {
                        Some(marker) => marker.set_lat_lng(&latlng(position)),
                        None => {
                            let marker = emoji_marker(position, "📍", "#667eea", "You are here");
                            marker.add_to(&self.map);
                            self.user_marker = Some(marker);
                        }
                    }
                    self.map.set_view(&latlng(position), FOCUS_ZOOM);
                }
            }
            (None, Some(_)) => {
                // Trip over: drop the tracking-only layers.
                if let Some(line) = self.travel_line.take() {
                    line.remove();
                }
                if let Some(marker) = self.user_marker.take() {
                    marker.remove();
                }
            }
            (None, None) => {}
        }

        true
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <div class="map-container">
                {self.render_map()}
            </div>
        }
    }
}
