use gloo_utils::document;
use leaflet::{Circle, CircleOptions, LatLng, Map, MapOptions, Marker, Polyline};
use route_guard_lib::geo;
use route_guard_lib::location::Coordinate;
use route_guard_lib::travel::Travel;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement, Node};
use yew::prelude::*;

use super::map_util::{add_voyager_tiles, emoji_marker, fit_view, latlng, pulse_marker, route_polyline};
use crate::geocode;

const DEFAULT_CENTER: (f64, f64) = (20.5937, 78.9629);
const DEFAULT_ZOOM: f64 = 13.0;
const FOLLOW_ZOOM: f64 = 16.0;

/// The accuracy circle is clamped so a bad fix does not flood the view.
const MAX_ACCURACY_RADIUS_M: f64 = 100.0;

pub enum TrackingMsg {
    Street(Option<String>),
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub travel: Option<Travel>,
    pub on_stop: Callback<()>,
}

/// Navigation view for the active trip: a mini-map replaying the route
/// with the live position, plus distance/ETA/speed readouts. Mounting the
/// panel builds the map from scratch, so reopening it always resumes from
/// the current session state.
pub struct TrackingPanel {
    map: Map,
    container: HtmlElement,
    user_marker: Option<Marker>,
    accuracy_circle: Option<Circle>,
    trail_line: Option<Polyline>,
    street: Option<String>,
    last_fix: Option<Coordinate>,
}

impl TrackingPanel {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }

    /// Replays the chosen route on the mini-map: dashed line in the grade
    /// color, flag and target markers, view fitted to the geometry.
    fn draw_route(&self, travel: &Travel) {
        let route = &travel.route;
        let line = route_polyline(
            &route.coordinates,
            route.grade.color(),
            6.0,
            0.8,
            Some("10, 5"),
        );
        line.add_to(&self.map);
        emoji_marker(route.start, "🚩", "#667eea", "Start").add_to(&self.map);
        emoji_marker(route.end, "🎯", "#10b981", "Destination").add_to(&self.map);
        fit_view(&self.map, &route.coordinates);
    }

    fn sync_position(&mut self, ctx: &Context<Self>) {
        let Some(travel) = &ctx.props().travel else {
            return;
        };
        let Some(latest) = travel.latest() else {
            return;
        };
        let position = latest.coordinate();

        if let Some(marker) = self.user_marker.take() {
            marker.remove();
        }
        let marker = pulse_marker(position);
        marker.add_to(&self.map);
        self.user_marker = Some(marker);

        if let Some(circle) = self.accuracy_circle.take() {
            circle.remove();
        }
        let options = CircleOptions::new();
        options.set_radius(latest.accuracy.min(MAX_ACCURACY_RADIUS_M));
        options.set_color("#3b82f6".into());
        options.set_fill_color("#3b82f6".into());
        options.set_fill_opacity(0.1);
        options.set_weight(2.0);
        options.set_opacity(0.6);
        let circle = Circle::new_with_options(&latlng(position), &options);
        circle.add_to(&self.map);
        self.accuracy_circle = Some(circle);

        if let Some(line) = self.trail_line.take() {
            line.remove();
        }
        let trail: Vec<Coordinate> = travel.trail().iter().map(|s| s.coordinate()).collect();
        if trail.len() > 1 {
            let line = route_polyline(&trail, "#3b82f6", 3.0, 0.7, Some("5, 5"));
            line.add_to(&self.map);
            self.trail_line = Some(line);
        }

        self.map
            .set_view(&latlng(position), self.map.get_zoom().max(FOLLOW_ZOOM));

        if self.last_fix != Some(position) {
            self.last_fix = Some(position);
            let link = ctx.link().clone();
            spawn_local(async move {
                link.send_message(TrackingMsg::Street(geocode::reverse(position).await));
            });
        }
    }
}

impl Component for TrackingPanel {
    type Message = TrackingMsg;
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        let container: Element = document().create_element("div").unwrap();
        let container: HtmlElement = container.dyn_into().unwrap();
        container.set_class_name("tracking-map");

        let map = Map::new_with_element(&container, &MapOptions::default());

        Self {
            map,
            container,
            user_marker: None,
            accuracy_circle: None,
            trail_line: None,
            street: None,
            last_fix: None,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.map.set_view(
                &LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1),
                DEFAULT_ZOOM,
            );
            add_voyager_tiles(&self.map);
            if let Some(travel) = &ctx.props().travel {
                self.draw_route(travel);
            }
            self.sync_position(ctx);
        }
        self.map.invalidate_size(false);
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            TrackingMsg::Street(street) => {
                self.street = street;
                true
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, _old_props: &Self::Properties) -> bool {
        self.sync_position(ctx);
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let on_stop = {
            let on_stop = props.on_stop.clone();
            Callback::from(move |_| on_stop.emit(()))
        };

        html! {
            <div class="panel component-container tracking-panel">
                <h1>{"Live Tracking"}</h1>
                {self.render_map()}
                if let Some(travel) = &props.travel {
                    <>
                        {self.stats(travel)}
                        <button class="btn-danger stop-tracking-btn" onclick={on_stop}>
                            {"🛑 End Trip"}
                        </button>
                    </>
                } else {
                    <div class="tracking-idle">
                        {"No active trip. Choose a route to start navigation."}
                    </div>
                }
            </div>
        }
    }
}

impl TrackingPanel {
    fn stats(&self, travel: &Travel) -> Html {
        let latest = travel.latest();
        let remaining = latest.map(|s| travel.distance_to_destination_km(s.coordinate()));
        let eta = remaining.map(|km| geo::format_eta(geo::walking_eta_minutes(km)));
        let speed = latest.map(|s| s.speed_kmh()).unwrap_or(0.0);

        let street = self
            .street
            .as_deref()
            .and_then(|name| name.split(',').next())
            .unwrap_or("Locating…");

        html! {
            <div class="tracking-info">
                <div class="tracking-stat">
                    <span class="stat-label">{"Safety score"}</span>
                    <span class="stat-value">{format!("{}/100", travel.route.score)}</span>
                </div>
                <div class="tracking-stat">
                    <span class="stat-label">{"Current location"}</span>
                    <span class="stat-value">{street}</span>
                </div>
                <div class="tracking-stat">
                    <span class="stat-label">{"Distance remaining"}</span>
                    <span class="stat-value">
                        {remaining.map(|km| format!("{km:.2} km")).unwrap_or_else(|| "--".into())}
                    </span>
                </div>
                <div class="tracking-stat">
                    <span class="stat-label">{"ETA"}</span>
                    <span class="stat-value">{eta.unwrap_or_else(|| "--".into())}</span>
                </div>
                <div class="tracking-stat">
                    <span class="stat-label">{"Speed"}</span>
                    <span class="stat-value">{format!("{speed:.1} km/h")}</span>
                </div>
                <div class="tracking-stat">
                    <span class="stat-label">{"Traveled"}</span>
                    <span class="stat-value">{format!("{:.2} km", travel.total_distance_km())}</span>
                </div>
            </div>
        }
    }
}
