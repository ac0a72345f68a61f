//! Small Leaflet helpers shared by the planning map and the tracking map.

use leaflet::{
    DivIcon, DivIconOptions, LatLng, LatLngBounds, Map, Marker, MarkerOptions, Point, Polyline,
    PolylineOptions, Popup, PopupOptions, TileLayer, TileLayerOptions,
};
use route_guard_lib::location::Coordinate;
use web_sys::js_sys::Array;

pub fn latlng(c: Coordinate) -> LatLng {
    LatLng::new(c.lat, c.lng)
}

pub fn add_osm_tiles(map: &Map) {
    let options = TileLayerOptions::new();
    options.set_attribution("© OpenStreetMap contributors".to_string());
    options.set_update_when_idle(true);
    TileLayer::new_options("https://tile.openstreetmap.org/{z}/{x}/{y}.png", &options).add_to(map);
}

pub fn add_voyager_tiles(map: &Map) {
    let options = TileLayerOptions::new();
    options.set_attribution("© OpenStreetMap contributors, © CartoDB".to_string());
    options.set_update_when_idle(true);
    TileLayer::new_options(
        "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png",
        &options,
    )
    .add_to(map);
}

/// Round emoji marker in the style the rest of the UI uses, with a bound
/// popup.
pub fn emoji_marker(at: Coordinate, emoji: &str, color: &str, popup_text: &str) -> Marker {
    let icon_options = DivIconOptions::new();
    icon_options.set_html(format!(
        r#"<div style="background: {color}; width: 40px; height: 40px; border-radius: 50%; display: flex; align-items: center; justify-content: center; font-size: 20px; box-shadow: 0 4px 6px rgba(0,0,0,0.3);">{emoji}</div>"#
    ));
    icon_options.set_class_name("custom-marker".to_string());
    icon_options.set_icon_size(Point::new(40.0, 40.0));
    icon_options.set_icon_anchor(Point::new(20.0, 20.0));

    let options = MarkerOptions::new();
    options.set_icon(DivIcon::new(&icon_options).into());

    let marker = Marker::new_with_options(&latlng(at), &options);
    let popup = Popup::new(&PopupOptions::default(), None);
    popup.set_content(&format!("<b>{popup_text}</b>").into());
    marker.bind_popup(&popup);
    marker
}

/// Pulsing live-position marker for the tracking map.
pub fn pulse_marker(at: Coordinate) -> Marker {
    let icon_options = DivIconOptions::new();
    icon_options.set_html(
        r#"<div class="tracking-pulse"><div class="tracking-dot"></div><div class="tracking-ring"></div></div>"#
            .to_string(),
    );
    icon_options.set_class_name("live-tracking-marker".to_string());
    icon_options.set_icon_size(Point::new(40.0, 40.0));
    icon_options.set_icon_anchor(Point::new(20.0, 20.0));

    let options = MarkerOptions::new();
    options.set_icon(DivIcon::new(&icon_options).into());
    Marker::new_with_options(&latlng(at), &options)
}

pub fn route_polyline(
    coordinates: &[Coordinate],
    color: &str,
    weight: f64,
    opacity: f64,
    dash: Option<&str>,
) -> Polyline {
    let options = PolylineOptions::new();
    options.set_color(color.into());
    options.set_weight(weight);
    options.set_opacity(opacity);
    options.set_smooth_factor(1.5);
    if let Some(dash) = dash {
        options.set_dash_array(dash.into());
    }
    let points = coordinates.iter().map(|c| latlng(*c));
    Polyline::new_with_options(&Array::from_iter(points), &options)
}

/// Fits the view to the given coordinates.
pub fn fit_view(map: &Map, coordinates: &[Coordinate]) {
    let mut iter = coordinates.iter();
    let Some(first) = iter.next() else {
        return;
    };
    let (mut south, mut west, mut north, mut east) = (first.lat, first.lng, first.lat, first.lng);
    for c in iter {
        south = south.min(c.lat);
        west = west.min(c.lng);
        north = north.max(c.lat);
        east = east.max(c.lng);
    }
    let bounds = LatLngBounds::new(&LatLng::new(south, west), &LatLng::new(north, east));
    map.fit_bounds(&bounds);
}
