use route_guard_lib::route::RouteCandidate;
use yew::prelude::*;

#[derive(PartialEq, Properties)]
pub struct Props {
    pub candidates: Vec<RouteCandidate>,
    pub recommended: usize,
    pub ai_explanation: Option<String>,
    pub on_choose: Callback<usize>,
}

/// One card per scored alternative; the recommended one is starred.
#[function_component]
pub fn ResultsPanel(props: &Props) -> Html {
    if props.candidates.is_empty() {
        return html! {
            <div class="panel component-container results-panel">
                <h1>{"Route Results"}</h1>
                <div class="routes-status">{"No routes calculated yet"}</div>
            </div>
        };
    }

    let count = props.candidates.len();
    let status = format!(
        "{count} route{} found - Select one to start navigation",
        if count > 1 { "s" } else { "" }
    );

    html! {
        <div class="panel component-container results-panel">
            <h1>{"Route Results"}</h1>
            <div class="routes-status has-routes">{status}</div>
            if let Some(explanation) = &props.ai_explanation {
                <div class="ai-explanation">
                    <h2>{"🤖 Route Analysis"}</h2>
                    <p>{explanation.clone()}</p>
                </div>
            }
            { for props.candidates.iter().enumerate().map(|(index, candidate)| {
                route_card(index, candidate, index == props.recommended, &props.on_choose)
            })}
        </div>
    }
}

fn route_card(
    index: usize,
    candidate: &RouteCandidate,
    recommended: bool,
    on_choose: &Callback<usize>,
) -> Html {
    let scored = &candidate.scored;
    let onclick = {
        let on_choose = on_choose.clone();
        Callback::from(move |_| on_choose.emit(index))
    };

    let title = if recommended {
        format!("Route {} ⭐ Recommended", index + 1)
    } else {
        format!("Route {}", index + 1)
    };

    html! {
        <div class={classes!("route-card", recommended.then_some("recommended"))}>
            <div class="route-header">
                <span class="route-title">{title}</span>
                <span class={classes!("route-badge", scored.grade.badge_class())}>
                    {format!("Grade {}", scored.grade.letter())}
                </span>
            </div>
            <div class={format!("route-score score-{}", scored.grade.letter().to_lowercase())}>
                {format!("{}/100", scored.score)}
            </div>
            <div class="route-details">
                <div class="detail-item">
                    <div>{"Distance"}</div>
                    <div class="detail-value">{format!("{:.2} km", scored.distance_km)}</div>
                </div>
                <div class="detail-item">
                    <div>{"Duration"}</div>
                    <div class="detail-value">{format!("{} min", scored.duration_minutes.round() as i64)}</div>
                </div>
                <div class="detail-item">
                    <div>{"Crime Incidents"}</div>
                    <div class="detail-value">{scored.crime_count}</div>
                </div>
                <div class="detail-item">
                    <div>{"Safety Zones"}</div>
                    <div class="detail-value">{scored.safety_zone_count}</div>
                </div>
            </div>
            if !scored.details.is_empty() {
                <div class="route-notes">{scored.details.clone()}</div>
            }
            <button class="btn-primary choose-route-btn" {onclick}>
                {"Choose This Route"}
            </button>
        </div>
    }
}
