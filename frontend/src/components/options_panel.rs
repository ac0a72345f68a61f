use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::{ToastKind, ToastMsg};

#[derive(PartialEq, Properties)]
pub struct Props {
    pub busy: bool,
    pub on_generate: Callback<()>,
    pub on_csv: Callback<web_sys::File>,
    pub on_toast: Callback<ToastMsg>,
}

/// Crime-data management: sample data seeding and CSV import.
#[function_component]
pub fn OptionsPanel(props: &Props) -> Html {
    let on_generate = {
        let cb = props.on_generate.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let on_file_change = {
        let on_csv = props.on_csv.clone();
        let on_toast = props.on_toast.clone();
        Callback::from(move |event: Event| {
            let input: HtmlInputElement = event.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            if file.name().ends_with(".csv") {
                on_csv.emit(file);
            } else {
                on_toast.emit(("Please upload a CSV file".into(), ToastKind::Error));
            }
            input.set_value("");
        })
    };

    html! {
        <div class="panel component-container options-panel">
            <h1>{"Options"}</h1>
            <h2>{"Crime data"}</h2>
            <button class="btn-secondary" disabled={props.busy} onclick={on_generate}>
                {"Generate sample data"}
            </button>
            <p class="option-hint">
                {"Seeds 100 sample crime points within 5 km of your location."}
            </p>
            <label class="btn-secondary csv-upload-label">
                {"Import crime CSV"}
                <input
                    type="file"
                    accept=".csv"
                    style="display: none;"
                    disabled={props.busy}
                    onchange={on_file_change}
                />
            </label>
            <p class="option-hint">
                {"Expects date, latitude, longitude and crime type columns."}
            </p>
        </div>
    }
}
