use route_guard_lib::panel::Panel;
use yew::prelude::*;

#[derive(PartialEq, Properties)]
pub struct Props {
    /// Exactly one nav item renders active.
    pub highlight: Panel,
    pub on_select: Callback<Panel>,
}

#[function_component]
pub fn NavBar(props: &Props) -> Html {
    html! {
        <nav class="mobile-nav">
            { for Panel::ALL.iter().copied().map(|panel| {
                let onclick = {
                    let on_select = props.on_select.clone();
                    Callback::from(move |_| on_select.emit(panel))
                };
                html! {
                    <button
                        class={classes!("mobile-nav-item", (panel == props.highlight).then_some("active"))}
                        {onclick}
                    >
                        <span class="nav-icon">{panel.icon()}</span>
                        <span>{panel.label()}</span>
                    </button>
                }
            })}
        </nav>
    }
}
