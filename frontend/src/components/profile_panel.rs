use route_guard_lib::user::UserInfo;
use yew::prelude::*;

#[derive(PartialEq, Properties)]
pub struct Props {
    pub user: Option<UserInfo>,
    pub on_logout: Callback<()>,
}

#[function_component]
pub fn ProfilePanel(props: &Props) -> Html {
    let on_logout = {
        let cb = props.on_logout.clone();
        Callback::from(move |_| cb.emit(()))
    };

    html! {
        <div class="panel component-container profile-panel">
            <h1>{"Profile"}</h1>
            {match &props.user {
                Some(user) if user.authenticated => html! {
                    <>
                        <div class="profile-row">
                            <span class="profile-avatar">{"👤"}</span>
                            <span class="profile-email">
                                {user.email.clone().unwrap_or_else(|| "Signed in".into())}
                            </span>
                        </div>
                        <button class="btn-secondary" onclick={on_logout}>{"Log out"}</button>
                    </>
                },
                Some(_) => html! {
                    <p>{"Not signed in. Log in to keep a history of your trips."}</p>
                },
                None => html! { <p>{"Loading account…"}</p> },
            }}
        </div>
    }
}
