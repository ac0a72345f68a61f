use route_guard_lib::news::NewsItem;
use yew::prelude::*;

#[derive(PartialEq, Properties)]
pub struct Props {
    pub news: Vec<NewsItem>,
    pub open: bool,
    pub on_toggle: Callback<()>,
}

/// Safety news feed with an unread badge for high-priority items.
#[function_component]
pub fn NewsPanel(props: &Props) -> Html {
    let on_toggle = {
        let cb = props.on_toggle.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let high_priority = props
        .news
        .iter()
        .filter(|item| item.priority.is_high())
        .count();

    html! {
        <>
            <button class="news-toggle" onclick={on_toggle}>
                {"📰"}
                if high_priority > 0 && !props.open {
                    <span class="news-badge">{high_priority}</span>
                }
            </button>
            if props.open {
                <div class="news-panel">
                    <h2>{"Safety Updates"}</h2>
                    if props.news.is_empty() {
                        <p class="news-empty">{"No active safety updates."}</p>
                    } else {
                        { for props.news.iter().map(news_entry) }
                    }
                </div>
            }
        </>
    }
}

fn news_entry(item: &NewsItem) -> Html {
    let accent = item.priority.color();
    html! {
        <div class="news-item" style={format!("border-left: 4px solid {accent};")}>
            <div class="news-item-meta">
                <span class="news-priority" style={format!("color: {accent};")}>
                    {format!("{:?}", item.priority).to_uppercase()}
                </span>
                <span class="news-date">{item.date.clone()}</span>
            </div>
            <h4>{item.title.clone()}</h4>
            <p>{item.content.clone()}</p>
            if let Some(url) = &item.image_url {
                <img class="news-image" src={url.clone()} />
            }
            if !item.author.is_empty() {
                <div class="news-author">{format!("Posted by: {}", item.author)}</div>
            }
        </div>
    }
}
