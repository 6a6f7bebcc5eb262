/// Reusable UI components

use crate::article_data::SimilarityResult;
use crate::validation::display_title;
use patternfly_yew::prelude::*;
use yew::prelude::*;

/// Placeholder text for results without a usable image
pub const NO_IMAGE: &str = "No Image";

/// Loading / loaded / failed state of one result list
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FeedState {
    #[default]
    Loading,
    Ready(Vec<SimilarityResult>),
    Failed(String),
}

#[derive(Properties, PartialEq)]
pub struct ArticleImageProps {
    pub src: Option<String>,
    pub alt: String,
}

#[function_component(ArticleImage)]
pub fn article_image(props: &ArticleImageProps) -> Html {
    let failed = use_state(|| false);

    // A new image URL gets a fresh chance to load
    {
        let failed = failed.clone();
        use_effect_with(props.src.clone(), move |_| {
            failed.set(false);
            || ()
        });
    }

    let onerror = {
        let failed = failed.clone();
        Callback::from(move |_: Event| failed.set(true))
    };

    match props.src.as_ref().filter(|_| !*failed) {
        Some(src) => html! {
            <div class="article-image">
                <img
                    class="article-image"
                    src={src.clone()}
                    alt={props.alt.clone()}
                    loading="lazy"
                    {onerror}
                />
            </div>
        },
        None => html! {
            <div class="article-image no-image">{NO_IMAGE}</div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct ArticleItemProps {
    pub item: SimilarityResult,
    pub on_open: Callback<String>,
}

#[function_component(ArticleItem)]
pub fn article_item(props: &ArticleItemProps) -> Html {
    let item = &props.item;
    let title = display_title(&item.title).to_string();

    let onclick = {
        let url = item.url.clone();
        props.on_open.reform(move |_: MouseEvent| url.clone())
    };

    html! {
        <li class="article-item" {onclick}>
            <ArticleImage src={item.image_url.clone()} alt={title.clone()} />
            <div class="article-content">
                <div class="article-title">{title}</div>
                if let Some(percent) = item.relevance_percent() {
                    <small class="article-score">{format!("Relevance: {}%", percent)}</small>
                }
            </div>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct FeedSectionProps {
    pub heading: AttrValue,
    pub state: FeedState,
    pub on_open: Callback<String>,
}

#[function_component(FeedSection)]
pub fn feed_section(props: &FeedSectionProps) -> Html {
    html! {
        <section class="feed-section">
            <h2 class="feed-heading">{props.heading.clone()}</h2>
            {match &props.state {
                FeedState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                FeedState::Ready(items) => html! {
                    <ul class="articles-list">
                        {for items.iter().map(|item| html! {
                            <ArticleItem
                                item={item.clone()}
                                on_open={props.on_open.clone()}
                            />
                        })}
                    </ul>
                },
                FeedState::Failed(message) => html! {
                    <div class="error">
                        <Alert r#type={AlertType::Danger} title={message.clone()} inline={true}>
                        </Alert>
                    </div>
                },
            }}
        </section>
    }
}
