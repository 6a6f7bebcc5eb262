/// Popup UI: similar articles for the active tab

use crate::aggregator::{fetch_similar_articles, fetch_similar_stories, gather_page_context};
use crate::api::ApiClient;
use crate::article_data::{ArticleRecord, ExtensionMessage, SimilarityResult};
use crate::error::AggregatorError;
use crate::matching::fill_missing_images;
use crate::ui::components::{FeedSection, FeedState};
use crate::ui::host::{ChromeHost, RuntimeSubscription, load_settings, open_tab};
use log::{info, warn};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Everything the popup renders
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PopupModel {
    pub articles: FeedState,
    /// `None` while the story feed is disabled
    pub stories: Option<FeedState>,
}

pub enum PopupAction {
    StoriesEnabled,
    ArticlesLoaded(Result<Vec<SimilarityResult>, String>),
    StoriesLoaded(Result<Vec<SimilarityResult>, String>),
    /// Both feeds failed before any request was made
    Failed(String),
    /// Pushed by the content script after the page changed
    ContentUpdated(Vec<ArticleRecord>),
}

fn into_feed(result: Result<Vec<SimilarityResult>, String>) -> FeedState {
    match result {
        Ok(items) => FeedState::Ready(items),
        Err(message) => FeedState::Failed(message),
    }
}

fn refresh_feed(feed: &mut FeedState, local_articles: &[ArticleRecord]) {
    if let FeedState::Ready(items) = feed {
        fill_missing_images(items, local_articles);
    }
}

impl Reducible for PopupModel {
    type Action = PopupAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();

        match action {
            PopupAction::StoriesEnabled => {
                next.stories = Some(FeedState::Loading);
            }
            PopupAction::ArticlesLoaded(result) => {
                next.articles = into_feed(result);
            }
            PopupAction::StoriesLoaded(result) => {
                if next.stories.is_some() {
                    next.stories = Some(into_feed(result));
                }
            }
            PopupAction::Failed(message) => {
                next.articles = FeedState::Failed(message.clone());
                if next.stories.is_some() {
                    next.stories = Some(FeedState::Failed(message));
                }
            }
            PopupAction::ContentUpdated(articles) => {
                refresh_feed(&mut next.articles, &articles);
                if let Some(stories) = next.stories.as_mut() {
                    refresh_feed(stories, &articles);
                }
            }
        }

        Rc::new(next)
    }
}

/// Run the whole retrieval flow, reporting progress through `dispatcher`
async fn load_feeds(dispatcher: UseReducerDispatcher<PopupModel>) {
    let settings = load_settings().await;
    if settings.enable_stories {
        dispatcher.dispatch(PopupAction::StoriesEnabled);
    }

    let api = match ApiClient::new(&settings.api_base_url) {
        Ok(api) => api,
        Err(e) => {
            warn!("Bad API base URL {:?}: {}", settings.api_base_url, e);
            dispatcher.dispatch(PopupAction::Failed(AggregatorError::Fetch(e).to_string()));
            return;
        }
    };

    let host = ChromeHost::new(&settings);
    let context = match gather_page_context(&host, &settings).await {
        Ok(context) => context,
        Err(e) => {
            dispatcher.dispatch(PopupAction::Failed(e.to_string()));
            return;
        }
    };

    info!(
        "Looking up coverage similar to {} ({} local articles)",
        context.url,
        context.local_articles.len()
    );
    let articles = fetch_similar_articles(&api, &context).await;
    if let Err(e) = &articles {
        warn!("Similar articles unavailable: {:?}", e);
    }
    dispatcher.dispatch(PopupAction::ArticlesLoaded(articles.map_err(|e| e.to_string())));

    if settings.enable_stories {
        let stories = fetch_similar_stories(&api, &context).await;
        dispatcher.dispatch(PopupAction::StoriesLoaded(stories.map_err(|e| e.to_string())));
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let model = use_reducer(PopupModel::default);

    // Load everything on mount
    {
        let dispatcher = model.dispatcher();
        use_effect_with((), move |_| {
            spawn_local(load_feeds(dispatcher));
            || ()
        });
    }

    // Follow page updates while the popup is open
    {
        let dispatcher = model.dispatcher();
        use_effect_with((), move |_| {
            let subscription = RuntimeSubscription::subscribe(move |message| {
                if let ExtensionMessage::ContentUpdated { articles } = message {
                    dispatcher.dispatch(PopupAction::ContentUpdated(articles));
                }
            });
            move || drop(subscription)
        });
    }

    let on_open = Callback::from(|url: String| {
        spawn_local(async move {
            if let Err(e) = open_tab(&url).await {
                warn!("{}", e);
            }
        });
    });

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Similar News"}</h1>

            <FeedSection
                heading="Similar Articles"
                state={model.articles.clone()}
                on_open={on_open.clone()}
            />

            if let Some(stories) = model.stories.clone() {
                <FeedSection heading="Similar Stories" state={stories} on_open={on_open} />
            }
        </div>
    }
}
