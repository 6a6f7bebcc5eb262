/// Popup-side retrieval: page context, local articles, API lookups
use crate::api::SimilarityApi;
use crate::article_data::{ActiveTab, ArticleDataResponse, ArticleRecord, SimilarityResult};
use crate::error::AggregatorError;
use crate::matching::attach_images;
use crate::settings::Settings;
use crate::title::{UNTITLED_ARTICLE, clean_title, extract_news_title};
use crate::validation::{is_restricted_page, is_valid_title, is_valid_url, process_news_url};
use async_trait::async_trait;
use futures::future::{Either, select};
use futures::pin_mut;
use log::{debug, info, warn};
use scraper::Html;
use std::future::Future;
use std::time::Duration;

/// Browser services the popup depends on
#[async_trait(?Send)]
pub trait TabHost {
    /// The active tab of the current window, if any
    async fn active_tab(&self) -> Result<Option<ActiveTab>, String>;

    /// Inject the content script. Fails harmlessly when it is already there.
    async fn inject_extractor(&self, tab_id: i32) -> Result<(), String>;

    /// Ask the content script for its articles
    async fn request_articles(&self, tab_id: i32) -> Result<ArticleDataResponse, String>;

    /// `document.documentElement.outerHTML` of the tab
    async fn page_html(&self, tab_id: i32) -> Result<String, String>;

    async fn sleep(&self, duration: Duration);
}

/// Everything known about the active page before the API is called
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub tab_id: i32,
    pub url: String,
    pub processed_url: String,
    pub title: String,
    pub local_articles: Vec<ArticleRecord>,
}

/// Resolve whichever future finishes first.
///
/// `None` means the timer won. The losing future is dropped; anything it
/// would have produced later is discarded.
pub async fn race_with_timeout<T, R, S>(response: R, timer: S) -> Option<T>
where
    R: Future<Output = T>,
    S: Future<Output = ()>,
{
    pin_mut!(response);
    pin_mut!(timer);

    match select(response, timer).await {
        Either::Left((value, _timer)) => Some(value),
        Either::Right(((), _response)) => None,
    }
}

/// Steps 1-3 of the popup flow: validate the tab, collect local articles,
/// work out the page title.
pub async fn gather_page_context<H: TabHost + ?Sized>(
    host: &H,
    settings: &Settings,
) -> Result<PageContext, AggregatorError> {
    let tab = match host.active_tab().await {
        Ok(Some(tab)) => tab,
        Ok(None) => return Err(AggregatorError::NoActiveTab),
        Err(e) => {
            warn!("Failed to query active tab: {}", e);
            return Err(AggregatorError::NoActiveTab);
        }
    };

    let url = tab
        .url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .ok_or(AggregatorError::InaccessiblePage)?;

    if is_restricted_page(&url) {
        return Err(AggregatorError::InaccessiblePage);
    }
    if !is_valid_url(&url) {
        return Err(AggregatorError::InvalidUrl);
    }

    if let Err(e) = host.inject_extractor(tab.id).await {
        debug!("Content script already injected or injection failed: {}", e);
    }

    let local_articles = request_local_articles(host, tab.id, settings.extractor_timeout()).await;
    let title = resolve_page_title(host, &tab).await;

    Ok(PageContext {
        tab_id: tab.id,
        processed_url: process_news_url(&url),
        url,
        title,
        local_articles,
    })
}

/// Articles from the content script, or none if it fails or is too slow
pub async fn request_local_articles<H: TabHost + ?Sized>(
    host: &H,
    tab_id: i32,
    timeout: Duration,
) -> Vec<ArticleRecord> {
    match race_with_timeout(host.request_articles(tab_id), host.sleep(timeout)).await {
        Some(Ok(response)) => response.articles,
        Some(Err(e)) => {
            warn!("Message error: {}", e);
            Vec::new()
        }
        None => {
            info!("Content script did not answer within {:?}, continuing without images", timeout);
            Vec::new()
        }
    }
}

async fn resolve_page_title<H: TabHost + ?Sized>(host: &H, tab: &ActiveTab) -> String {
    let title = match host.page_html(tab.id).await {
        Ok(html) => extract_news_title(&Html::parse_document(&html)),
        Err(e) => {
            warn!("Could not read page HTML, using tab title: {}", e);
            tab.title
                .as_deref()
                .map(clean_title)
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| UNTITLED_ARTICLE.to_string())
        }
    };

    if is_valid_title(&title) {
        title
    } else {
        warn!("Invalid title format: {:?}", title);
        UNTITLED_ARTICLE.to_string()
    }
}

/// Query `similarArticles` and decorate the results with local images
pub async fn fetch_similar_articles<A: SimilarityApi + ?Sized>(
    api: &A,
    context: &PageContext,
) -> Result<Vec<SimilarityResult>, AggregatorError> {
    let mut items = api
        .similar_articles(&context.processed_url, &context.title)
        .await
        .map_err(AggregatorError::Fetch)?;

    if items.is_empty() {
        return Err(AggregatorError::NotNewsPage);
    }

    attach_images(&mut items, &context.local_articles);
    Ok(items)
}

/// Query the legacy `similarStory` endpoint, best score first
pub async fn fetch_similar_stories<A: SimilarityApi + ?Sized>(
    api: &A,
    context: &PageContext,
) -> Result<Vec<SimilarityResult>, AggregatorError> {
    let mut stories = api
        .similar_stories(&context.processed_url)
        .await
        .map_err(AggregatorError::StoriesFetch)?;

    if stories.is_empty() {
        return Err(AggregatorError::NoStories);
    }

    stories.sort_by(|a, b| {
        let a = a.score.unwrap_or(f64::NEG_INFINITY);
        let b = b.score.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    attach_images(&mut stories, &context.local_articles);
    Ok(stories)
}
