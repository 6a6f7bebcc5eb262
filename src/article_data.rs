/// Data structures shared by the content script and the popup
use serde::{Deserialize, Serialize};

/// An article scraped from the visited page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ArticleRecord {
    pub fn new(title: String, url: String, image_url: Option<String>) -> ArticleRecord {
        ArticleRecord {
            title,
            url,
            image_url,
        }
    }
}

/// An item returned by the recommendation API.
///
/// `score` is only sent by the story endpoint. `image_url` is never sent by
/// the API; it is attached locally when a scraped article matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl SimilarityResult {
    /// Score as a rounded percentage, clamped to 0..=100
    pub fn relevance_percent(&self) -> Option<u8> {
        self.score
            .filter(|score| score.is_finite())
            .map(|score| (score * 100.0).round().clamp(0.0, 100.0) as u8)
    }
}

/// Body of `/api/similarArticles`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarArticlesResponse {
    #[serde(default)]
    pub similar_items: Vec<SimilarityResult>,
}

/// Body of `/api/similarStory`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarStoriesResponse {
    #[serde(default)]
    pub similar_stories: Vec<SimilarityResult>,
}

/// Messages exchanged between the popup and the content script
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionMessage {
    GetArticleData,
    ContentUpdated { articles: Vec<ArticleRecord> },
}

/// Reply to `getArticleData`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleDataResponse {
    #[serde(default)]
    pub articles: Vec<ArticleRecord>,
}

/// The active browser tab as reported by `chrome.tabs.query`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActiveTab {
    pub id: i32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
