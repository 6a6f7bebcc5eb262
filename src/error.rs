/// Error types for the popup's retrieval flow
use thiserror::Error;

/// Failures talking to the recommendation API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unreadable response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Everything that ends the popup flow with a message instead of a list.
///
/// The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum AggregatorError {
    #[error("Could not access current tab")]
    NoActiveTab,

    #[error("Cannot access this page")]
    InaccessiblePage,

    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("this page is not news page")]
    NotNewsPage,

    #[error("Failed to fetch similar articles")]
    Fetch(#[source] ApiError),

    #[error("No similar stories found")]
    NoStories,

    #[error("Failed to fetch similar stories")]
    StoriesFetch(#[source] ApiError),
}
