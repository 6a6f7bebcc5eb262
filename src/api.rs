/// Client for the remote recommendation API
use crate::article_data::{SimilarArticlesResponse, SimilarStoriesResponse, SimilarityResult};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

/// The recommendation service as seen by the popup
#[async_trait(?Send)]
pub trait SimilarityApi {
    /// `GET /api/similarArticles?url=&title=`
    async fn similar_articles(&self, url: &str, title: &str) -> Result<Vec<SimilarityResult>, ApiError>;

    /// `GET /api/similarStory?url=`
    async fn similar_stories(&self, url: &str) -> Result<Vec<SimilarityResult>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // Reject a bad base URL up front rather than on every request
        Url::parse(base_url)?;

        Ok(ApiClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}/{}", self.base_url, path))?)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Url,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        log::debug!("GET {}", endpoint);

        let response = self
            .client
            .get(endpoint)
            .query(query)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        decode_body(status, &body)
    }
}

/// Decode a response body whatever its status. The service may answer an
/// error status with a well-formed body, e.g. a 404 with no similar items.
fn decode_body<T: serde::de::DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        log::warn!("Recommendation API answered {}", status);
    }

    Ok(serde_json::from_str(body)?)
}

#[async_trait(?Send)]
impl SimilarityApi for ApiClient {
    async fn similar_articles(&self, url: &str, title: &str) -> Result<Vec<SimilarityResult>, ApiError> {
        let endpoint = self.endpoint("api/similarArticles")?;
        let body: SimilarArticlesResponse = self.get_json(endpoint, &[("url", url), ("title", title)]).await?;
        Ok(body.similar_items)
    }

    async fn similar_stories(&self, url: &str) -> Result<Vec<SimilarityResult>, ApiError> {
        let endpoint = self.endpoint("api/similarStory")?;
        let body: SimilarStoriesResponse = self.get_json(endpoint, &[("url", url)]).await?;
        Ok(body.similar_stories)
    }
}
