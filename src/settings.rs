/// Extension settings stored in chrome.storage.local

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Storage key for the settings object
pub const SETTINGS_KEY: &str = "similar_news_settings";

const DEFAULT_API_BASE_URL: &str = match option_env!("SIMILAR_NEWS_API_URL") {
    Some(url) => url,
    None => "http://localhost:3000",
};

/// Root settings structure. Every field falls back to its default when
/// missing from storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_base_url: String,
    pub extractor_timeout_ms: u32,
    /// Loader injected into the page, relative to the extension root
    pub content_script_file: String,
    pub enable_stories: bool,
}

impl Settings {
    pub fn new() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            extractor_timeout_ms: 5000,
            content_script_file: "content_script.js".to_string(),
            enable_stories: false,
        }
    }

    pub fn extractor_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.extractor_timeout_ms))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::new();

        assert_eq!(settings.extractor_timeout(), Duration::from_secs(5));
        assert!(!settings.enable_stories);
        assert!(settings.api_base_url.starts_with("http"));
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"apiBaseUrl":"https://api.example.com","enableStories":true}"#).unwrap();

        assert_eq!(settings.api_base_url, "https://api.example.com");
        assert!(settings.enable_stories);
        assert_eq!(settings.extractor_timeout_ms, 5000);
        assert_eq!(settings.content_script_file, "content_script.js");
    }

    #[test]
    fn test_default_content_script_boots_wasm() {
        let loader = include_str!("../content_script.js");

        assert_eq!(Settings::new().content_script_file, "content_script.js");
        assert!(loader.contains("start_content_script()"));
    }

    #[test]
    fn test_serialization() {
        let settings = Settings::new();

        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, settings);
    }
}
