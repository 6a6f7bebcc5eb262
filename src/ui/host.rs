/// Chrome-backed implementation of the popup's host services
use crate::aggregator::TabHost;
use crate::article_data::{ActiveTab, ArticleDataResponse, ExtensionMessage};
use crate::settings::{SETTINGS_KEY, Settings};
use async_trait::async_trait;
use log::warn;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn injectContentScript(tab_id: i32, file: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendTabMessage(tab_id: i32, message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn capturePageHtml(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    fn addRuntimeListener(callback: &js_sys::Function);

    fn removeRuntimeListener(callback: &js_sys::Function);
}

pub struct ChromeHost {
    content_script_file: String,
}

impl ChromeHost {
    pub fn new(settings: &Settings) -> Self {
        ChromeHost {
            content_script_file: settings.content_script_file.clone(),
        }
    }
}

#[async_trait(?Send)]
impl TabHost for ChromeHost {
    async fn active_tab(&self) -> Result<Option<ActiveTab>, String> {
        let tab_js = getActiveTab()
            .await
            .map_err(|e| format!("Failed to query tabs: {:?}", e))?;

        if tab_js.is_null() || tab_js.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(tab_js).map_err(|e| format!("Failed to parse tab: {:?}", e))
    }

    async fn inject_extractor(&self, tab_id: i32) -> Result<(), String> {
        injectContentScript(tab_id, &self.content_script_file)
            .await
            .map_err(|e| format!("{:?}", e))
    }

    async fn request_articles(&self, tab_id: i32) -> Result<ArticleDataResponse, String> {
        let message = serde_wasm_bindgen::to_value(&ExtensionMessage::GetArticleData)
            .map_err(|e| format!("Failed to serialize: {:?}", e))?;

        let response = sendTabMessage(tab_id, message)
            .await
            .map_err(|e| format!("{:?}", e))?;

        if response.is_null() || response.is_undefined() {
            return Err("Content script sent no response".to_string());
        }

        serde_wasm_bindgen::from_value(response).map_err(|e| format!("Failed to parse articles: {:?}", e))
    }

    async fn page_html(&self, tab_id: i32) -> Result<String, String> {
        capturePageHtml(tab_id)
            .await
            .map_err(|e| format!("{:?}", e))?
            .as_string()
            .ok_or_else(|| "Page HTML was not a string".to_string())
    }

    async fn sleep(&self, duration: Duration) {
        yew::platform::time::sleep(duration).await;
    }
}

/// Open `url` in a new tab
pub async fn open_tab(url: &str) -> Result<(), String> {
    openTab(url).await.map_err(|e| format!("Failed to open tab: {:?}", e))
}

/// Settings from chrome.storage.local, or defaults
pub async fn load_settings() -> Settings {
    let stored = match getStorage(SETTINGS_KEY).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to get storage: {:?}", e);
            return Settings::default();
        }
    };

    if stored.is_null() || stored.is_undefined() {
        return Settings::default();
    }

    serde_wasm_bindgen::from_value(stored).unwrap_or_else(|e| {
        warn!("Failed to parse settings, using defaults: {:?}", e);
        Settings::default()
    })
}

/// A runtime message listener that is removed when dropped
pub struct RuntimeSubscription {
    callback: Closure<dyn FnMut(JsValue)>,
}

impl RuntimeSubscription {
    pub fn subscribe<F>(on_message: F) -> Self
    where
        F: Fn(ExtensionMessage) + 'static,
    {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |message: JsValue| {
            // Messages for other listeners do not parse; ignore them
            if let Ok(message) = serde_wasm_bindgen::from_value::<ExtensionMessage>(message) {
                on_message(message);
            }
        });

        addRuntimeListener(callback.as_ref().unchecked_ref());

        RuntimeSubscription { callback }
    }
}

impl Drop for RuntimeSubscription {
    fn drop(&mut self) {
        removeRuntimeListener(self.callback.as_ref().unchecked_ref());
    }
}
