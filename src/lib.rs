/// Similar News - Chrome Extension that finds related coverage for the open article
/// Built with Rust + WASM + Yew

mod aggregator;
mod api;
mod article_data;
mod content_script;
mod error;
pub mod extractor;
mod matching;
mod settings;
mod title;
mod validation;
pub mod watcher;
pub mod ui;

pub use article_data::{ArticleRecord, SimilarityResult};

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Expose the extractor to JavaScript for ad-hoc page snapshots
#[wasm_bindgen]
pub fn extract_articles(html: &str, page_url: &str) -> Result<JsValue, JsValue> {
    let articles = extractor::extract_articles_from_html(html, page_url)
        .map_err(|e| JsValue::from_str(&format!("Invalid page URL: {}", e)))?;

    serde_wasm_bindgen::to_value(&articles).map_err(JsValue::from)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start watching the page from the injected content script
#[wasm_bindgen]
pub fn start_content_script() -> Result<(), JsValue> {
    content_script::install()
}

// Detach the content script's listener and observer
#[wasm_bindgen]
pub fn stop_content_script() {
    content_script::uninstall();
}
