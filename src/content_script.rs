/// Content script: answers article requests and pushes page updates
use crate::article_data::{ArticleDataResponse, ArticleRecord, ExtensionMessage};
use crate::extractor::extract_article_data;
use crate::watcher::ContentWatcher;
use log::{info, warn};
use scraper::Html;
use std::cell::RefCell;
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/content.js")]
extern "C" {
    fn addMessageListener(handler: &js_sys::Function);

    fn removeMessageListener(handler: &js_sys::Function);

    fn sendRuntimeMessage(message: JsValue);
}

thread_local! {
    static ACTIVE: RefCell<Option<ContentScript>> = const { RefCell::new(None) };
}

/// Start the content script once per page. Further calls are no-ops, so the
/// popup may inject it as often as it likes.
pub fn install() -> Result<(), JsValue> {
    ACTIVE.with(|active| {
        let mut active = active.borrow_mut();
        if active.is_none() {
            *active = Some(ContentScript::start()?);
            info!("Content script started");
        }
        Ok(())
    })
}

/// Remove the message listener and disconnect the observer
pub fn uninstall() {
    ACTIVE.with(|active| active.borrow_mut().take());
}

struct ContentScript {
    _watcher: ContentWatcher,
    listener: Closure<dyn FnMut(JsValue) -> JsValue>,
}

impl ContentScript {
    fn start() -> Result<Self, JsValue> {
        let watcher = ContentWatcher::new(push_content_update)?;
        watcher.start()?;

        let listener = Closure::<dyn FnMut(JsValue) -> JsValue>::new(handle_message);
        addMessageListener(listener.as_ref().unchecked_ref());

        Ok(ContentScript {
            _watcher: watcher,
            listener,
        })
    }
}

impl Drop for ContentScript {
    fn drop(&mut self) {
        removeMessageListener(self.listener.as_ref().unchecked_ref());
    }
}

/// Runtime message handler. Always returns a response so the sender is never
/// left waiting.
fn handle_message(message: JsValue) -> JsValue {
    let message = serde_wasm_bindgen::from_value::<ExtensionMessage>(message).ok();
    let response = respond_to(message.as_ref(), scan_document);

    serde_wasm_bindgen::to_value(&response).unwrap_or_else(|e| {
        warn!("Failed to serialize article data: {}", e);
        JsValue::UNDEFINED
    })
}

/// Reply for one runtime message. Only `getArticleData` scans the page;
/// anything else, including messages that failed to decode, gets an empty list.
fn respond_to(message: Option<&ExtensionMessage>, scan: impl FnOnce() -> Vec<ArticleRecord>) -> ArticleDataResponse {
    match message {
        Some(ExtensionMessage::GetArticleData) => ArticleDataResponse { articles: scan() },
        Some(ExtensionMessage::ContentUpdated { .. }) | None => ArticleDataResponse::default(),
    }
}

/// Fire-and-forget push after the page's article count changed
fn push_content_update() {
    let message = ExtensionMessage::ContentUpdated {
        articles: scan_document(),
    };

    match serde_wasm_bindgen::to_value(&message) {
        Ok(js_message) => sendRuntimeMessage(js_message),
        Err(e) => warn!("Failed to serialize content update: {}", e),
    }
}

/// Run the extractor over the live document
fn scan_document() -> Vec<ArticleRecord> {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return Vec::new();
    };

    // The document URL, not baseURI: the extractor applies <base href> itself
    let page_url = document.url().ok().and_then(|url| Url::parse(&url).ok());

    let Some(page_url) = page_url else {
        warn!("Could not determine the page URL");
        return Vec::new();
    };

    let html = document
        .document_element()
        .map(|root| root.outer_html())
        .unwrap_or_default();

    extract_article_data(&Html::parse_document(&html), &page_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanned() -> Vec<ArticleRecord> {
        vec![ArticleRecord::new(
            "Foo Bar".to_string(),
            "https://news.example.com/x".to_string(),
            None,
        )]
    }

    #[test]
    fn test_get_article_data_scans_page() {
        let response = respond_to(Some(&ExtensionMessage::GetArticleData), scanned);

        assert_eq!(response.articles, scanned());
    }

    #[test]
    fn test_other_messages_get_empty_reply() {
        let update = ExtensionMessage::ContentUpdated { articles: scanned() };

        let response = respond_to(Some(&update), || panic!("page scanned for a push message"));

        assert!(response.articles.is_empty());
    }

    #[test]
    fn test_undecodable_message_gets_empty_reply() {
        let response = respond_to(None, || panic!("page scanned for an unknown message"));

        assert!(response.articles.is_empty());
    }

    #[test]
    fn test_unknown_action_does_not_decode() {
        let message = serde_json::from_str::<ExtensionMessage>(r#"{"action":"refresh"}"#);

        assert!(message.is_err());
    }
}
