/// Page change detection for the content script
use crate::extractor::ARTICLE_COUNT_SELECTOR;
use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MutationObserver, MutationObserverInit};

/// Attributes whose changes can reveal a new or different image
const WATCHED_ATTRIBUTES: [&str; 3] = ["src", "data-src", "style"];

/// Remembers the last article count seen on the page
#[derive(Debug, Default)]
pub struct ArticleCountTracker {
    last_count: usize,
}

impl ArticleCountTracker {
    pub fn new() -> Self {
        ArticleCountTracker { last_count: 0 }
    }

    /// Record `count`; true when it differs from the previous one
    pub fn observe(&mut self, count: usize) -> bool {
        if count == self.last_count {
            return false;
        }
        self.last_count = count;
        true
    }

    pub fn last_count(&self) -> usize {
        self.last_count
    }
}

/// Count the elements matching the cheap article selector
pub fn count_article_candidates() -> usize {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.query_selector_all(ARTICLE_COUNT_SELECTOR).ok())
        .map(|nodes| nodes.length() as usize)
        .unwrap_or(0)
}

/// A `MutationObserver` on `document.body` that calls `on_change` whenever a
/// mutation batch changes the article count.
///
/// Disconnects when dropped.
pub struct ContentWatcher {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl ContentWatcher {
    pub fn new<F>(on_change: F) -> Result<Self, JsValue>
    where
        F: Fn() + 'static,
    {
        let mut tracker = ArticleCountTracker::new();

        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                let count = count_article_candidates();
                if tracker.observe(count) {
                    debug!("Article count changed to {}", count);
                    on_change();
                }
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;

        Ok(ContentWatcher {
            observer,
            _callback: callback,
        })
    }

    /// Start observing the body for child-list changes and image attributes
    pub fn start(&self) -> Result<(), JsValue> {
        let body = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body())
            .ok_or_else(|| JsValue::from_str("document has no body"))?;

        let attribute_filter: js_sys::Array = WATCHED_ATTRIBUTES.iter().map(|name| JsValue::from_str(name)).collect();

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        options.set_attributes(true);
        options.set_attribute_filter(&attribute_filter);

        self.observer.observe_with_options(&body, &options)
    }

    pub fn stop(&self) {
        self.observer.disconnect();
    }
}

impl Drop for ContentWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_starts_at_zero() {
        let mut tracker = ArticleCountTracker::new();

        assert_eq!(tracker.last_count(), 0);
        assert!(!tracker.observe(0));
    }

    #[test]
    fn test_tracker_reports_changes_only() {
        let mut tracker = ArticleCountTracker::new();

        assert!(tracker.observe(3));
        assert!(!tracker.observe(3));
        assert!(tracker.observe(5));
        assert!(tracker.observe(2));
        assert_eq!(tracker.last_count(), 2);
    }
}
