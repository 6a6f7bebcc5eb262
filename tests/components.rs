//! Browser tests for the result list components. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use similar_news::SimilarityResult;
use similar_news::ui::components::{ArticleImage, ArticleImageProps, ArticleItem, ArticleItemProps, NO_IMAGE};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use yew::Callback;

wasm_bindgen_test_configure!(run_in_browser);

// 1x1 transparent gif, so the browser never fires a real load error
const PIXEL: &str = "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7";

fn mount_point() -> web_sys::Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let root = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&root).unwrap();
    root
}

async fn settle() {
    yew::platform::time::sleep(Duration::from_millis(20)).await;
}

fn result(title: &str, score: Option<f64>) -> SimilarityResult {
    SimilarityResult {
        title: title.to_string(),
        url: "https://news.example.com/similar".to_string(),
        score,
        image_url: None,
    }
}

fn render_item(item: SimilarityResult, on_open: Callback<String>) -> web_sys::Element {
    let root = mount_point();
    yew::Renderer::<ArticleItem>::with_root_and_props(root.clone(), ArticleItemProps { item, on_open }).render();
    root
}

#[wasm_bindgen_test]
async fn test_missing_image_shows_placeholder() {
    let root = mount_point();
    yew::Renderer::<ArticleImage>::with_root_and_props(
        root.clone(),
        ArticleImageProps {
            src: None,
            alt: "Foo".to_string(),
        },
    )
    .render();
    settle().await;

    assert!(root.query_selector("img").unwrap().is_none());
    assert_eq!(root.text_content().unwrap_or_default(), NO_IMAGE);
}

#[wasm_bindgen_test]
async fn test_broken_image_falls_back_to_placeholder() {
    let root = mount_point();
    yew::Renderer::<ArticleImage>::with_root_and_props(
        root.clone(),
        ArticleImageProps {
            src: Some(PIXEL.to_string()),
            alt: "Foo".to_string(),
        },
    )
    .render();
    settle().await;

    let img = root.query_selector("img").unwrap().expect("image rendered");
    assert_eq!(img.get_attribute("loading").as_deref(), Some("lazy"));

    img.dispatch_event(&web_sys::Event::new("error").unwrap()).unwrap();
    settle().await;

    assert!(root.query_selector("img").unwrap().is_none());
    assert_eq!(root.text_content().unwrap_or_default(), NO_IMAGE);
}

#[wasm_bindgen_test]
async fn test_score_rendered_as_percentage() {
    let root = render_item(result("Foo Bar", Some(0.873)), Callback::noop());
    settle().await;

    let text = root.text_content().unwrap_or_default();
    assert!(text.contains("Foo Bar"));
    assert!(text.contains("Relevance: 87%"));
}

#[wasm_bindgen_test]
async fn test_unscored_result_has_no_relevance() {
    let root = render_item(result("Foo Bar", None), Callback::noop());
    settle().await;

    assert!(!root.text_content().unwrap_or_default().contains("Relevance"));
}

#[wasm_bindgen_test]
async fn test_invalid_title_rendered_as_untitled() {
    let root = render_item(result("  padded  ", None), Callback::noop());
    settle().await;

    assert!(root.text_content().unwrap_or_default().contains("Untitled"));
}

#[wasm_bindgen_test]
async fn test_click_opens_result_url() {
    let opened = Rc::new(RefCell::new(None));
    let on_open = {
        let opened = opened.clone();
        Callback::from(move |url: String| *opened.borrow_mut() = Some(url))
    };

    let root = render_item(result("Foo Bar", None), on_open);
    settle().await;

    let item = root
        .query_selector("li.article-item")
        .unwrap()
        .expect("item rendered")
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap();
    item.click();
    settle().await;

    assert_eq!(opened.borrow().as_deref(), Some("https://news.example.com/similar"));
}
