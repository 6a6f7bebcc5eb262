/// Heuristic article discovery for arbitrary news pages
///
/// Nothing here is site specific. Containers, titles and images are found
/// with ordered selector lists and every step degrades to "nothing found"
/// rather than failing.
use crate::article_data::ArticleRecord;
use crate::title::collapse_whitespace;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Images at or below this size in both known dimensions are treated as icons
pub const MIN_IMAGE_DIMENSION: f64 = 60.0;

/// Elements that may wrap a single article
pub const ARTICLE_SELECTORS: &[&str] = &[
    "article",
    r#"[class*="article"]"#,
    r#"[class*="story"]"#,
    ".news-item",
    ".entry-content",
    ".post",
    ".news-card",
    ".story-card",
    ".content-card",
    r#"[itemtype*="Article"]"#,
    r#"[role="article"]"#,
    ".article-body",
    ".story-body",
];

/// Cheap subset of `ARTICLE_SELECTORS` used to detect that the page changed
pub const ARTICLE_COUNT_SELECTOR: &str = r#"article, [class*="article"], [class*="story"]"#;

const TITLE_SELECTORS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    r#"[class*="title"]"#,
    r#"[class*="headline"]"#,
    r#"a[class*="title"]"#,
    r#"a[class*="headline"]"#,
    ".article-title",
    ".story-title",
    ".entry-title",
];

/// Image tiers, highest priority first
const IMAGE_SELECTORS: &[&str] = &[
    r#"img[src*="article"]"#,
    r#"img[src*="news"]"#,
    r#"img[src*="story"]"#,
    r#"img[src*="media"]"#,
    r#"img[src*="photo"]"#,
    r#"img[src*="images"]"#,
    "img[data-src]",
    "img[data-lazy-src]",
    "img[data-original]",
    ".article-image img",
    ".story-image img",
    ".featured-image img",
    ".thumbnail img",
    "picture source",
    r#"[style*="background-image"]"#,
];

const TIERED_IMG_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original"];
const FALLBACK_IMG_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src"];

lazy_static! {
    static ref ARTICLE: Selector = selector(&ARTICLE_SELECTORS.join(", "));
    static ref TITLE: Selector = selector(&TITLE_SELECTORS.join(", "));
    static ref IMAGE_TIERS: Vec<Selector> = IMAGE_SELECTORS.iter().map(|css| selector(css)).collect();
    static ref ANY_IMG: Selector = selector("img");
    static ref LINK: Selector = selector("a[href]");
    static ref BASE: Selector = selector("base[href]");
    static ref BACKGROUND_IMAGE: Regex = Regex::new(r"(?i)background-image\s*:\s*([^;]+)").unwrap();
    static ref CSS_URL: Regex = Regex::new(r#"^url\(\s*['"]?([^'")]+?)['"]?\s*\)$"#).unwrap();
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {:?}: {:?}", css, e))
}

/// Parse a page snapshot and extract its articles
pub fn extract_articles_from_html(html: &str, page_url: &str) -> Result<Vec<ArticleRecord>, url::ParseError> {
    let page_url = Url::parse(page_url)?;
    Ok(extract_article_data(&Html::parse_document(html), &page_url))
}

/// Extract every article the heuristics can find.
///
/// Each container is handled on its own, so a nested container pair can
/// produce two records for the same story.
pub fn extract_article_data(document: &Html, page_url: &Url) -> Vec<ArticleRecord> {
    let base = document_base(document, page_url);

    document
        .select(&ARTICLE)
        .filter_map(|container| extract_record(container, &base))
        .collect()
}

fn extract_record(container: ElementRef, base: &Url) -> Option<ArticleRecord> {
    let title_element = container.select(&TITLE).next()?;

    let title = collapse_whitespace(&title_element.text().collect::<String>());
    if title.is_empty() {
        return None;
    }

    let url = title_link(title_element, base)?;
    let image_url = extract_image_from_article(container, base);

    Some(ArticleRecord::new(title, url, image_url))
}

/// `<base href>` if the page declares one, otherwise the page URL
pub fn document_base(document: &Html, page_url: &Url) -> Url {
    document
        .select(&BASE)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// The link for a title: the element itself, its nearest enclosing link,
/// then the first link inside it.
fn title_link(title_element: ElementRef, base: &Url) -> Option<String> {
    let enclosing = std::iter::once(title_element)
        .chain(title_element.ancestors().filter_map(ElementRef::wrap))
        .find(|element| element.value().name() == "a");

    let href = match enclosing {
        Some(link) => link.value().attr("href"),
        None => title_element
            .select(&LINK)
            .next()
            .and_then(|link| link.value().attr("href")),
    }?;

    resolve_link(base, href)
}

fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    base.join(href)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(String::from)
}

fn resolve_image(base: &Url, raw: &str) -> Option<String> {
    base.join(raw.trim())
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https" | "data"))
        .map(String::from)
}

/// Find a representative image inside an article container.
///
/// Tiers are tried in priority order and, within a tier, matches in document
/// order. If no tier produces an image, any `img` that passes the size filter
/// is used.
pub fn extract_image_from_article(container: ElementRef, base: &Url) -> Option<String> {
    IMAGE_TIERS
        .iter()
        .flat_map(|tier| container.select(tier))
        .find_map(|element| tiered_image(element).and_then(|raw| resolve_image(base, &raw)))
        .or_else(|| {
            container
                .select(&ANY_IMG)
                .filter(|img| passes_size_filter(*img))
                .find_map(|img| first_attr(img, FALLBACK_IMG_ATTRS).and_then(|raw| resolve_image(base, &raw)))
        })
}

fn tiered_image(element: ElementRef) -> Option<String> {
    match element.value().name() {
        "img" => first_attr(element, TIERED_IMG_ATTRS).filter(|_| passes_size_filter(element)),
        "source" => srcset_first(element),
        _ => element.value().attr("style").and_then(background_image_url),
    }
}

fn first_attr(element: ElementRef, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| element.value().attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn srcset_first(element: ElementRef) -> Option<String> {
    first_attr(element, &["srcset", "data-srcset"])?
        .split(',')
        .next()?
        .split_whitespace()
        .next()
        .map(str::to_string)
}

/// Unwrap `background-image: url(...)` from an inline style
pub fn background_image_url(style: &str) -> Option<String> {
    let value = BACKGROUND_IMAGE.captures(style)?.get(1)?.as_str().trim();
    if value.eq_ignore_ascii_case("none") {
        return None;
    }

    CSS_URL
        .captures(value)
        .and_then(|captures| captures.get(1))
        .map(|url| url.as_str().trim().to_string())
        .filter(|url| !url.is_empty() && url != "none")
}

/// Accept when a known dimension exceeds the icon threshold, or when no
/// dimension is given at all.
fn passes_size_filter(img: ElementRef) -> bool {
    let dimensions = [dimension(img, "width"), dimension(img, "height")];

    if dimensions.iter().all(Option::is_none) {
        return true;
    }

    dimensions.iter().flatten().any(|size| *size > MIN_IMAGE_DIMENSION)
}

fn dimension(element: ElementRef, name: &str) -> Option<f64> {
    element
        .value()
        .attr(name)?
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .ok()
}
