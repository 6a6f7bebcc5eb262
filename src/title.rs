/// Headline extraction from a snapshot of the active page
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

/// Used when no source yields a title
pub const UNTITLED_ARTICLE: &str = "Untitled Article";

lazy_static! {
    static ref DISALLOWED_CHARS: Regex = Regex::new(
        r##"[^A-Za-z0-9_\s\-.,!?'"()\[\]{}:;/@#$%^&*+=|~`<>€£¥§±]"##
    )
    .unwrap();

    static ref OG_TITLE: Selector = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
    static ref ARTICLE_TITLE: Selector = Selector::parse(r#"meta[property="article:title"]"#).unwrap();
    static ref META_TITLE: Selector = Selector::parse(r#"meta[name="title"]"#).unwrap();
    static ref HEADLINE_H1: Selector =
        Selector::parse(r#"h1[class*="headline"], h1[class*="title"]"#).unwrap();
    static ref ANY_H1: Selector = Selector::parse("h1").unwrap();
    static ref DOCUMENT_TITLE: Selector = Selector::parse("title").unwrap();
}

/// Where a candidate title is read from
enum TitleSource {
    MetaContent(&'static Selector),
    Text(&'static Selector),
}

/// Pick the page headline.
///
/// Sources, first non-empty wins:
/// 1. `og:title`
/// 2. `article:title`
/// 3. `<meta name="title">`
/// 4. an `h1` whose class mentions headline/title
/// 5. the first `h1`
/// 6. `<title>`
pub fn extract_news_title(document: &Html) -> String {
    let sources = [
        TitleSource::MetaContent(&OG_TITLE),
        TitleSource::MetaContent(&ARTICLE_TITLE),
        TitleSource::MetaContent(&META_TITLE),
        TitleSource::Text(&HEADLINE_H1),
        TitleSource::Text(&ANY_H1),
        TitleSource::Text(&DOCUMENT_TITLE),
    ];

    sources
        .iter()
        .find_map(|source| read_source(document, source))
        .map(|raw| clean_title(&raw))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED_ARTICLE.to_string())
}

fn read_source(document: &Html, source: &TitleSource) -> Option<String> {
    let raw = match source {
        TitleSource::MetaContent(selector) => document
            .select(selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::to_string),
        TitleSource::Text(selector) => document
            .select(selector)
            .next()
            .map(|element| element.text().collect::<String>()),
    }?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Drop characters outside the allowed set, then collapse whitespace
pub fn clean_title(raw: &str) -> String {
    collapse_whitespace(&DISALLOWED_CHARS.replace_all(raw, ""))
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_of(html: &str) -> String {
        extract_news_title(&Html::parse_document(html))
    }

    #[test]
    fn test_og_title_wins() {
        let html = r#"<html><head>
            <title>Site | Page</title>
            <meta property="og:title" content="Open Graph Headline">
            <meta name="title" content="Meta Title">
        </head><body><h1>Heading</h1></body></html>"#;

        assert_eq!(title_of(html), "Open Graph Headline");
    }

    #[test]
    fn test_empty_meta_is_skipped() {
        let html = r#"<html><head>
            <meta property="og:title" content="   ">
            <meta property="article:title" content="Article Title">
        </head><body></body></html>"#;

        assert_eq!(title_of(html), "Article Title");
    }

    #[test]
    fn test_headline_class_before_plain_h1() {
        let html = r#"<html><body>
            <h1>Site Name</h1>
            <h1 class="story-headline">The Real Headline</h1>
        </body></html>"#;

        assert_eq!(title_of(html), "The Real Headline");
    }

    #[test]
    fn test_falls_back_to_h1_then_document_title() {
        assert_eq!(title_of("<html><body><h1> Only Heading </h1></body></html>"), "Only Heading");
        assert_eq!(
            title_of("<html><head><title>Document Title</title></head><body></body></html>"),
            "Document Title"
        );
    }

    #[test]
    fn test_placeholder_when_nothing_found() {
        assert_eq!(title_of("<html><body><p>text</p></body></html>"), UNTITLED_ARTICLE);
        assert_eq!(title_of(r#"<html><head><title>🚨🚨</title></head></html>"#), UNTITLED_ARTICLE);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Breaking 🚨  News\n\tToday"), "Breaking News Today");
        assert_eq!(clean_title("Café owners — react"), "Caf owners react");
    }
}
