/// Validation and normalisation of tab URLs and titles
use lazy_static::lazy_static;
use regex::Regex;

/// Shown in place of result titles that fail validation
pub const UNTITLED: &str = "Untitled";

/// Upper bound on title length, in characters
pub const MAX_TITLE_CHARS: usize = 300;

lazy_static! {
    static ref NEWS_URL: Regex = Regex::new(
        r"^https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b[-a-zA-Z0-9()@:%_+.~#?&/=]*$"
    )
    .unwrap();

    static ref TITLE: Regex = Regex::new(&format!(
        r##"^[A-Za-z0-9\s\-_.,!?'"()\[\]{{}}:;/@#$%^&*+=|~`<>€£¥§±]{{1,{}}}$"##,
        MAX_TITLE_CHARS
    ))
    .unwrap();
}

/// Pages the extension can neither inject into nor look up
const RESTRICTED_PREFIXES: &[&str] = &["chrome://", "edge://", "about:", "chrome-extension://"];

/// Check that a URL looks like `scheme://[www.]domain.tld[/path]`
pub fn is_valid_url(url: &str) -> bool {
    NEWS_URL.is_match(url)
}

/// Browser-internal pages
pub fn is_restricted_page(url: &str) -> bool {
    let url = url.trim_start();
    RESTRICTED_PREFIXES.iter().any(|prefix| url.starts_with(prefix))
}

/// Check a title against the allowed character set and length
pub fn is_valid_title(title: &str) -> bool {
    !title.starts_with(char::is_whitespace)
        && !title.ends_with(char::is_whitespace)
        && TITLE.is_match(title)
}

/// Title to render for an API result
pub fn display_title(title: &str) -> &str {
    if is_valid_title(title) { title } else { UNTITLED }
}

/// Strip surrounding whitespace and trailing slashes before a URL is sent to the API.
///
/// Stripping repeats until neither is left, so applying it twice changes nothing.
pub fn process_news_url(url: &str) -> String {
    url.trim_start()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("https://www.example.com/news/story-1"));
        assert!(is_valid_url("http://example.com"));
        assert!(is_valid_url("https://www.bbc.co.uk/news/world-123?ref=home"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_url("chrome://extensions"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("https://localhost"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn test_restricted_pages() {
        assert!(is_restricted_page("chrome://extensions"));
        assert!(is_restricted_page("edge://settings"));
        assert!(is_restricted_page("about:blank"));
        assert!(!is_restricted_page("https://news.example.com"));
    }

    #[test]
    fn test_valid_titles() {
        assert!(is_valid_title("Foo Bar"));
        assert!(is_valid_title("Markets: FTSE up 2% (£5bn) - live"));
        assert!(is_valid_title("Price hits €5 [update]"));
    }

    #[test]
    fn test_invalid_titles() {
        assert!(!is_valid_title(""));
        assert!(!is_valid_title(" leading space"));
        assert!(!is_valid_title("trailing space "));
        assert!(!is_valid_title("日本のニュース"));
        assert!(!is_valid_title(&"a".repeat(MAX_TITLE_CHARS + 1)));
        assert!(is_valid_title(&"a".repeat(MAX_TITLE_CHARS)));
    }

    #[test]
    fn test_display_title_fallback() {
        assert_eq!(display_title("Foo"), "Foo");
        assert_eq!(display_title("Breaking 🚨"), UNTITLED);
    }

    #[test]
    fn test_process_news_url() {
        assert_eq!(process_news_url("https://x.com/a/"), "https://x.com/a");
        assert_eq!(process_news_url("  https://x.com/  "), "https://x.com");
        assert_eq!(process_news_url("https://x.com/a"), "https://x.com/a");
    }

    #[test]
    fn test_process_news_url_idempotent() {
        let samples = [
            "https://x.com/a/",
            "https://x.com/a//",
            "https://x.com/a/ /",
            " \thttps://x.com/a?b=c \n",
            "",
            "/",
        ];

        for sample in samples {
            let once = process_news_url(sample);
            assert_eq!(process_news_url(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
