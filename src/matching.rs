/// Decorating API results with images scraped from the page

use crate::article_data::{ArticleRecord, SimilarityResult};

/// First local article that plausibly refers to the same story.
///
/// Matches on equal URL, equal title, or either title containing the other.
/// Containment lets truncated headlines match, and can also pair up two
/// different stories that share a short title.
pub fn find_matching_article<'a>(
    result: &SimilarityResult,
    local_articles: &'a [ArticleRecord],
) -> Option<&'a ArticleRecord> {
    local_articles.iter().find(|local| {
        local.url == result.url
            || local.title == result.title
            || (!local.title.is_empty() && result.title.contains(&local.title))
            || (!result.title.is_empty() && local.title.contains(&result.title))
    })
}

/// Copy the matched article's image onto each result
pub fn attach_images(results: &mut [SimilarityResult], local_articles: &[ArticleRecord]) {
    for result in results.iter_mut() {
        copy_image(result, local_articles);
    }
}

/// Like `attach_images`, but leaves results that already have an image alone
pub fn fill_missing_images(results: &mut [SimilarityResult], local_articles: &[ArticleRecord]) {
    for result in results.iter_mut().filter(|r| r.image_url.is_none()) {
        copy_image(result, local_articles);
    }
}

fn copy_image(result: &mut SimilarityResult, local_articles: &[ArticleRecord]) {
    let image = find_matching_article(result, local_articles).and_then(|local| local.image_url.clone());

    if image.is_some() {
        result.image_url = image;
    }
}
