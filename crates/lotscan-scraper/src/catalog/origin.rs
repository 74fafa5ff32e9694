//! Scheme+host origin of a dealer page URL.

use crate::error::ScraperError;

/// Extracts the scheme+host origin from a page URL.
///
/// Given `"https://dealer.example.com/collections/used?page=2"`, returns
/// `"https://dealer.example.com"`, so catalog endpoints are always requested
/// from the store root regardless of which listing page was scraped.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidPageUrl`] when `page_url` does not parse or
/// has an opaque origin (e.g. `data:` URLs).
pub fn page_origin(page_url: &str) -> Result<String, ScraperError> {
    let url = reqwest::Url::parse(page_url).map_err(|e| ScraperError::InvalidPageUrl {
        page_url: page_url.to_owned(),
        reason: e.to_string(),
    })?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(ScraperError::InvalidPageUrl {
            page_url: page_url.to_owned(),
            reason: "URL has no scheme/host origin".to_owned(),
        });
    }
    Ok(origin.ascii_serialization())
}

/// Resolves `href` against `base`, returning it unchanged when either side
/// does not parse.
#[must_use]
pub fn resolve_link(base: &str, href: &str) -> String {
    reqwest::Url::parse(base)
        .and_then(|base| base.join(href))
        .map_or_else(|_| href.to_owned(), |resolved| resolved.to_string())
}
