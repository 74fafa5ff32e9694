//! Post-mortem for scrapes where every tier came up empty.

use serde::Serialize;

use crate::page::{PageError, PageHandle};

/// Characters of body text inspected for block indicators.
pub const BODY_EXCERPT_CHARS: usize = 500;

/// Trimmed body text shorter than this counts as a blank page.
pub const BLANK_PAGE_CHARS: usize = 50;

/// Signs that the site served something other than its inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockIndicators {
    pub access_denied: bool,
    pub captcha: bool,
    pub proxy_challenge: bool,
    pub blank_page: bool,
    pub redirect: bool,
}

impl BlockIndicators {
    #[must_use]
    pub fn any(&self) -> bool {
        self.access_denied || self.captcha || self.proxy_challenge || self.blank_page || self.redirect
    }
}

/// Page state captured after a failed extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub current_url: String,
    pub title: String,
    pub source_length: usize,
    pub body_excerpt: String,
    pub indicators: BlockIndicators,
}

/// Classifies a body-text excerpt (case-insensitive).
#[must_use]
pub fn classify_body_text(excerpt: &str) -> BlockIndicators {
    let lower = excerpt.to_lowercase();
    BlockIndicators {
        access_denied: lower.contains("access denied") || lower.contains("forbidden"),
        captcha: lower.contains("captcha") || lower.contains("verify you are human"),
        proxy_challenge: lower.contains("cloudflare") || lower.contains("checking your browser"),
        blank_page: excerpt.trim().chars().count() < BLANK_PAGE_CHARS,
        redirect: lower.contains("redirect"),
    }
}

/// Gathers [`Diagnostics`] from the page and logs them.
///
/// Returns `None` (after logging) if the page cannot answer; collecting
/// diagnostics never fails a scrape.
pub async fn collect(page: &dyn PageHandle) -> Option<Diagnostics> {
    match gather(page).await {
        Ok(diagnostics) => {
            tracing::warn!(
                current_url = %diagnostics.current_url,
                title = %diagnostics.title,
                source_length = diagnostics.source_length,
                body_excerpt = %diagnostics.body_excerpt,
                access_denied = diagnostics.indicators.access_denied,
                captcha = diagnostics.indicators.captcha,
                proxy_challenge = diagnostics.indicators.proxy_challenge,
                blank_page = diagnostics.indicators.blank_page,
                redirect = diagnostics.indicators.redirect,
                "extraction failed"
            );
            Some(diagnostics)
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not gather failure diagnostics");
            None
        }
    }
}

async fn gather(page: &dyn PageHandle) -> Result<Diagnostics, PageError> {
    let current_url = page.current_url().await?;
    let title = page.title().await?;
    let source_length = page.page_source().await?.len();
    let body_excerpt: String = page
        .body_text()
        .await?
        .chars()
        .take(BODY_EXCERPT_CHARS)
        .collect();
    let indicators = classify_body_text(&body_excerpt);
    Ok(Diagnostics {
        current_url,
        title,
        source_length,
        body_excerpt,
        indicators,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::StaticPage;

    const FILLER: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod.";

    #[test]
    fn access_denied_page_is_flagged() {
        let flags = classify_body_text(&format!("Access Denied. {FILLER}"));
        assert!(flags.access_denied);
        assert!(!flags.blank_page);
        assert!(!flags.captcha);
    }

    #[test]
    fn challenge_pages_are_flagged() {
        let flags = classify_body_text("Checking your browser before accessing. Please verify you are human.");
        assert!(flags.proxy_challenge);
        assert!(flags.captcha);
    }

    #[test]
    fn short_body_is_blank() {
        assert!(classify_body_text("   Loading...   ").blank_page);
        assert!(classify_body_text("").blank_page);
        assert!(!classify_body_text(FILLER).blank_page);
    }

    #[test]
    fn redirect_mention_is_flagged() {
        assert!(classify_body_text("You are being redirected").redirect);
        assert!(!classify_body_text(FILLER).any());
    }

    #[tokio::test]
    async fn collect_reads_page_state_and_truncates_excerpt() {
        let long_body = "word ".repeat(300);
        let html = format!("<html><head><title>Inventory</title></head><body>{long_body}</body></html>");
        let page = StaticPage::from_html("https://dealer.example.com/", html.clone());
        let diagnostics = collect(&page).await.expect("static page answers");
        assert_eq!(diagnostics.title, "Inventory");
        assert_eq!(diagnostics.source_length, html.len());
        assert_eq!(diagnostics.body_excerpt.chars().count(), BODY_EXCERPT_CHARS);
        assert!(!diagnostics.indicators.blank_page);
    }
}
