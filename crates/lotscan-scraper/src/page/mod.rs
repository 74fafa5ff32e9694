//! The page handle the pipeline drives.
//!
//! A [`PageHandle`] is owned by the caller and borrowed mutably for the
//! duration of one scrape. [`StaticPage`] is the built-in implementation;
//! a real browser can be plugged in behind the same trait.

mod static_page;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use static_page::StaticPage;

/// Errors raised by a [`PageHandle`].
#[derive(Debug, Error)]
pub enum PageError {
    #[error("navigation to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("{0} is not supported by this page handle")]
    Unsupported(&'static str),

    #[error("invalid selector \"{selector}\": {reason}")]
    Selector { selector: String, reason: String },

    #[error("page HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A DOM element matched by [`PageHandle::find_elements`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageElement {
    /// Visible text of the element and its descendants.
    pub text: String,
    /// `href` of the first descendant anchor, exactly as written in the markup.
    pub first_link: Option<String>,
}

#[async_trait]
pub trait PageHandle: Send + Sync {
    /// Loads `url`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Timeout`] when the load exceeds `timeout`; the
    /// handle may still expose whatever was loaded before the deadline.
    /// Any other error means nothing usable was loaded.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), PageError>;

    /// Full HTML source of the current document.
    async fn page_source(&self) -> Result<String, PageError>;

    /// Visible text of the document body.
    async fn body_text(&self) -> Result<String, PageError>;

    /// Every element matching a CSS `selector`, in document order.
    async fn find_elements(&self, selector: &str) -> Result<Vec<PageElement>, PageError>;

    /// PNG screenshot of the viewport, base64-encoded.
    async fn screenshot_base64(&self) -> Result<String, PageError>;

    /// URL of the current document, after any redirects.
    async fn current_url(&self) -> Result<String, PageError>;

    /// Document `<title>`, empty when missing.
    async fn title(&self) -> Result<String, PageError>;
}
