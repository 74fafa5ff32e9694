//! [`PageHandle`] over a plain HTTP fetch, queried with the `scraper` crate.
//!
//! The document is kept as source text and re-parsed per query because
//! `scraper::Html` is not `Send`; parsing happens inside synchronous helpers
//! so no parsed tree is ever held across an `.await`.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use super::{PageElement, PageError, PageHandle};

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid selector"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("valid selector"));

/// Elements whose text content never renders.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Non-rendering page handle.
///
/// Built with [`StaticPage::new`] it fetches documents over HTTP; built with
/// [`StaticPage::from_html`] it serves a fixed snapshot and ignores
/// navigation. Screenshots are unsupported either way.
pub struct StaticPage {
    client: Option<Client>,
    url: Option<String>,
    html: String,
}

impl StaticPage {
    /// Creates an HTTP-backed handle that sends `user_agent` on every load.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(user_agent: &str) -> Result<Self, PageError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client: Some(client),
            url: None,
            html: String::new(),
        })
    }

    /// Creates a handle serving a fixed HTML snapshot as if loaded from `url`.
    #[must_use]
    pub fn from_html(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            client: None,
            url: Some(url.into()),
            html: html.into(),
        }
    }

    /// Drops the loaded document. HTTP-backed handles can navigate again.
    pub fn reset(&mut self) {
        self.html.clear();
        if self.client.is_some() {
            self.url = None;
        }
    }

    async fn fetch(client: &Client, url: &str) -> Result<(String, String), PageError> {
        let response = client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            // Block and challenge pages still carry a body worth diagnosing.
            tracing::warn!(url, status = status.as_u16(), "page answered with non-2xx status");
        }
        let final_url = response.url().to_string();
        let body = response.text().await?;
        Ok((final_url, body))
    }
}

#[async_trait]
impl PageHandle for StaticPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), PageError> {
        let Some(client) = &self.client else {
            return Ok(());
        };

        self.url = Some(url.to_string());
        self.html.clear();

        match tokio::time::timeout(timeout, Self::fetch(client, url)).await {
            Ok(Ok((final_url, body))) => {
                self.url = Some(final_url);
                self.html = body;
                Ok(())
            }
            Ok(Err(PageError::Http(e))) if e.is_timeout() => Err(PageError::Timeout {
                url: url.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            Ok(Err(e)) => Err(e),
            Err(_elapsed) => Err(PageError::Timeout {
                url: url.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    async fn page_source(&self) -> Result<String, PageError> {
        Ok(self.html.clone())
    }

    async fn body_text(&self) -> Result<String, PageError> {
        Ok(document_body_text(&self.html))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<PageElement>, PageError> {
        select_elements(&self.html, selector)
    }

    async fn screenshot_base64(&self) -> Result<String, PageError> {
        Err(PageError::Unsupported("screenshot"))
    }

    async fn current_url(&self) -> Result<String, PageError> {
        self.url
            .clone()
            .ok_or_else(|| PageError::Navigation("no document loaded".to_string()))
    }

    async fn title(&self) -> Result<String, PageError> {
        Ok(document_title(&self.html))
    }
}

fn document_body_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&BODY_SELECTOR)
        .next()
        .map(visible_text)
        .unwrap_or_default()
}

fn document_title(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .unwrap_or_default()
}

fn select_elements(html: &str, selector: &str) -> Result<Vec<PageElement>, PageError> {
    let parsed = Selector::parse(selector).map_err(|e| PageError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&parsed)
        .map(|element| PageElement {
            text: visible_text(element),
            first_link: element
                .select(&ANCHOR_SELECTOR)
                .next()
                .and_then(|anchor| anchor.value().attr("href"))
                .map(str::to_string),
        })
        .collect())
}

/// Rendered-ish text of an element: text nodes outside script/style content,
/// with runs of whitespace collapsed to single spaces.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| INVISIBLE_TAGS.contains(&el.name()))
        });
        if !hidden {
            raw.push_str(text);
            raw.push(' ');
        }
    }
    collapse_whitespace(&raw)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING_HTML: &str = r#"
        <html>
          <head><title> Used Cars | Example Motors </title>
            <script>var tracking = "2011 ignored";</script>
          </head>
          <body>
            <div class="vehicle-card"><a href="/cars/1">2019 Honda Civic</a> $12,500</div>
            <div class="vehicle-card"><span>2020 Ford F-150</span> 31,000 miles</div>
            <style>.vehicle-card { color: red; }</style>
          </body>
        </html>"#;

    #[tokio::test]
    async fn snapshot_answers_text_queries() {
        let page = StaticPage::from_html("https://dealer.example.com/inventory", LISTING_HTML);
        assert_eq!(page.title().await.unwrap(), "Used Cars | Example Motors");

        let body = page.body_text().await.unwrap();
        assert!(body.starts_with("2019 Honda Civic $12,500"));
        assert!(!body.contains("color: red"));
        assert_eq!(
            page.current_url().await.unwrap(),
            "https://dealer.example.com/inventory"
        );
    }

    #[tokio::test]
    async fn find_elements_returns_text_and_first_link() {
        let page = StaticPage::from_html("https://dealer.example.com/", LISTING_HTML);
        let elements = page.find_elements(".vehicle-card").await.unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text, "2019 Honda Civic $12,500");
        assert_eq!(elements[0].first_link.as_deref(), Some("/cars/1"));
        assert_eq!(elements[1].first_link, None);
    }

    #[tokio::test]
    async fn invalid_selector_is_reported() {
        let page = StaticPage::from_html("https://dealer.example.com/", LISTING_HTML);
        let err = page.find_elements("div[").await.unwrap_err();
        assert!(matches!(err, PageError::Selector { .. }));
    }

    #[tokio::test]
    async fn screenshots_are_unsupported() {
        let page = StaticPage::from_html("https://dealer.example.com/", LISTING_HTML);
        assert!(matches!(
            page.screenshot_base64().await,
            Err(PageError::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn snapshot_ignores_navigation_and_reset_clears_document() {
        let mut page = StaticPage::from_html("https://dealer.example.com/", LISTING_HTML);
        page.navigate("https://elsewhere.example.com/", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(page.current_url().await.unwrap(), "https://dealer.example.com/");

        page.reset();
        assert!(page.page_source().await.unwrap().is_empty());
    }
}
