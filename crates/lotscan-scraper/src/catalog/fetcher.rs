//! JSON GET collaborator used for catalog endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::ScraperError;

/// Fetches a JSON document over HTTP.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    /// GETs `url` and parses the body as JSON, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] for HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ScraperError::Deserialize`] when the body is not JSON.
    /// - [`ScraperError::Http`] for network, TLS or timeout failures.
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, ScraperError>;
}

/// [`CatalogFetcher`] backed by a shared `reqwest::Client`.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Creates a fetcher that sends `user_agent` on every request.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CatalogFetcher for ReqwestFetcher {
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, ScraperError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(
                reqwest::header::ACCEPT,
                "application/json,text/html;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Value>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("catalog response from {url}"),
            source: e,
        })
    }
}
