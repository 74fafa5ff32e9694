//! Scrape orchestration: navigate, detect, then escalate through the tiers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lotscan_core::{AppConfig, ExtractionResult, Tier};

use crate::catalog::{detect_commerce_platform, fetch_catalog, page_origin, CatalogFetcher, ReqwestFetcher};
use crate::diagnostics::{self, Diagnostics};
use crate::error::ScraperError;
use crate::outcome::{SkipReason, StepOutcome, TierOutput};
use crate::page::{PageError, PageHandle};
use crate::tiers::{
    run_api_tier, run_selector_tier, run_structured_tier, run_vision_tier, tier_confidence,
};
use crate::vision::{AnthropicVisionClient, VisionClient};

/// Error message on a scrape where every tier came up empty.
pub const NO_METHOD_SUCCEEDED: &str = "No extraction method succeeded";

/// States visited by one scrape, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Loaded,
    DetectingPlatform,
    TryTier1,
    TryTier2,
    TryTier3,
    TryTier4,
    Succeeded,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Loaded => "loaded",
            Stage::DetectingPlatform => "detecting_platform",
            Stage::TryTier1 => "try_tier1",
            Stage::TryTier2 => "try_tier2",
            Stage::TryTier3 => "try_tier3",
            Stage::TryTier4 => "try_tier4",
            Stage::Succeeded => "succeeded",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The result of a scrape plus what happened along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeReport {
    pub result: ExtractionResult,
    pub stages: Vec<Stage>,
    /// Why items were dropped by the tier that produced the result.
    pub skipped: Vec<SkipReason>,
    /// Present only when every tier failed and the page could be inspected.
    pub diagnostics: Option<Diagnostics>,
}

/// Tunables for [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Pause after navigation so client-side listings can render.
    pub settle_delay: Duration,
    /// Per-candidate timeout for catalog requests.
    pub api_fetch_timeout: Duration,
    /// Decoded screenshot size above which the vision tier is skipped.
    pub max_screenshot_bytes: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(2000),
            api_fetch_timeout: Duration::from_secs(10),
            max_screenshot_bytes: 5 * 1024 * 1024,
        }
    }
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            api_fetch_timeout: Duration::from_secs(config.api_fetch_timeout_secs),
            max_screenshot_bytes: config.max_screenshot_bytes,
        }
    }
}

/// Runs the tiered extraction against a caller-owned page.
///
/// Holds no per-scrape state, so one pipeline can serve any number of
/// sequential or concurrent scrapes on distinct pages.
pub struct Pipeline {
    fetcher: Arc<dyn CatalogFetcher>,
    vision: Option<Arc<dyn VisionClient>>,
    settings: PipelineSettings,
}

impl Pipeline {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn CatalogFetcher>,
        vision: Option<Arc<dyn VisionClient>>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            fetcher,
            vision,
            settings,
        }
    }

    /// Builds the HTTP-backed pipeline described by `config`. The vision
    /// tier is enabled only when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let fetcher: Arc<dyn CatalogFetcher> = Arc::new(ReqwestFetcher::new(&config.user_agent)?);
        let vision = match &config.vision_api_key {
            Some(key) => {
                let client: Arc<dyn VisionClient> = Arc::new(AnthropicVisionClient::new(
                    config.vision_api_url.clone(),
                    key.clone(),
                    config.vision_model.clone(),
                    config.vision_max_tokens,
                    Duration::from_secs(config.vision_timeout_secs),
                )?);
                Some(client)
            }
            None => {
                tracing::info!("ANTHROPIC_API_KEY not set; vision tier disabled");
                None
            }
        };
        Ok(Self::new(fetcher, vision, PipelineSettings::from_config(config)))
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Scrapes `url` and returns only the result.
    pub async fn scrape(
        &self,
        page: &mut dyn PageHandle,
        url: &str,
        page_load_timeout: Duration,
    ) -> ExtractionResult {
        self.scrape_with_report(page, url, page_load_timeout)
            .await
            .result
    }

    /// Scrapes `url`, returning the result with its stage trail, skipped
    /// items and failure diagnostics.
    pub async fn scrape_with_report(
        &self,
        page: &mut dyn PageHandle,
        url: &str,
        page_load_timeout: Duration,
    ) -> ScrapeReport {
        let started = Instant::now();
        let mut stages = vec![Stage::Idle];
        tracing::info!(url, timeout_ms = as_millis(page_load_timeout), "scrape started");

        match page.navigate(url, page_load_timeout).await {
            Ok(()) => {}
            Err(PageError::Timeout { timeout_ms, .. }) => {
                tracing::warn!(url, timeout_ms, "page load timed out, continuing with partial page");
            }
            Err(e) => {
                tracing::error!(url, error = %e, "navigation failed");
                stages.push(Stage::Failed);
                return ScrapeReport {
                    result: ExtractionResult::failed(e.to_string(), 0, elapsed_ms(started)),
                    stages,
                    skipped: Vec::new(),
                    diagnostics: None,
                };
            }
        }
        stages.push(Stage::Loaded);

        if !self.settings.settle_delay.is_zero() {
            tokio::time::sleep(self.settings.settle_delay).await;
        }

        stages.push(Stage::DetectingPlatform);
        let page_source = match page.page_source().await {
            Ok(source) => Some(source),
            Err(e) => {
                tracing::warn!(error = %e, "could not read page source");
                None
            }
        };
        let catalog = match page_source.as_deref() {
            Some(source) if detect_commerce_platform(source) => {
                tracing::info!("storefront platform detected, fetching catalog");
                match page_origin(url) {
                    Ok(origin) => {
                        fetch_catalog(self.fetcher.as_ref(), &origin, self.settings.api_fetch_timeout)
                            .await
                    }
                    Err(e) => StepOutcome::TransientError(e.to_string()),
                }
            }
            _ => StepOutcome::NotFound,
        };

        stages.push(Stage::TryTier1);
        let outcome = match catalog {
            StepOutcome::Found(payload) => run_api_tier(&payload),
            StepOutcome::NotFound => StepOutcome::NotFound,
            StepOutcome::TransientError(detail) => StepOutcome::TransientError(detail),
        };
        if let Some(report) = finish_if_found(outcome, Tier::Api, started, &mut stages) {
            return report;
        }

        stages.push(Stage::TryTier2);
        let outcome = match page_source.as_deref() {
            Some(source) => run_structured_tier(source),
            None => StepOutcome::TransientError("page source unavailable".to_string()),
        };
        if let Some(report) = finish_if_found(outcome, Tier::Structured, started, &mut stages) {
            return report;
        }

        stages.push(Stage::TryTier3);
        let page_url = page.current_url().await.unwrap_or_else(|_| url.to_string());
        let outcome = run_selector_tier(&*page, &page_url).await;
        if let Some(report) = finish_if_found(outcome, Tier::Selectors, started, &mut stages) {
            return report;
        }

        stages.push(Stage::TryTier4);
        let outcome = run_vision_tier(
            &*page,
            self.vision.as_deref(),
            self.settings.max_screenshot_bytes,
        )
        .await;
        if let Some(report) = finish_if_found(outcome, Tier::Vision, started, &mut stages) {
            return report;
        }

        stages.push(Stage::Failed);
        let diagnostics = diagnostics::collect(&*page).await;
        ScrapeReport {
            result: ExtractionResult::failed(NO_METHOD_SUCCEEDED, 1, elapsed_ms(started)),
            stages,
            skipped: Vec::new(),
            diagnostics,
        }
    }
}

/// Turns a successful tier outcome into the final report; logs and returns
/// `None` otherwise so the caller escalates.
fn finish_if_found(
    outcome: StepOutcome<TierOutput>,
    tier: Tier,
    started: Instant,
    stages: &mut Vec<Stage>,
) -> Option<ScrapeReport> {
    match outcome {
        StepOutcome::Found(output) => {
            stages.push(Stage::Succeeded);
            let confidence = tier_confidence(tier);
            let duration_ms = elapsed_ms(started);
            tracing::info!(
                %tier,
                %confidence,
                vehicles = output.vehicles.len(),
                duration_ms,
                "scrape succeeded"
            );
            Some(ScrapeReport {
                result: ExtractionResult::succeeded(output.vehicles, tier, confidence, duration_ms),
                stages: std::mem::take(stages),
                skipped: output.skipped,
                diagnostics: None,
            })
        }
        StepOutcome::NotFound => {
            tracing::info!(%tier, "tier found nothing, escalating");
            None
        }
        StepOutcome::TransientError(detail) => {
            tracing::warn!(%tier, %detail, "tier failed, escalating");
            None
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    as_millis(started.elapsed())
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
