//! The `scrape` command: one page, one result on stdout.

use std::time::Duration;

use lotscan_core::{clamp_page_load_timeout_ms, AppConfig};
use lotscan_scraper::{Pipeline, StaticPage};

/// Page-load timeout for a run: the flag when given, else the configured
/// default. Both are clamped.
pub(crate) fn effective_timeout(config: &AppConfig, timeout_ms: Option<u64>) -> Duration {
    let ms = timeout_ms.map_or(config.page_load_timeout_ms, clamp_page_load_timeout_ms);
    Duration::from_millis(ms)
}

/// Scrapes `url` and prints the result as pretty JSON.
///
/// A scrape that finds nothing is still printed; only setup failures are
/// returned as errors.
///
/// # Errors
///
/// Returns an error if the HTTP clients cannot be built or the result
/// cannot be serialized.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    url: &str,
    timeout_ms: Option<u64>,
    report: bool,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config)?;
    let mut page = StaticPage::new(&config.user_agent)?;
    let timeout = effective_timeout(config, timeout_ms);

    let outcome = pipeline.scrape_with_report(&mut page, url, timeout).await;

    if report {
        let trail: Vec<String> = outcome.stages.iter().map(ToString::to_string).collect();
        eprintln!("stages: {}", trail.join(" -> "));
        if !outcome.skipped.is_empty() {
            eprintln!("skipped items: {}", outcome.skipped.len());
        }
        if let Some(diagnostics) = &outcome.diagnostics {
            eprintln!("diagnostics: {}", serde_json::to_string_pretty(diagnostics)?);
        }
    }

    println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    Ok(())
}
