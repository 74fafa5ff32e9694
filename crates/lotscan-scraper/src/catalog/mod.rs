//! Commerce-platform detection and catalog retrieval.

mod fetcher;
mod origin;
mod types;

use std::time::Duration;

use crate::error::ScraperError;
use crate::outcome::StepOutcome;

pub use fetcher::{CatalogFetcher, ReqwestFetcher};
pub use origin::{page_origin, resolve_link};
pub use types::{CatalogEnvelope, CatalogImage, CatalogPayload, CatalogProduct, CatalogVariant};

/// Catalog endpoint paths, tried in order against the page origin.
const CATALOG_PATHS: [&str; 2] = ["/products.json", "/collections/all/products.json"];

/// Reports whether the page source carries a storefront-platform signature.
///
/// Matches `shopify` anywhere in the source, case-insensitively. This also
/// covers the `<meta name="shopify-digital-wallet">` tag.
#[must_use]
pub fn detect_commerce_platform(page_source: &str) -> bool {
    page_source.to_ascii_lowercase().contains("shopify")
}

/// Candidate catalog endpoints for `origin`, in the order they are tried.
#[must_use]
pub fn catalog_api_urls(origin: &str) -> Vec<String> {
    let origin = origin.trim_end_matches('/');
    CATALOG_PATHS
        .iter()
        .map(|path| format!("{origin}{path}"))
        .collect()
}

/// Fetches the first candidate endpoint that returns a non-empty product list.
///
/// Every candidate failure is logged and the next one is tried. The result is
/// `TransientError` only when every candidate failed at the transport level;
/// if at least one answered (404, bad JSON, empty list) it is `NotFound`.
pub async fn fetch_catalog(
    fetcher: &dyn CatalogFetcher,
    origin: &str,
    timeout: Duration,
) -> StepOutcome<CatalogPayload> {
    let mut transport_failures = Vec::new();
    let candidates = catalog_api_urls(origin);

    for url in candidates.iter().map(String::as_str) {
        match fetcher.get_json(url, timeout).await {
            Ok(body) => {
                let products = match serde_json::from_value::<CatalogEnvelope>(body) {
                    Ok(envelope) => envelope.products,
                    Err(e) => {
                        tracing::debug!(url, error = %e, "catalog response has no products array");
                        continue;
                    }
                };
                if products.is_empty() {
                    tracing::debug!(url, "catalog response has an empty products array");
                    continue;
                }
                tracing::info!(url, products = products.len(), "fetched catalog");
                return StepOutcome::Found(CatalogPayload {
                    origin: origin.to_owned(),
                    source_url: url.to_owned(),
                    products,
                });
            }
            Err(ScraperError::Http(e)) => {
                tracing::warn!(url, error = %e, "catalog request failed");
                transport_failures.push(format!("{url}: {e}"));
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "catalog endpoint unusable");
            }
        }
    }

    if transport_failures.len() == candidates.len() {
        StepOutcome::TransientError(transport_failures.join("; "))
    } else {
        StepOutcome::NotFound
    }
}
