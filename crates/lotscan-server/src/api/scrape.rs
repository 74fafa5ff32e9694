use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use lotscan_core::clamp_page_load_timeout_ms;
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, AppState};
use crate::middleware::RequestId;

const MISSING_URL: &str = "Missing 'url' in request body";

#[derive(Debug, PartialEq, Eq)]
struct ScrapeRequest {
    url: String,
    /// Clamped page-load timeout, when the caller sent a numeric one.
    timeout_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
struct CloseData {
    status: &'static str,
}

/// Reads `{"url": …, "timeout": …}` leniently: a non-numeric `timeout` is
/// ignored rather than rejected.
fn parse_scrape_request(body: &[u8]) -> Result<ScrapeRequest, ApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ApiError::bad_request(MISSING_URL))?;
    let url = value
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(MISSING_URL))?;
    let timeout_ms = value
        .get("timeout")
        .and_then(Value::as_f64)
        .filter(|ms| ms.is_finite())
        .map(timeout_from_millis);

    Ok(ScrapeRequest {
        url: url.trim().to_string(),
        timeout_ms,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn timeout_from_millis(ms: f64) -> u64 {
    // Saturating cast: negatives become 0 and are then raised to the minimum.
    clamp_page_load_timeout_ms(ms as u64)
}

pub(super) async fn scrape(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Response {
    let request = match parse_scrape_request(&body) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };
    let timeout_ms = request.timeout_ms.unwrap_or(state.default_timeout_ms);
    tracing::info!(
        request_id = %req_id.0,
        url = %request.url,
        timeout_ms,
        "scrape requested"
    );

    let mut slot = state.page.lock().await;
    let mut page = match slot.take() {
        Some(page) => page,
        None => match (state.page_factory)() {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(request_id = %req_id.0, error = %e, "could not open page");
                return ApiError::internal(e.to_string()).into_response();
            }
        },
    };

    let result = state
        .pipeline
        .scrape(
            page.as_mut(),
            &request.url,
            Duration::from_millis(timeout_ms),
        )
        .await;
    *slot = Some(page);
    drop(slot);

    tracing::info!(
        request_id = %req_id.0,
        success = result.success,
        tier = %result.tier,
        vehicles = result.vehicles.len(),
        "scrape finished"
    );
    Json(result).into_response()
}

pub(super) async fn close(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let closed = state.page.lock().await.take().is_some();
    tracing::info!(request_id = %req_id.0, closed, "page closed");
    Json(CloseData { status: "closed" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotscan_core::{MAX_PAGE_LOAD_TIMEOUT_MS, MIN_PAGE_LOAD_TIMEOUT_MS};

    #[test]
    fn numeric_timeouts_are_clamped() {
        let parse = |body: &str| parse_scrape_request(body.as_bytes()).expect("valid request");

        assert_eq!(
            parse(r#"{"url": "https://a.example", "timeout": 1}"#).timeout_ms,
            Some(MIN_PAGE_LOAD_TIMEOUT_MS)
        );
        assert_eq!(
            parse(r#"{"url": "https://a.example", "timeout": 999999999}"#).timeout_ms,
            Some(MAX_PAGE_LOAD_TIMEOUT_MS)
        );
        assert_eq!(
            parse(r#"{"url": "https://a.example", "timeout": 45000.7}"#).timeout_ms,
            Some(45_000)
        );
        assert_eq!(
            parse(r#"{"url": "https://a.example", "timeout": -20}"#).timeout_ms,
            Some(MIN_PAGE_LOAD_TIMEOUT_MS)
        );
    }

    #[test]
    fn non_numeric_timeout_is_ignored() {
        let request =
            parse_scrape_request(br#"{"url": "https://a.example", "timeout": "60000"}"#)
                .expect("valid request");
        assert_eq!(request.timeout_ms, None);
        assert_eq!(request.url, "https://a.example");
    }

    #[test]
    fn blank_url_is_rejected() {
        assert!(parse_scrape_request(br#"{"url": "   "}"#).is_err());
        assert!(parse_scrape_request(b"[]").is_err());
        assert!(parse_scrape_request(b"").is_err());
    }
}
