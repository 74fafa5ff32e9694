use crate::canonicalize::{canonicalize, RetentionRule};
use crate::outcome::{ItemOutcome, StepOutcome, TierOutput};
use crate::page::{PageError, PageHandle};
use crate::vision::{parse_vision_reply, VisionClient, VISION_PROMPT};

/// Tier 4: asks a vision model to read the rendered page.
///
/// Skipped (`NotFound`) when no client is configured, the page handle cannot
/// take screenshots, or the decoded screenshot would exceed
/// `max_screenshot_bytes`.
pub async fn run_vision_tier(
    page: &dyn PageHandle,
    client: Option<&dyn VisionClient>,
    max_screenshot_bytes: u64,
) -> StepOutcome<TierOutput> {
    let Some(client) = client else {
        tracing::info!("no vision client configured, skipping vision tier");
        return StepOutcome::NotFound;
    };

    let screenshot = match page.screenshot_base64().await {
        Ok(screenshot) => screenshot,
        Err(PageError::Unsupported(what)) => {
            tracing::info!(what, "page handle cannot capture screenshots, skipping vision tier");
            return StepOutcome::NotFound;
        }
        Err(e) => return StepOutcome::TransientError(format!("screenshot failed: {e}")),
    };

    let encoded_len = u64::try_from(screenshot.len()).unwrap_or(u64::MAX);
    if exceeds_screenshot_limit(encoded_len, max_screenshot_bytes) {
        tracing::warn!(
            decoded_bytes = encoded_len.saturating_mul(3) / 4,
            max_screenshot_bytes,
            "screenshot too large, skipping vision tier"
        );
        return StepOutcome::NotFound;
    }

    let reply = match client.describe(&screenshot, VISION_PROMPT).await {
        Ok(reply) => reply,
        Err(e) => return StepOutcome::TransientError(format!("vision request failed: {e}")),
    };

    let entries = match parse_vision_reply(&reply) {
        Ok(entries) => entries,
        Err(e) => return StepOutcome::TransientError(e.to_string()),
    };

    let items = entries.into_iter().map(|entry| match entry {
        Ok(bag) => canonicalize(bag, RetentionRule::YearOrMake),
        Err(reason) => ItemOutcome::Skipped(reason),
    });
    let output = TierOutput::from_items(items);
    tracing::info!(
        vehicles = output.vehicles.len(),
        skipped = output.skipped.len(),
        "vision tier finished"
    );
    output.into_outcome()
}

/// True when `encoded_len` base64 characters decode to more than `max_bytes`
/// (three bytes per four characters).
fn exceeds_screenshot_limit(encoded_len: u64, max_bytes: u64) -> bool {
    encoded_len.saturating_mul(3) > max_bytes.saturating_mul(4)
}
