use crate::adapters::{is_vehicle_entry, linked_data_bag, linked_data_blocks, linked_data_entries};
use crate::canonicalize::{canonicalize, RetentionRule};
use crate::outcome::{ItemOutcome, StepOutcome, TierOutput};

/// Tier 2: vehicles described by JSON-LD blocks in the page source.
#[must_use]
pub fn run_structured_tier(page_source: &str) -> StepOutcome<TierOutput> {
    let mut output = TierOutput::default();
    let blocks = linked_data_blocks(page_source);
    let block_count = blocks.len();

    for block in blocks {
        let block = match block {
            Ok(block) => block,
            Err(reason) => {
                tracing::debug!(%reason, "skipping ld+json block");
                output.skipped.push(reason);
                continue;
            }
        };
        let items = linked_data_entries(&block)
            .into_iter()
            .filter(|entry| is_vehicle_entry(entry))
            .map(|entry| canonicalize(linked_data_bag(entry), RetentionRule::AnyField))
            .inspect(|item| {
                if let ItemOutcome::Skipped(reason) = item {
                    tracing::debug!(%reason, "linked-data entry skipped");
                }
            });
        output.extend(items);
    }

    tracing::info!(
        blocks = block_count,
        vehicles = output.vehicles.len(),
        "structured tier finished"
    );
    output.into_outcome()
}
