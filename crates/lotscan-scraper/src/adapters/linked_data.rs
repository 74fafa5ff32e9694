//! JSON-LD blocks → [`RawAttributeBag`]s.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use crate::outcome::SkipReason;
use crate::raw::{resolve_field, RawAttributeBag};

static LD_JSON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector")
});

/// Schema.org types treated as a vehicle listing.
pub const VEHICLE_TYPES: &[&str] = &["Car", "Vehicle", "Product"];

/// Returns the parsed contents of every `application/ld+json` script block,
/// in document order. Blocks that are empty or not JSON come back as
/// [`SkipReason::Malformed`].
#[must_use]
pub fn linked_data_blocks(page_source: &str) -> Vec<Result<Value, SkipReason>> {
    let document = Html::parse_document(page_source);
    document
        .select(&LD_JSON_SELECTOR)
        .map(|script| {
            let text = script.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() {
                return Err(SkipReason::Malformed("empty ld+json block".to_string()));
            }
            serde_json::from_str::<Value>(text)
                .map_err(|e| SkipReason::Malformed(format!("ld+json block: {e}")))
        })
        .collect()
}

/// Flattens a block into its candidate entries: arrays yield their elements
/// and objects carrying an `@graph` array yield the graph members.
#[must_use]
pub fn linked_data_entries(block: &Value) -> Vec<&Value> {
    match block {
        Value::Array(items) => items.iter().flat_map(linked_data_entries).collect(),
        Value::Object(map) => match map.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph.iter().flat_map(linked_data_entries).collect(),
            None => vec![block],
        },
        _ => Vec::new(),
    }
}

/// Reports whether an entry's `@type` (a string or a list of strings) names
/// one of [`VEHICLE_TYPES`].
#[must_use]
pub fn is_vehicle_entry(entry: &Value) -> bool {
    match entry.get("@type") {
        Some(Value::String(kind)) => VEHICLE_TYPES.contains(&kind.as_str()),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| VEHICLE_TYPES.contains(&kind)),
        _ => false,
    }
}

/// Maps one vehicle entry to a bag.
#[must_use]
pub fn linked_data_bag(entry: &Value) -> RawAttributeBag {
    RawAttributeBag {
        year: resolve_field(entry, "vehicleModelDate", "value")
            .or_else(|| resolve_field(entry, "modelDate", "value")),
        make: resolve_field(entry, "brand", "name"),
        model: resolve_field(entry, "model", "name").or_else(|| resolve_field(entry, "name", "name")),
        price: resolve_field(entry, "offers", "price"),
        mileage: resolve_field(entry, "mileageFromOdometer", "value"),
        vin: resolve_field(entry, "vehicleIdentificationNumber", "value"),
        image_url: resolve_field(entry, "image", "url"),
        detail_url: resolve_field(entry, "url", "url"),
        listing_date: None,
        stock_number: resolve_field(entry, "sku", "value"),
        title: resolve_field(entry, "name", "name"),
    }
}
