use crate::adapters::catalog_product_bag;
use crate::canonicalize::{canonicalize, RetentionRule};
use crate::catalog::{CatalogPayload, CatalogProduct};
use crate::outcome::{ItemOutcome, SkipReason, StepOutcome, TierOutput};

/// Tier 1: turns a fetched storefront catalog into vehicles.
///
/// Products are decoded one at a time so a single malformed entry is
/// skipped without affecting the rest.
#[must_use]
pub fn run_api_tier(payload: &CatalogPayload) -> StepOutcome<TierOutput> {
    let items = payload.products.iter().enumerate().map(|(index, raw)| {
        let outcome = match serde_json::from_value::<CatalogProduct>(raw.clone()) {
            Ok(product) => canonicalize(
                catalog_product_bag(&product, &payload.origin),
                RetentionRule::YearOrMake,
            ),
            Err(e) => ItemOutcome::Skipped(SkipReason::Malformed(e.to_string())),
        };
        match &outcome {
            ItemOutcome::Parsed(vehicle) => {
                tracing::debug!(
                    vehicle = %vehicle.label(),
                    vin = vehicle.vin.as_deref().unwrap_or("none"),
                    "catalog product parsed"
                );
            }
            ItemOutcome::Skipped(reason) => {
                tracing::debug!(index, %reason, "catalog product skipped");
            }
        }
        outcome
    });

    let output = TierOutput::from_items(items);
    tracing::info!(
        products = payload.products.len(),
        vehicles = output.vehicles.len(),
        skipped = output.skipped.len(),
        "api tier finished"
    );
    output.into_outcome()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn payload(products: Vec<serde_json::Value>) -> CatalogPayload {
        CatalogPayload {
            origin: "https://dealer.example.com".to_string(),
            source_url: "https://dealer.example.com/products.json".to_string(),
            products,
        }
    }

    #[test]
    fn camry_product_becomes_high_quality_vehicle() {
        let outcome = run_api_tier(&payload(vec![json!({
            "id": 555,
            "title": "2021 Toyota Camry 45,000 miles",
            "handle": "camry",
            "variants": [{"price": "24999.00"}]
        })]));
        let output = outcome.found().expect("vehicle expected");
        let vehicle = &output.vehicles[0];
        assert_eq!(vehicle.year, Some(2021));
        assert_eq!(vehicle.make.as_deref(), Some("Toyota"));
        assert_eq!(vehicle.model.as_deref(), Some("CAMRY"));
        assert_eq!(vehicle.price, Some(Decimal::from(24_999)));
        assert_eq!(vehicle.mileage, Some(45_000));
        assert_eq!(
            vehicle.detail_url.as_deref(),
            Some("https://dealer.example.com/products/camry")
        );
        assert_eq!(vehicle.stock_number.as_deref(), Some("555"));
    }

    #[test]
    fn malformed_and_unidentifiable_products_are_skipped_individually() {
        let output = run_api_tier(&payload(vec![
            json!({"id": "not-a-number", "title": "2020 Ford F-150"}),
            json!({"id": 2, "title": "Gift card", "variants": [{"price": "50.00"}]}),
            json!({"id": 3, "title": "2019 Honda Civic"}),
        ]))
        .found()
        .expect("the Civic survives");
        assert_eq!(output.vehicles.len(), 1);
        assert_eq!(output.vehicles[0].make.as_deref(), Some("Honda"));
        assert_eq!(output.skipped.len(), 2);
        assert!(matches!(output.skipped[0], SkipReason::Malformed(_)));
        assert_eq!(output.skipped[1], SkipReason::NoIdentifyingSignal);
    }

    #[test]
    fn null_variants_and_images_keep_the_vehicle() {
        let output = run_api_tier(&payload(vec![json!({
            "id": 1,
            "title": "2019 Honda Civic",
            "variants": null,
            "images": null
        })]))
        .found()
        .expect("null lists are treated as empty");
        let civic = &output.vehicles[0];
        assert_eq!(civic.year, Some(2019));
        assert_eq!(civic.make.as_deref(), Some("Honda"));
        assert!(civic.price.is_none());
        assert!(civic.image_url.is_none());
        assert!(output.skipped.is_empty());
    }

    #[test]
    fn no_retained_products_is_not_found() {
        let outcome = run_api_tier(&payload(vec![json!({"title": "Gift card"})]));
        assert_eq!(outcome, StepOutcome::NotFound);
    }

    #[test]
    fn parsing_is_idempotent() {
        let p = payload(vec![json!({"id": 9, "title": "2018 Jeep Wrangler 30,000 mi"})]);
        assert_eq!(run_api_tier(&p), run_api_tier(&p));
    }
}
