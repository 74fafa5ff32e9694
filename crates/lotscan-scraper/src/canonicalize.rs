//! Canonicalization from [`RawAttributeBag`] to [`lotscan_core::Vehicle`].
//!
//! Field parsing is delegated to [`crate::fields`]; this module applies the
//! per-field validation rules and the tier's identifying-signal rule.

use chrono::DateTime;
use lotscan_core::Vehicle;

use crate::fields::{extract_year, normalize_vin, parse_mileage_value, parse_price_text};
use crate::outcome::{ItemOutcome, SkipReason};
use crate::raw::RawAttributeBag;

/// Minimum evidence a parsed record needs before it is kept as a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionRule {
    /// Keep when `year` or `make` is present.
    YearOrMake,
    /// Keep when `year` or `price` is present.
    YearOrPrice,
    /// Keep when any field at all survived validation.
    AnyField,
}

impl RetentionRule {
    fn retains(self, vehicle: &Vehicle) -> bool {
        match self {
            RetentionRule::YearOrMake => vehicle.year.is_some() || vehicle.make.is_some(),
            RetentionRule::YearOrPrice => vehicle.year.is_some() || vehicle.price.is_some(),
            RetentionRule::AnyField => !vehicle.is_empty(),
        }
    }
}

/// Normalizes a raw bag into a [`Vehicle`], or explains why it was dropped.
///
/// Invalid individual fields (unparseable price, out-of-range mileage, a VIN
/// of the wrong shape) become absent rather than failing the whole record.
#[must_use]
pub fn canonicalize(bag: RawAttributeBag, rule: RetentionRule) -> ItemOutcome {
    let vehicle = Vehicle {
        year: bag.year.as_deref().and_then(extract_year),
        make: non_empty(bag.make),
        model: non_empty(bag.model),
        price: bag.price.as_deref().and_then(parse_price_text),
        mileage: bag.mileage.as_deref().and_then(parse_mileage_value),
        vin: bag.vin.as_deref().and_then(normalize_vin),
        image_url: non_empty(bag.image_url),
        detail_url: non_empty(bag.detail_url),
        listing_date: bag
            .listing_date
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw.trim()).ok()),
        stock_number: non_empty(bag.stock_number),
        title: non_empty(bag.title),
    };

    if rule.retains(&vehicle) {
        ItemOutcome::Parsed(vehicle)
    } else {
        ItemOutcome::Skipped(SkipReason::NoIdentifyingSignal)
    }
}

/// Trims and drops empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
#[path = "canonicalize_test.rs"]
mod tests;
