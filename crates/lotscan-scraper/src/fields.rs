//! Stateless extractors that pull typed vehicle fields out of free text.
//!
//! Every function here is pure: the same input always yields the same
//! output, and patterns are compiled once into process-wide statics.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Smallest odometer reading accepted as a real mileage.
pub const MIN_MILEAGE: u32 = 100;
/// Largest odometer reading accepted as a real mileage.
pub const MAX_MILEAGE: u32 = 500_000;

/// Manufacturer names recognised in free-text titles, matched in this order.
pub const KNOWN_MAKES: &[&str] = &[
    "Toyota",
    "Ford",
    "Chevrolet",
    "Honda",
    "Nissan",
    "Jeep",
    "BMW",
    "Mercedes",
    "Audi",
    "Volkswagen",
    "Hyundai",
    "Kia",
    "Mazda",
    "Subaru",
    "GMC",
    "Ram",
    "Dodge",
    "Cadillac",
    "Lexus",
    "Acura",
    "Infiniti",
    "Buick",
    "Chrysler",
];

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"));
static MILEAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,3}(?:,\d{3})+|\d{1,6})\s*(?:miles?|mi)\b").expect("valid regex")
});
static LABELLED_VIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bVIN[:\s#]*([A-HJ-NPR-Z0-9]{17})\b").expect("valid regex")
});
static VIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").expect("valid regex"));
static DOLLAR_PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?)").expect("valid regex")
});
static PRICE_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\$?\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)").expect("valid regex")
});
static MODEL_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s+([A-Z0-9\-]+)").expect("valid regex"));
static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?").expect("valid regex")
});

/// Returns the first 4-digit year starting with `19` or `20`.
#[must_use]
pub fn extract_year(text: &str) -> Option<i32> {
    YEAR_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Returns the first `"<number> miles"` / `"<number> mi"` reading in `text`.
///
/// Readings outside [`MIN_MILEAGE`]..=[`MAX_MILEAGE`] are treated as false
/// positives and yield `None`.
#[must_use]
pub fn extract_mileage(text: &str) -> Option<u32> {
    let caps = MILEAGE_RE.captures(text)?;
    parse_grouped_integer(caps.get(1)?.as_str()).and_then(mileage_in_range)
}

/// Keeps `miles` only when it falls inside the plausible mileage range.
#[must_use]
pub fn mileage_in_range(miles: u32) -> Option<u32> {
    (MIN_MILEAGE..=MAX_MILEAGE).contains(&miles).then_some(miles)
}

/// Parses a loosely formatted mileage value such as `"45,000"`, `"45000"`,
/// `"45000.0"` or `"45,000 mi"`, applying the range check.
#[must_use]
pub fn parse_mileage_value(raw: &str) -> Option<u32> {
    let caps = LEADING_NUMBER_RE.captures(raw)?;
    parse_grouped_integer(caps.get(1)?.as_str()).and_then(mileage_in_range)
}

/// Returns the first `$`-prefixed amount in `text`, e.g. `"$12,500"`.
#[must_use]
pub fn extract_dollar_price(text: &str) -> Option<Decimal> {
    let caps = DOLLAR_PRICE_RE.captures(text)?;
    parse_price_text(caps.get(1)?.as_str())
}

/// Parses a currency-formatted amount (`"$24,999.00"`, `"18000"`, `"24999.00"`).
///
/// Only the leading amount is read, so `"$12,500 (was $14,000)"` yields
/// `12500`. Returns `None` when the text does not start with an amount,
/// which also rules out negative values.
#[must_use]
pub fn parse_price_text(raw: &str) -> Option<Decimal> {
    let caps = PRICE_AMOUNT_RE.captures(raw)?;
    Decimal::from_str(&caps.get(1)?.as_str().replace(',', "")).ok()
}

/// Finds a VIN introduced by a `VIN` label (`"VIN: 1HGCM82633A004352"`).
#[must_use]
pub fn extract_vin(text: &str) -> Option<String> {
    LABELLED_VIN_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
}

/// Validates a bare VIN: exactly 17 characters from `[A-HJ-NPR-Z0-9]` after
/// uppercasing and trimming.
#[must_use]
pub fn normalize_vin(raw: &str) -> Option<String> {
    let upper = raw.trim().to_ascii_uppercase();
    VIN_RE.is_match(&upper).then_some(upper)
}

/// Returns the first [`KNOWN_MAKES`] entry contained in `title`
/// (case-insensitive substring match).
#[must_use]
pub fn detect_make(title: &str) -> Option<&'static str> {
    let lower = title.to_lowercase();
    KNOWN_MAKES
        .iter()
        .find(|make| lower.contains(&make.to_lowercase()))
        .copied()
}

/// Returns the token following `make` in `title`, uppercased
/// (`"2021 Toyota Camry"` → `"CAMRY"`).
///
/// Every case-insensitive occurrence of `make` is tried in order, so
/// `"Rampage Ram 1500"` still finds `"1500"` for `Ram`.
#[must_use]
pub fn extract_model(title: &str, make: &str) -> Option<String> {
    if make.is_empty() {
        return None;
    }
    let lower_title = title.to_ascii_lowercase();
    let lower_make = make.to_ascii_lowercase();
    lower_title.match_indices(&lower_make).find_map(|(start, _)| {
        MODEL_TOKEN_RE
            .captures(&title[start + make.len()..])
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_uppercase())
    })
}

/// Parses `"45,000"` or `"45000"` into an integer.
fn parse_grouped_integer(raw: &str) -> Option<u32> {
    raw.replace(',', "").parse::<u32>().ok()
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod tests;
