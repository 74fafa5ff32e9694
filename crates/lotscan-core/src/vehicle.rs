use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single vehicle listing in canonical form, regardless of which source
/// (catalog API, linked data, DOM text, screenshot) it was read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Model year, e.g. `2021`.
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    /// Asking price. Emitted on the wire as a JSON number.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Odometer reading in miles, always within the plausible mileage range.
    pub mileage: Option<u32>,
    /// 17-character VIN, uppercased, never containing `I`, `O` or `Q`.
    pub vin: Option<String>,
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
    pub listing_date: Option<DateTime<FixedOffset>>,
    pub stock_number: Option<String>,
    pub title: Option<String>,
}

impl Vehicle {
    /// Returns `true` when no field carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Short human-readable label used in log lines, e.g. `"2021 Toyota CAMRY"`.
    #[must_use]
    pub fn label(&self) -> String {
        let year = self.year.map_or_else(|| "?".to_string(), |y| y.to_string());
        format!(
            "{year} {} {}",
            self.make.as_deref().unwrap_or("?"),
            self.model.as_deref().unwrap_or("?")
        )
    }
}
