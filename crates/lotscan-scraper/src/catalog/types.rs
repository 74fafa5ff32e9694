//! Shapes of the storefront `products.json` payload.
//!
//! Dealer stores fill these inconsistently, so everything but the
//! collections is optional. `variants[].price` is a decimal string on most
//! stores (`"24999.00"`) and a bare number on a few, hence the raw `Value`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level shape used to split a payload into individually decoded
/// products. A product that fails to decode must not sink its siblings.
#[derive(Debug, Deserialize)]
pub struct CatalogEnvelope {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub products: Vec<Value>,
}

/// A single storefront product (a vehicle listing on dealer stores).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogProduct {
    #[serde(default)]
    pub id: Option<i64>,

    /// Listing title, typically `"2021 Toyota Camry SE 45,000 miles"`.
    #[serde(default)]
    pub title: Option<String>,

    /// URL slug for the product page.
    #[serde(default)]
    pub handle: Option<String>,

    /// Raw HTML description; often the only place mileage and VIN appear.
    #[serde(default)]
    pub body_html: Option<String>,

    #[serde(default)]
    pub published_at: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub variants: Vec<CatalogVariant>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<CatalogImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogVariant {
    #[serde(default)]
    pub price: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogImage {
    #[serde(default)]
    pub src: Option<String>,
}

/// Reads an explicit `null` list the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A catalog response that carried at least one product.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPayload {
    /// Origin the catalog was fetched from; used to build detail URLs.
    pub origin: String,
    /// Endpoint that answered.
    pub source_url: String,
    /// Undecoded products, in response order.
    pub products: Vec<Value>,
}
