//! Loosely typed intermediate records produced by source adapters.

use serde_json::{Map, Value};

/// Attribute bag filled by a source adapter before canonicalization.
///
/// Every field is the raw text the source offered for it; nothing is parsed
/// or validated yet. Bags never leave the tier that built them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAttributeBag {
    pub year: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub price: Option<String>,
    pub mileage: Option<String>,
    pub vin: Option<String>,
    pub image_url: Option<String>,
    pub detail_url: Option<String>,
    pub listing_date: Option<String>,
    pub stock_number: Option<String>,
    pub title: Option<String>,
}

/// A source field whose JSON shape varies between sites.
///
/// `brand` may be `"Honda"` or `{"name": "Honda"}`, `offers` an object or an
/// array, `image` a string or a list. Arrays collapse to their first element
/// and numbers/booleans become scalars, so adapters only ever deal with
/// these two cases.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    Scalar(String),
    Nested(Map<String, Value>),
}

impl FieldShape {
    /// Classifies a JSON value. Returns `None` for `null`, empty strings and
    /// empty arrays.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| FieldShape::Scalar(trimmed.to_string()))
            }
            Value::Number(n) => Some(FieldShape::Scalar(n.to_string())),
            Value::Bool(b) => Some(FieldShape::Scalar(b.to_string())),
            Value::Array(items) => items.first().and_then(FieldShape::from_value),
            Value::Object(map) => Some(FieldShape::Nested(map.clone())),
        }
    }

    /// Resolves to a single scalar: a scalar is returned as-is, a nested
    /// mapping is looked up under `key` (recursively, so
    /// `{"offers": {"price": {"value": 1}}}`-style nesting also resolves).
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<String> {
        match self {
            FieldShape::Scalar(s) => Some(s.clone()),
            FieldShape::Nested(map) => map
                .get(key)
                .and_then(FieldShape::from_value)
                .and_then(|inner| inner.resolve(key)),
        }
    }
}

/// Reads `key` from a JSON object and resolves it through [`FieldShape`].
pub(crate) fn resolve_field(item: &Value, key: &str, nested_key: &str) -> Option<String> {
    item.get(key)
        .and_then(FieldShape::from_value)
        .and_then(|shape| shape.resolve(nested_key))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn string_and_object_brand_resolve_to_same_scalar() {
        let bare = FieldShape::from_value(&json!("Honda")).unwrap();
        let nested = FieldShape::from_value(&json!({"@type": "Brand", "name": "Honda"})).unwrap();
        assert_eq!(bare.resolve("name").as_deref(), Some("Honda"));
        assert_eq!(nested.resolve("name").as_deref(), Some("Honda"));
    }

    #[test]
    fn arrays_collapse_to_first_element() {
        let shape = FieldShape::from_value(&json!([{"price": "18000"}, {"price": "1"}])).unwrap();
        assert_eq!(shape.resolve("price").as_deref(), Some("18000"));
    }

    #[test]
    fn numbers_become_scalars() {
        let shape = FieldShape::from_value(&json!(42_000)).unwrap();
        assert_eq!(shape, FieldShape::Scalar("42000".to_string()));
    }

    #[test]
    fn empty_values_are_absent() {
        assert!(FieldShape::from_value(&json!(null)).is_none());
        assert!(FieldShape::from_value(&json!("  ")).is_none());
        assert!(FieldShape::from_value(&json!([])).is_none());
    }

    #[test]
    fn nested_without_key_resolves_to_none() {
        let shape = FieldShape::from_value(&json!({"unitCode": "SMI"})).unwrap();
        assert_eq!(shape.resolve("value"), None);
    }

    #[test]
    fn resolve_field_reads_nested_value() {
        let item = json!({"mileageFromOdometer": {"value": 25000, "unitCode": "SMI"}});
        assert_eq!(
            resolve_field(&item, "mileageFromOdometer", "value").as_deref(),
            Some("25000")
        );
    }
}
