//! Screenshot reading through a vision model.

mod anthropic;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ScraperError;
use crate::outcome::SkipReason;
use crate::raw::{resolve_field, RawAttributeBag};

pub use anthropic::AnthropicVisionClient;

/// Instruction sent with every screenshot.
pub const VISION_PROMPT: &str = r#"Analyze this car dealership website screenshot and extract vehicle inventory data.

Return ONLY valid JSON (no markdown, no code blocks) in this exact format:
{
  "vehicles": [
    {
      "year": 2020,
      "make": "Toyota",
      "model": "Camry",
      "price": 25000,
      "mileage": 35000,
      "stock_number": "ABC123"
    }
  ]
}

Requirements:
- Only include actual vehicles you can clearly see
- Year must be 1990-2025
- Price must be reasonable ($1000-$200000)
- Mileage must be reasonable (100-500000)
- If you can't find vehicles, return {"vehicles": []}
"#;

/// A model that reads an image and answers a text prompt.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Sends a base64-encoded PNG with `prompt` and returns the model's text
    /// reply.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] / [`ScraperError::UnexpectedStatus`] on
    /// transport failures and [`ScraperError::VisionReply`] when the
    /// response carries no text.
    async fn describe(&self, image_base64: &str, prompt: &str) -> Result<String, ScraperError>;
}

/// Removes a surrounding Markdown code fence (```` ```json ```` or
/// ```` ``` ````) from a model reply.
#[must_use]
pub fn strip_code_fence(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parses a vision reply into one bag per listed vehicle.
///
/// # Errors
///
/// Returns [`ScraperError::VisionReply`] when the reply is not JSON or has
/// no `vehicles` array. Individual non-object entries are reported inline
/// as [`SkipReason::Malformed`].
pub fn parse_vision_reply(reply: &str) -> Result<Vec<Result<RawAttributeBag, SkipReason>>, ScraperError> {
    let body = strip_code_fence(reply);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ScraperError::VisionReply(format!("reply is not JSON: {e}")))?;
    let entries = value
        .get("vehicles")
        .and_then(Value::as_array)
        .ok_or_else(|| ScraperError::VisionReply("reply has no vehicles array".to_string()))?;

    Ok(entries
        .iter()
        .map(|entry| {
            if entry.is_object() {
                Ok(vision_entry_bag(entry))
            } else {
                Err(SkipReason::Malformed(format!("vision entry is not an object: {entry}")))
            }
        })
        .collect())
}

fn vision_entry_bag(entry: &Value) -> RawAttributeBag {
    let field = |key: &str| resolve_field(entry, key, "value");
    RawAttributeBag {
        year: field("year"),
        make: field("make"),
        model: field("model"),
        price: field("price"),
        mileage: field("mileage"),
        vin: field("vin"),
        image_url: field("image_url"),
        detail_url: field("detail_url"),
        listing_date: field("listing_date"),
        stock_number: field("stock_number"),
        title: field("title"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_code_fence_handles_tagged_and_bare_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn parse_vision_reply_maps_entries() {
        let reply = "```json\n{\"vehicles\": [{\"year\": 2020, \"make\": \"Toyota\", \"model\": \"Camry\", \"price\": 25000, \"mileage\": 35000, \"stock_number\": \"ABC123\"}, \"junk\"]}\n```";
        let entries = parse_vision_reply(reply).unwrap();
        assert_eq!(entries.len(), 2);
        let bag = entries[0].as_ref().unwrap();
        assert_eq!(bag.year.as_deref(), Some("2020"));
        assert_eq!(bag.price.as_deref(), Some("25000"));
        assert_eq!(bag.stock_number.as_deref(), Some("ABC123"));
        assert!(matches!(entries[1], Err(SkipReason::Malformed(_))));
    }

    #[test]
    fn parse_vision_reply_rejects_prose_and_missing_array() {
        assert!(matches!(
            parse_vision_reply("I could not find any vehicles."),
            Err(ScraperError::VisionReply(_))
        ));
        assert!(matches!(
            parse_vision_reply("{\"cars\": []}"),
            Err(ScraperError::VisionReply(_))
        ));
    }

    #[test]
    fn empty_vehicle_list_parses_to_no_entries() {
        assert!(parse_vision_reply("{\"vehicles\": []}").unwrap().is_empty());
    }
}
