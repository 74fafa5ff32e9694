//! The result envelope returned by one scrape invocation.

use serde::{Deserialize, Serialize};

use crate::vehicle::Vehicle;

/// Which extraction strategy produced the vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Api,
    Structured,
    Selectors,
    Vision,
    None,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Api => write!(f, "api"),
            Tier::Structured => write!(f, "structured"),
            Tier::Selectors => write!(f, "selectors"),
            Tier::Vision => write!(f, "vision"),
            Tier::None => write!(f, "none"),
        }
    }
}

/// Coarse reliability label attached to a tier's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Outcome of a single scrape. Built once by the pipeline and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    pub vehicles: Vec<Vehicle>,
    pub tier: Tier,
    pub confidence: Confidence,
    pub pages_scraped: u32,
    /// Wall-clock milliseconds from the start of page interaction.
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// A successful single-page extraction.
    #[must_use]
    pub fn succeeded(
        vehicles: Vec<Vehicle>,
        tier: Tier,
        confidence: Confidence,
        duration_ms: u64,
    ) -> Self {
        Self {
            success: true,
            vehicles,
            tier,
            confidence,
            pages_scraped: 1,
            duration_ms,
            error: None,
        }
    }

    /// A failed extraction. `pages_scraped` is `1` when the page loaded but
    /// no tier produced vehicles, `0` when the page itself was unusable.
    #[must_use]
    pub fn failed(error: impl Into<String>, pages_scraped: u32, duration_ms: u64) -> Self {
        Self {
            success: false,
            vehicles: Vec::new(),
            tier: Tier::None,
            confidence: Confidence::Low,
            pages_scraped,
            duration_ms,
            error: Some(error.into()),
        }
    }
}
