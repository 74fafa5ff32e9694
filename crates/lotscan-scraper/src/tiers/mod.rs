//! The four extraction tiers, cheapest and most reliable first.
//!
//! Each tier pairs a detection step and a source adapter with the
//! canonicalizer, and reports a [`StepOutcome`](crate::outcome::StepOutcome)
//! the orchestrator escalates on.

mod api;
mod selectors;
mod structured;
mod vision;

use lotscan_core::{Confidence, Tier};

pub use api::run_api_tier;
pub use selectors::{run_selector_tier, LISTING_SELECTORS, MAX_CARDS, MIN_CARD_MATCHES};
pub use structured::run_structured_tier;
pub use vision::run_vision_tier;

/// Confidence label attached to vehicles produced by `tier`.
#[must_use]
pub const fn tier_confidence(tier: Tier) -> Confidence {
    match tier {
        Tier::Api | Tier::Structured => Confidence::High,
        Tier::Selectors | Tier::Vision => Confidence::Medium,
        Tier::None => Confidence::Low,
    }
}
