pub mod adapters;
pub mod canonicalize;
pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod fields;
pub mod outcome;
pub mod page;
pub mod pipeline;
pub mod raw;
pub mod tiers;
pub mod vision;

pub use catalog::{CatalogFetcher, ReqwestFetcher};
pub use diagnostics::{BlockIndicators, Diagnostics};
pub use error::ScraperError;
pub use outcome::{ItemOutcome, SkipReason, StepOutcome, TierOutput};
pub use page::{PageElement, PageError, PageHandle, StaticPage};
pub use pipeline::{Pipeline, PipelineSettings, ScrapeReport, Stage};
pub use vision::{AnthropicVisionClient, VisionClient};
