mod app_config;
mod config;
pub mod extraction;
pub mod vehicle;

pub use app_config::{AppConfig, Environment};
pub use config::{
    clamp_page_load_timeout_ms, load_app_config, load_app_config_from_env, MAX_PAGE_LOAD_TIMEOUT_MS,
    MIN_PAGE_LOAD_TIMEOUT_MS,
};
pub use extraction::{Confidence, ExtractionResult, Tier};
pub use vehicle::Vehicle;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
