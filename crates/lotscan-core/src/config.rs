use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Lower bound for a caller-supplied page-load timeout.
pub const MIN_PAGE_LOAD_TIMEOUT_MS: u64 = 5_000;
/// Upper bound for a caller-supplied page-load timeout.
pub const MAX_PAGE_LOAD_TIMEOUT_MS: u64 = 180_000;

/// Catalog endpoints are probed with a short timeout; longer values are rejected.
const MAX_API_FETCH_TIMEOUT_SECS: u64 = 10;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Clamps a page-load timeout into `[MIN_PAGE_LOAD_TIMEOUT_MS, MAX_PAGE_LOAD_TIMEOUT_MS]`.
#[must_use]
pub fn clamp_page_load_timeout_ms(timeout_ms: u64) -> u64 {
    timeout_ms.clamp(MIN_PAGE_LOAD_TIMEOUT_MS, MAX_PAGE_LOAD_TIMEOUT_MS)
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("LOTSCAN_ENV", "development"));

    let bind_addr = or_default("LOTSCAN_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("LOTSCAN_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("LOTSCAN_LOG_LEVEL", "info");

    let page_load_timeout_ms =
        clamp_page_load_timeout_ms(parse_u64("LOTSCAN_PAGE_LOAD_TIMEOUT_MS", "30000")?);
    let settle_delay_ms = parse_u64("LOTSCAN_SETTLE_DELAY_MS", "2000")?;

    let api_fetch_timeout_secs = parse_u64("LOTSCAN_API_FETCH_TIMEOUT_SECS", "10")?;
    if api_fetch_timeout_secs == 0 || api_fetch_timeout_secs > MAX_API_FETCH_TIMEOUT_SECS {
        return Err(invalid(
            "LOTSCAN_API_FETCH_TIMEOUT_SECS",
            format!("must be between 1 and {MAX_API_FETCH_TIMEOUT_SECS}"),
        ));
    }

    let user_agent = or_default("LOTSCAN_USER_AGENT", DEFAULT_USER_AGENT);

    let vision_api_key = lookup("ANTHROPIC_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());
    let vision_api_url = or_default(
        "LOTSCAN_VISION_API_URL",
        "https://api.anthropic.com/v1/messages",
    );
    let vision_model = or_default("LOTSCAN_VISION_MODEL", "claude-sonnet-4-5-20250929");
    let vision_max_tokens = parse_u32("LOTSCAN_VISION_MAX_TOKENS", "4096")?;
    let vision_timeout_secs = parse_u64("LOTSCAN_VISION_TIMEOUT_SECS", "60")?;
    let max_screenshot_bytes = parse_u64("LOTSCAN_MAX_SCREENSHOT_BYTES", "5242880")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        page_load_timeout_ms,
        settle_delay_ms,
        api_fetch_timeout_secs,
        user_agent,
        vision_api_key,
        vision_api_url,
        vision_model,
        vision_max_tokens,
        vision_timeout_secs,
        max_screenshot_bytes,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
