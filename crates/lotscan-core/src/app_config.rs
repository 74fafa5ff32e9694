use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Default page-load timeout, already clamped to the accepted range.
    pub page_load_timeout_ms: u64,
    /// Pause after navigation so client-side inventory widgets can render.
    pub settle_delay_ms: u64,
    /// Per-candidate timeout for catalog API requests. Never above 10.
    pub api_fetch_timeout_secs: u64,
    pub user_agent: String,
    pub vision_api_key: Option<String>,
    pub vision_api_url: String,
    pub vision_model: String,
    pub vision_max_tokens: u32,
    pub vision_timeout_secs: u64,
    /// Decoded screenshot size above which the vision tier is skipped.
    pub max_screenshot_bytes: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("page_load_timeout_ms", &self.page_load_timeout_ms)
            .field("settle_delay_ms", &self.settle_delay_ms)
            .field("api_fetch_timeout_secs", &self.api_fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "vision_api_key",
                &self.vision_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("vision_api_url", &self.vision_api_url)
            .field("vision_model", &self.vision_model)
            .field("vision_max_tokens", &self.vision_max_tokens)
            .field("vision_timeout_secs", &self.vision_timeout_secs)
            .field("max_screenshot_bytes", &self.max_screenshot_bytes)
            .finish()
    }
}
