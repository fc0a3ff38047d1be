use crate::domain::aggregation::DEFAULT_RECENT_DEALS;
use crate::domain::page::MAX_PAGE_LIMIT;
use serde::Deserialize;

/// Service configuration.
///
/// Read from `config/crm.{toml,yaml,json}` when present, then overridden by
/// `CRM__SECTION__KEY` environment variables (e.g. `CRM__API__BASE_URL`).
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub dashboard: DashboardSettings,
    pub cache: CacheSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>`.
    pub token: Option<String>,
    /// Sent verbatim as the `Cookie` header, for session-based deployments.
    pub session_cookie: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/api".to_string(),
            token: None,
            session_cookie: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub page_limit: u32,
    pub recent_deals: usize,
    pub fetch_timeout_secs: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            page_limit: MAX_PAGE_LIMIT,
            recent_deals: DEFAULT_RECENT_DEALS,
            fetch_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheSettings {
    pub max_capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_capacity: 256,
            ttl_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            anyhow::bail!("api.base_url must be an http(s) URL, got '{}'", self.api.base_url);
        }
        if self.api.timeout_secs == 0 || self.dashboard.fetch_timeout_secs == 0 {
            anyhow::bail!("timeouts must be at least one second");
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&self.dashboard.page_limit) {
            anyhow::bail!("dashboard.page_limit must be between 1 and {}", MAX_PAGE_LIMIT);
        }
        Ok(())
    }
}

pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/crm").required(false))
        .add_source(config::Environment::with_prefix("CRM").separator("__"))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
