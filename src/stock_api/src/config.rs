//! Service configuration: TOML file, defaults and environment overrides.
//!
//! Every section and key is optional; an absent file means all defaults.
//! After parsing, a fixed set of environment variables may override
//! individual values (see [`AppConfig::apply_env_overrides`]).
//!
//! ```toml
//! [server]
//! bind_addr = "127.0.0.1:8080"
//!
//! [yahoo_finance]
//! timeout_seconds = 10
//! requests_per_minute = 30
//!
//! [cache]
//! sliding_expiration_secs = 600
//!
//! [logging]
//! filter = "stock_api=debug,info"
//! json = true
//! ```

use std::{num::NonZeroU32, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared_utils::env::{get_env_var_opt, parse_env_var};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_REQUESTS_PER_MINUTE: NonZeroU32 = NonZeroU32::new(60).unwrap();
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15 * 60;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub yahoo_finance: YahooFinanceConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the HTTP server listens on.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Settings for the Yahoo Finance chart API client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YahooFinanceConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Whole-request timeout, in seconds.
    pub timeout_seconds: u64,
    /// Outbound request budget shared by all callers of one provider.
    pub requests_per_minute: NonZeroU32,
}

impl Default for YahooFinanceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Idle time after which a cached response is dropped.
    pub sliding_expiration_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sliding_expiration_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.sliding_expiration_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Overrides file values with any of these environment variables:
    ///
    /// - `STOCK_API_BIND_ADDR`
    /// - `YAHOO_FINANCE_BASE_URL`
    /// - `YAHOO_FINANCE_USER_AGENT`
    /// - `YAHOO_FINANCE_TIMEOUT_SECONDS`
    /// - `STOCK_API_CACHE_TTL_SECS`
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Some(addr) = get_env_var_opt("STOCK_API_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(url) = get_env_var_opt("YAHOO_FINANCE_BASE_URL") {
            self.yahoo_finance.base_url = url;
        }
        if let Some(agent) = get_env_var_opt("YAHOO_FINANCE_USER_AGENT") {
            self.yahoo_finance.user_agent = agent;
        }
        if let Some(secs) = parse_env_var("YAHOO_FINANCE_TIMEOUT_SECONDS")? {
            self.yahoo_finance.timeout_seconds = secs;
        }
        if let Some(secs) = parse_env_var("STOCK_API_CACHE_TTL_SECS")? {
            self.cache.sliding_expiration_secs = secs;
        }
        Ok(())
    }
}

/// Parse a configuration from a TOML string.
pub fn load_config_str(s: &str) -> anyhow::Result<AppConfig> {
    toml::from_str(s).context("parse stock api config")
}

/// Read and parse a configuration file from disk.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<AppConfig> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    load_config_str(&s).with_context(|| format!("load config file: {}", path.display()))
}

/// Load the config file if one is given, else defaults, then apply env overrides.
pub fn load(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut config = match path {
        Some(p) => load_config_path(p)?,
        None => AppConfig::default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}
