use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::browser::BrowserConfig;

/// Application configuration, loaded from `config.toml` next to the binary.
/// Every field has a default so a missing or partial file still boots a
/// working service.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub challenge: ChallengeConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrowserSettings {
    /// Headless mode; disable locally to watch the challenge run
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Navigation / selector-wait timeout in seconds
    #[serde(default = "default_browser_timeout")]
    pub timeout_secs: u64,

    /// Idle lifetime of the shared Chrome process in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// User agent override; empty string keeps Chrome's own
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChallengeConfig {
    /// Poll rounds after the first check; -1 retries until the challenge
    /// clears or the tab dies
    #[serde(default = "default_max_retries")]
    pub max_retries: i32,

    /// Delay between poll rounds in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long a successful profile may be served from cache, in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_true() -> bool {
    true
}
fn default_browser_timeout() -> u64 {
    60
}
fn default_idle_timeout() -> u64 {
    3600
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string()
}
fn default_max_retries() -> i32 {
    5
}
fn default_poll_interval() -> u64 {
    2000
}
fn default_cache_ttl() -> u64 {
    600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: default_browser_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_cache_ttl(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                match toml::from_str::<Config>(&content) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("config.toml is invalid, using defaults: {}", e),
                }
            }
        }
        Self::default()
    }
}

impl BrowserSettings {
    /// Launch configuration for the shared browser, stealth flags included.
    pub fn to_browser_config(&self) -> BrowserConfig {
        let mut config = BrowserConfig::stealth_mode();
        config.headless = self.headless;
        config.timeout_seconds = self.timeout_secs;
        config.idle_timeout_seconds = self.idle_timeout_secs;
        config.user_agent = if self.user_agent.is_empty() {
            None
        } else {
            Some(self.user_agent.clone())
        };
        config
    }
}

impl ChallengeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
