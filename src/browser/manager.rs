use super::config::BrowserConfig;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;

/// Owns the Chrome process and hands out tabs.
///
/// Constructed once at startup and injected wherever a tab is needed; there
/// is deliberately no global browser singleton.
pub struct BrowserManager {
    browser: Arc<Browser>,
    config: BrowserConfig,
}

impl BrowserManager {
    pub fn new(config: BrowserConfig) -> Result<Self, BrowserError> {
        let browser = Self::launch(&config)?;

        Ok(Self {
            browser: Arc::new(browser),
            config,
        })
    }

    fn launch(config: &BrowserConfig) -> Result<Browser, BrowserError> {
        let user_agent_arg = config
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));

        let mut args: Vec<&OsStr> = config
            .chrome_flags
            .iter()
            .map(|flag| OsStr::new(flag.as_str()))
            .collect();
        if let Some(ref ua) = user_agent_arg {
            args.push(OsStr::new(ua));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .idle_browser_timeout(config.idle_timeout())
            .args(args)
            .build()
            .map_err(|e| BrowserError::Configuration(e.to_string()))?;

        Browser::new(launch_options).map_err(|e| BrowserError::Initialization(e.to_string()))
    }

    /// Create a fresh tab for one scraping request.
    pub fn new_tab(&self) -> Result<Arc<Tab>, BrowserError> {
        self.browser
            .new_tab()
            .map_err(|e| BrowserError::TabCreation(e.to_string()))
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }
}

/// Errors that can occur during browser operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("browser initialization failed: {0}")]
    Initialization(String),

    #[error("browser configuration error: {0}")]
    Configuration(String),

    #[error("tab creation failed: {0}")]
    TabCreation(String),

    #[error("navigation error: {0}")]
    Navigation(String),

    #[error("timeout waiting for: {0}")]
    Timeout(String),

    #[error("HTML extraction error: {0}")]
    HtmlExtraction(String),
}
