use std::time::Duration;

/// Configuration for the shared browser instance
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,

    /// Browser window size
    pub window_size: (u32, u32),

    /// Custom user agent
    pub user_agent: Option<String>,

    /// Navigation / selector-wait timeout in seconds
    pub timeout_seconds: u64,

    /// How long the browser may sit idle before headless_chrome reaps it.
    /// A profile service waits on users, so this defaults high.
    pub idle_timeout_seconds: u64,

    /// Additional Chrome flags
    pub chrome_flags: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_size: (1920, 1080),
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                    .to_string(),
            ),
            timeout_seconds: 60,
            idle_timeout_seconds: 3600,
            chrome_flags: vec![],
        }
    }
}

impl BrowserConfig {
    /// Configuration that lowers the automation signal surface. The
    /// challenge vendor fingerprints automation flags aggressively, so this
    /// is the mode the service runs with.
    pub fn stealth_mode() -> Self {
        let mut config = Self::default();
        config.chrome_flags = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--no-sandbox".to_string(),
            "--disable-gpu".to_string(),
        ];
        config
    }

    /// Non-headless configuration for watching the challenge run locally.
    pub fn debug_mode() -> Self {
        let mut config = Self::stealth_mode();
        config.headless = false;
        config
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }
}
