//! End-to-end profile fetch: tab, navigation, challenge, extraction.

use std::time::Instant;

use crate::browser::{BrowserError, BrowserManager};
use crate::challenge::{ChallengeResolver, TabPage};
use crate::config::ChallengeConfig;
use crate::extractor::ProfileExtractor;
use crate::models::PlayerProfile;

const PROFILE_URL_BASE: &str = "https://warthunder.com/en/community/userinfo/?nick=";

/// Container that only renders once the real profile page is up; waited on
/// after the challenge clears so extraction sees a finished document.
const STATS_CONTAINER_SELECTOR: &str = "#GCM-Container";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("challenge not cleared after {attempts} attempts")]
    ChallengeFailed { attempts: u32 },
}

/// Fetches and extracts one player profile per call.
///
/// Holds no per-request state: each call gets its own tab and its own HTML
/// snapshot, so concurrent requests only share the browser process itself.
pub struct ProfileService {
    browser: BrowserManager,
    resolver: ChallengeResolver,
    extractor: ProfileExtractor,
    max_retries: i32,
}

impl ProfileService {
    pub fn new(browser: BrowserManager, challenge: &ChallengeConfig) -> Self {
        Self {
            browser,
            resolver: ChallengeResolver::with_poll_interval(challenge.poll_interval()),
            extractor: ProfileExtractor::new(),
            max_retries: challenge.max_retries,
        }
    }

    /// Navigates to the player's profile, clears the challenge and extracts
    /// the statistics record.
    ///
    /// Blocking (navigation, challenge polling); run it on a blocking thread
    /// when serving async requests. A spent challenge budget comes back as
    /// `ServiceError::ChallengeFailed`; extraction problems never error, they
    /// are encoded in the returned profile's `code`.
    pub fn fetch_profile(&self, nickname: &str) -> Result<PlayerProfile, ServiceError> {
        let started = Instant::now();
        let url = format!("{}{}", PROFILE_URL_BASE, nickname);
        log::info!("fetching profile for {:?}", nickname);

        let tab = self.browser.new_tab()?;
        let result = self.fetch_on_tab(&tab, &url);
        if let Err(e) = tab.close(true) {
            log::debug!("tab close failed: {}", e);
        }

        match &result {
            Ok(profile) => log::info!(
                "profile for {:?} finished with code {} in {:?}",
                nickname,
                profile.code,
                started.elapsed()
            ),
            Err(e) => log::warn!("profile fetch for {:?} failed: {}", nickname, e),
        }
        result
    }

    fn fetch_on_tab(
        &self,
        tab: &std::sync::Arc<headless_chrome::Tab>,
        url: &str,
    ) -> Result<PlayerProfile, ServiceError> {
        tab.navigate_to(url)
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;
        tab.wait_until_navigated()
            .map_err(|e| BrowserError::Navigation(e.to_string()))?;

        let page = TabPage::new(tab.clone());
        let outcome = self.resolver.bypass(&page, self.max_retries);
        if !outcome.success {
            return Err(ServiceError::ChallengeFailed {
                attempts: outcome.attempts,
            });
        }

        // Not-found pages never render the container; extraction sorts that
        // out from the HTML, so the wait is best-effort only.
        let timeout = self.browser.config().timeout();
        if let Err(e) = tab.wait_for_element_with_custom_timeout(STATS_CONTAINER_SELECTOR, timeout)
        {
            log::warn!("statistics container did not appear: {}", e);
        }

        let html = tab
            .get_content()
            .map_err(|e| BrowserError::HtmlExtraction(e.to_string()))?;

        Ok(self.extractor.extract(&html))
    }
}
