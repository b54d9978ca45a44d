//! Anti-bot challenge resolution for a live browser tab.
//!
//! The interstitial either clears on its own after the browser passes the
//! vendor's background checks, or needs its verification checkbox clicked.
//! The resolver polls the page, best-effort clicks the control each round and
//! stops when the "verifying you are human" marker disappears or the retry
//! budget runs out. Expected failure modes never surface as errors; the
//! caller gets an outcome and decides.

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::protocol::cdp::DOM;
use headless_chrome::{Element, Tab};

use crate::dom::{locate_challenge_control, PageNode};

/// Marker string present in the interstitial's HTML while the check runs.
const VERIFICATION_MARKER: &str = "Verifying you are human";

/// Delay between poll rounds.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Retry forever.
pub const UNLIMITED_RETRIES: i32 = -1;

#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("failed to read page content: {0}")]
    Content(String),

    #[error("failed to snapshot page DOM: {0}")]
    Snapshot(String),

    #[error("failed to click verification control: {0}")]
    Click(String),
}

/// The slice of tab behavior the resolver needs. Production code wraps a
/// `headless_chrome` tab; tests substitute a scripted fake.
pub trait ChallengePage {
    /// Current rendered HTML of the page.
    fn content(&self) -> Result<String, ChallengeError>;

    /// Pierced snapshot of the page's DOM, shadow roots and iframes included.
    fn snapshot(&self) -> Result<PageNode, ChallengeError>;

    /// Dispatches a click on a node from the last snapshot.
    fn click(&self, node: &PageNode) -> Result<(), ChallengeError>;
}

/// Outcome of one `bypass` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionOutcome {
    pub success: bool,
    pub attempts: u32,
}

pub struct ChallengeResolver {
    poll_interval: Duration,
}

impl Default for ChallengeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ChallengeResolver {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Polls until the challenge clears or the budget is spent.
    ///
    /// `max_retries == -1` retries indefinitely; `max_retries == N >= 0` caps
    /// the loop at `N + 1` poll rounds. Each round locates and clicks the
    /// verification control on a best-effort basis, sleeps, then re-checks.
    pub fn bypass(&self, page: &impl ChallengePage, max_retries: i32) -> ResolutionOutcome {
        let mut attempts: u32 = 0;
        let mut resolved = self.is_resolved(page);

        while !resolved {
            if max_retries >= 0 && attempts >= max_retries as u32 + 1 {
                log::warn!("challenge still blocking after {} attempts, giving up", attempts);
                break;
            }

            log::info!("challenge attempt {}", attempts + 1);
            self.click_control(page);

            std::thread::sleep(self.poll_interval);
            attempts += 1;
            resolved = self.is_resolved(page);
        }

        if resolved {
            log::info!("challenge cleared after {} attempts", attempts);
        }
        ResolutionOutcome {
            success: resolved,
            attempts,
        }
    }

    /// A page is resolved when the verification marker is gone. A failed read
    /// counts as still blocked, never as an error.
    fn is_resolved(&self, page: &impl ChallengePage) -> bool {
        match page.content() {
            Ok(html) => !html.contains(VERIFICATION_MARKER),
            Err(e) => {
                log::warn!("could not inspect page content: {}", e);
                false
            }
        }
    }

    /// Snapshot, locate, click. Every failure is logged and swallowed: the
    /// control may not exist yet, or may detach between snapshot and click,
    /// and the next round re-locates it anyway.
    fn click_control(&self, page: &impl ChallengePage) {
        let snapshot = match page.snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("could not snapshot page: {}", e);
                return;
            }
        };

        match locate_challenge_control(&snapshot) {
            Some(control) => {
                log::info!("verification control found, clicking");
                if let Err(e) = page.click(control) {
                    log::warn!("verification click failed: {}", e);
                }
            }
            None => log::warn!("verification control not found"),
        }
    }
}

/// [`ChallengePage`] backed by a real tab. Snapshots go through CDP with
/// `pierce` so closed shadow roots and the widget iframe are visible.
pub struct TabPage {
    tab: Arc<Tab>,
}

impl TabPage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }
}

impl ChallengePage for TabPage {
    fn content(&self) -> Result<String, ChallengeError> {
        self.tab
            .get_content()
            .map_err(|e| ChallengeError::Content(e.to_string()))
    }

    fn snapshot(&self) -> Result<PageNode, ChallengeError> {
        let document = self
            .tab
            .call_method(DOM::GetDocument {
                depth: Some(u32::MAX),
                pierce: Some(true),
            })
            .map_err(|e| ChallengeError::Snapshot(e.to_string()))?;
        Ok(PageNode::from_cdp(&document.root))
    }

    fn click(&self, node: &PageNode) -> Result<(), ChallengeError> {
        let element = Element::new(&self.tab, node.node_id)
            .map_err(|e| ChallengeError::Click(e.to_string()))?;
        element
            .click()
            .map_err(|e| ChallengeError::Click(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PageNode;
    use std::sync::Mutex;

    /// Scripted page: serves canned HTML responses in order and counts calls.
    struct FakePage {
        contents: Mutex<Vec<&'static str>>,
        snapshot_calls: Mutex<u32>,
        click_calls: Mutex<u32>,
        snapshot: PageNode,
    }

    const BLOCKED: &str = "<html><body>Verifying you are human</body></html>";
    const CLEARED: &str = "<html><body>profile content</body></html>";

    impl FakePage {
        fn serving(contents: Vec<&'static str>) -> Self {
            Self {
                contents: Mutex::new(contents),
                snapshot_calls: Mutex::new(0),
                click_calls: Mutex::new(0),
                snapshot: PageNode::new("#document")
                    .with_child(PageNode::new("html").with_child(PageNode::new("body"))),
            }
        }

        fn snapshot_calls(&self) -> u32 {
            *self.snapshot_calls.lock().unwrap()
        }
    }

    impl ChallengePage for FakePage {
        fn content(&self) -> Result<String, ChallengeError> {
            let mut contents = self.contents.lock().unwrap();
            // Last response repeats once the script runs out.
            if contents.len() > 1 {
                Ok(contents.remove(0).to_string())
            } else {
                Ok(contents[0].to_string())
            }
        }

        fn snapshot(&self) -> Result<PageNode, ChallengeError> {
            *self.snapshot_calls.lock().unwrap() += 1;
            Ok(self.snapshot.clone())
        }

        fn click(&self, _node: &PageNode) -> Result<(), ChallengeError> {
            *self.click_calls.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn resolver() -> ChallengeResolver {
        ChallengeResolver::with_poll_interval(Duration::ZERO)
    }

    #[test]
    fn already_clear_page_succeeds_without_attempts() {
        let page = FakePage::serving(vec![CLEARED]);
        let outcome = resolver().bypass(&page, UNLIMITED_RETRIES);
        assert_eq!(
            outcome,
            ResolutionOutcome {
                success: true,
                attempts: 0
            }
        );
        assert_eq!(page.snapshot_calls(), 0);
    }

    #[test]
    fn challenge_clearing_mid_poll_succeeds() {
        let page = FakePage::serving(vec![BLOCKED, BLOCKED, CLEARED]);
        let outcome = resolver().bypass(&page, UNLIMITED_RETRIES);
        assert!(outcome.success);
        assert_eq!(outcome.attempts, 2);
    }

    #[test]
    fn zero_retries_polls_once_and_fails() {
        let page = FakePage::serving(vec![BLOCKED]);
        let outcome = resolver().bypass(&page, 0);
        assert_eq!(
            outcome,
            ResolutionOutcome {
                success: false,
                attempts: 1
            }
        );
        // Exactly one control-location attempt in the single allowed round.
        assert_eq!(page.snapshot_calls(), 1);
    }

    #[test]
    fn budget_caps_iterations_at_retries_plus_one() {
        let page = FakePage::serving(vec![BLOCKED]);
        let outcome = resolver().bypass(&page, 3);
        assert_eq!(
            outcome,
            ResolutionOutcome {
                success: false,
                attempts: 4
            }
        );
        assert_eq!(page.snapshot_calls(), 4);
    }

    #[test]
    fn content_read_failure_counts_as_blocked() {
        struct BrokenPage;
        impl ChallengePage for BrokenPage {
            fn content(&self) -> Result<String, ChallengeError> {
                Err(ChallengeError::Content("tab gone".into()))
            }
            fn snapshot(&self) -> Result<PageNode, ChallengeError> {
                Err(ChallengeError::Snapshot("tab gone".into()))
            }
            fn click(&self, _node: &PageNode) -> Result<(), ChallengeError> {
                Ok(())
            }
        }

        let outcome = resolver().bypass(&BrokenPage, 1);
        assert!(!outcome.success);
        assert_eq!(outcome.attempts, 2);
    }
}
