//! Application state for the Actix-web server
//!
//! The `AppState` struct is wrapped in `web::Data` and shared across all
//! HTTP handlers: the scraping service, the profile cache, the metrics
//! tracker and the loaded configuration.

use std::sync::Arc;

use crate::cache::ProfileCache;
use crate::config::Config;
use crate::metrics::MetricsTracker;
use crate::scraping::ProfileService;

pub struct AppState {
    /// Scraping pipeline; shared so blocking fetches can run off-thread
    pub service: Arc<ProfileService>,
    /// TTL cache of successful profile responses
    pub cache: ProfileCache,
    /// Request metrics for the `/metrics` endpoint
    pub metrics: MetricsTracker,
    /// Application configuration
    pub config: Config,
}
