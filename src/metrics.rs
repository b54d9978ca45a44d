/// Request metrics for the profile API
///
/// Tracks success rates, error counts and response times for the scraping
/// pipeline, served verbatim on the `/metrics` endpoint.
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub not_found_requests: u64,
    pub failed_requests: u64,
    pub challenge_failures: u64,
    pub cache_hits: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub average_response_time_ms: f64,
    #[serde(skip)]
    total_response_time_ms: u64,
    #[serde(skip)]
    timed_requests: u64,
}

impl RequestMetrics {
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            (self.successful_requests as f64 / self.total_requests as f64) * 100.0
        }
    }

    fn record_time(&mut self, response_time: Duration) {
        self.timed_requests += 1;
        self.total_response_time_ms += response_time.as_millis() as u64;
        self.average_response_time_ms =
            self.total_response_time_ms as f64 / self.timed_requests as f64;
    }
}

/// Global metrics tracker, shared across handlers behind `web::Data`.
pub struct MetricsTracker {
    metrics: Mutex<RequestMetrics>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            metrics: Mutex::new(RequestMetrics::default()),
        }
    }

    pub fn record_success(&self, response_time: Duration) {
        let mut m = self.metrics.lock().unwrap();
        m.total_requests += 1;
        m.successful_requests += 1;
        m.last_success = Some(Utc::now());
        m.record_time(response_time);
    }

    pub fn record_not_found(&self, response_time: Duration) {
        let mut m = self.metrics.lock().unwrap();
        m.total_requests += 1;
        m.not_found_requests += 1;
        m.record_time(response_time);
    }

    pub fn record_failure(&self, error: String, challenge: bool) {
        let mut m = self.metrics.lock().unwrap();
        m.total_requests += 1;
        m.failed_requests += 1;
        if challenge {
            m.challenge_failures += 1;
        }
        m.last_failure = Some(Utc::now());
        m.last_error = Some(error);
    }

    pub fn record_cache_hit(&self) {
        let mut m = self.metrics.lock().unwrap();
        m.total_requests += 1;
        m.successful_requests += 1;
        m.cache_hits += 1;
        m.last_success = Some(Utc::now());
    }

    pub fn snapshot(&self) -> RequestMetrics {
        self.metrics.lock().unwrap().clone()
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_counts_cache_hits_and_scrapes() {
        let tracker = MetricsTracker::new();
        tracker.record_success(Duration::from_millis(1200));
        tracker.record_cache_hit();
        tracker.record_failure("challenge not cleared after 6 attempts".into(), true);

        let snap = tracker.snapshot();
        assert_eq!(snap.total_requests, 3);
        assert_eq!(snap.successful_requests, 2);
        assert_eq!(snap.cache_hits, 1);
        assert_eq!(snap.challenge_failures, 1);
        assert!((snap.success_rate() - 66.66).abs() < 0.1);
    }

    #[test]
    fn average_only_covers_timed_requests() {
        let tracker = MetricsTracker::new();
        tracker.record_success(Duration::from_millis(100));
        tracker.record_cache_hit();
        tracker.record_success(Duration::from_millis(300));

        let snap = tracker.snapshot();
        assert_eq!(snap.average_response_time_ms, 200.0);
    }

    #[test]
    fn empty_tracker_reports_zero_rate() {
        let tracker = MetricsTracker::new();
        assert_eq!(tracker.snapshot().success_rate(), 0.0);
    }
}
