//! War Thunder player statistics API.
//!
//! Scrapes the public profile page behind its anti-bot interstitial with a
//! headless browser, extracts the statistics tables into typed records and
//! serves them as JSON over HTTP.

pub mod app_state;
pub mod browser;
pub mod cache;
pub mod challenge;
pub mod config;
pub mod dom;
pub mod extractor;
pub mod metrics;
pub mod models;
pub mod scraping;
