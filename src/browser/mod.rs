//! Browser automation for the challenge-protected profile page.
//!
//! The target site sits behind an anti-bot interstitial that plain HTTP
//! clients cannot pass, so every profile fetch runs through a real headless
//! Chrome tab. This module owns the browser process and its configuration;
//! challenge handling and extraction live in their own modules.

pub mod config;
pub mod manager;

pub use config::BrowserConfig;
pub use manager::{BrowserError, BrowserManager};
