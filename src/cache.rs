//! TTL cache for extracted profiles, keyed by nickname.
//!
//! Sits in the HTTP layer around the scrape, never inside it: a fetch
//! through the challenge takes tens of seconds, so repeat lookups for the
//! same player should not pay it twice. Only successful (code 200) profiles
//! are stored; not-found and error responses always re-fetch.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::models::PlayerProfile;

struct CachedEntry {
    stored_at: Instant,
    profile: PlayerProfile,
}

pub struct ProfileCache {
    entries: Mutex<HashMap<String, CachedEntry>>,
    ttl: Duration,
    enabled: bool,
}

impl ProfileCache {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            enabled,
        }
    }

    pub fn get(&self, nickname: &str) -> Option<PlayerProfile> {
        if !self.enabled {
            return None;
        }
        let mut entries = self.entries.lock().unwrap();
        match entries.get(nickname) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.profile.clone()),
            Some(_) => {
                entries.remove(nickname);
                None
            }
            None => None,
        }
    }

    pub fn store(&self, nickname: &str, profile: &PlayerProfile) {
        if !self.enabled || profile.code != 200 {
            return;
        }
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            nickname.to_string(),
            CachedEntry {
                stored_at: Instant::now(),
                profile: profile.clone(),
            },
        );
    }
}
