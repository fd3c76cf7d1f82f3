//! Non-authoritative cache in front of the all-posts listing.
//!
//! Entries expire after a TTL measured by the injected [`Clock`] and the whole cache is
//! cleared whenever a post is created, edited or deleted.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::clock::Clock;

/// Key every all-posts listing entry is filed under.
pub const INDEX_CACHE_KEY: &str = "index_page";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 20;

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

pub struct ListingCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> ListingCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Entry key for one page of the all-posts listing.
    pub fn index_key(page: u64) -> String {
        format!("{INDEX_CACHE_KEY}:{page}")
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now();
        let mut entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                debug!("listing cache hit for {key}");
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` and drops every entry that has already expired.
    pub fn insert(&self, key: impl Into<String>, value: T) {
        let now = self.clock.now();
        let mut entries = self.entries();
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(key.into(), CacheEntry {
            value,
            expires_at: now + self.ttl,
        });
    }

    pub fn clear(&self) {
        let mut entries = self.entries();
        if !entries.is_empty() {
            debug!("clearing {} listing cache entries", entries.len());
        }
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
