//! In-memory response cache keyed by request signature.
//!
//! Entries expire after their TTL and are dropped when read; when the cache is full the
//! oldest insertion is evicted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::debug;

use crate::response::ApiResponse;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug, Clone)]
struct Entry {
    response: ApiResponse,
    inserted: Instant,
    ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    entries: HashMap<String, Entry>,
    max_entries: usize,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_TTL)
    }
}

/// Signature of a request: method, URL, query and body.
pub fn cache_key(
    method: &str,
    url: &str,
    query: &[(String, String)],
    body: Option<&serde_json::Value>,
) -> String {
    let mut key = format!("{method} {url}");
    for (k, v) in query {
        key.push_str(&format!("&{k}={v}"));
    }
    if let Some(body) = body {
        key.push('#');
        key.push_str(&body.to_string());
    }
    key
}

impl ResponseCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&mut self, key: &str) -> Option<ApiResponse> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&mut self, key: &str, now: Instant) -> Option<ApiResponse> {
        let entry = self.entries.get(key)?;
        if now.saturating_duration_since(entry.inserted) < entry.ttl {
            debug!("cache hit: {key}");
            return Some(entry.response.clone());
        }
        debug!("cache expired: {key}");
        self.entries.remove(key);
        None
    }

    /// Store a response. `ttl` is capped at the cache-wide TTL.
    pub fn insert(&mut self, key: String, response: ApiResponse, ttl: Option<Duration>) {
        self.insert_at(key, response, ttl, Instant::now());
    }

    pub(crate) fn insert_at(
        &mut self,
        key: String,
        response: ApiResponse,
        ttl: Option<Duration>,
        now: Instant,
    ) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!("cache full, evicting {oldest}");
                self.entries.remove(&oldest);
            }
        }
        let ttl = ttl.map_or(self.ttl, |t| t.min(self.ttl));
        self.entries.insert(
            key,
            Entry {
                response,
                inserted: now,
                ttl,
            },
        );
    }
}
