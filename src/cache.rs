use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::metrics::CACHE_SIZE;
use crate::models::{GenerationResult, NormalizedRequest};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

// Time source for expiry checks. Swappable so tests can move time forward.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// Cache entry with timestamp
#[derive(Clone)]
pub struct CacheEntry {
    pub result: GenerationResult,
    pub created_at: Instant,
}

// Canonical serialization of the normalized request: serde writes struct
// fields in declaration order, so the same values always give the same string.
pub fn canonical_form(req: &NormalizedRequest) -> String {
    serde_json::to_string(req).unwrap_or_default()
}

// Create a cache key (hash of the canonical request)
pub fn make_cache_key(req: &NormalizedRequest) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_form(req));
    format!("{:x}", hasher.finalize())
}

// In-memory result cache keyed by request fingerprint.
// Entries live for a fixed TTL from insertion. Reads never extend an
// entry's life; an expired entry is dropped the first time it is read.
pub struct FingerprintCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl FingerprintCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, req: &NormalizedRequest) -> Option<GenerationResult> {
        self.get_by_key(&make_cache_key(req))
    }

    pub fn get_by_key(&self, key: &str) -> Option<GenerationResult> {
        let now = self.clock.now();
        match self.entries.get(key) {
            None => return None,
            Some(entry) if now.saturating_duration_since(entry.created_at) < self.ttl => {
                return Some(entry.result.clone());
            }
            Some(_) => {}
        }
        // read guard is released by now, safe to take the shard write lock
        self.entries
            .remove_if(key, |_, e| now.saturating_duration_since(e.created_at) >= self.ttl);
        None
    }

    pub fn put(&self, req: &NormalizedRequest, result: GenerationResult) {
        self.put_by_key(make_cache_key(req), result);
    }

    pub fn put_by_key(&self, key: String, result: GenerationResult) {
        self.entries.insert(
            key,
            CacheEntry {
                result,
                created_at: self.clock.now(),
            },
        );
        CACHE_SIZE.set(self.entries.len() as f64);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Drop every entry past its TTL. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.created_at) < self.ttl);
        let removed = before.saturating_sub(self.entries.len());
        CACHE_SIZE.set(self.entries.len() as f64);
        removed
    }
}

// Background sweep so expired entries don't pile up between reads
pub async fn sweeper(cache: Arc<FingerprintCache>) {
    let period = cache.ttl().min(Duration::from_secs(60)).max(Duration::from_secs(1));
    let mut interval = tokio::time::interval(period);

    debug!(?period, "cache sweeper started");

    loop {
        interval.tick().await;
        let removed = cache.purge_expired();
        if removed > 0 {
            debug!(removed, remaining = cache.len(), "purged expired cache entries");
        }
    }
}
