// ABOUTME: Bounded, time-limited cache of preview metadata keyed by normalized URL.
// ABOUTME: Tracks consecutive fetch failures per URL and suppresses retries past a threshold.

//! Metadata cache.
//!
//! Each URL maps to either a successful `Metadata` value or a count of
//! consecutive fetch failures. Entries expire `ttl` after they were stored
//! and are dropped lazily when next touched. When the cache is full, expired
//! entries are reclaimed first and then the least-recently-used URL is
//! evicted; `get`, `set` and `report_failure` all count as a use.
//!
//! ## Failure accounting
//!
//! `report_failure` never demotes a successful value. Failure counts grow by
//! one per report up to the retry threshold. Once the threshold is reached,
//! `get` answers `CacheLookup::Suppressed` so callers stop refetching until
//! the entry expires or a later `set` replaces it.

use std::num::NonZeroUsize;
use std::time::Instant;

use lru::LruCache;
use tracing::debug;

use crate::error::ConfigError;
use crate::metadata::Metadata;
use crate::options::{ttl_millis, CacheBuilder, CacheOptions};

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// A live successful value.
    Hit(Metadata),
    /// Fetching this URL has failed too often; show the link without metadata.
    Suppressed,
    /// Nothing usable is cached; the caller should fetch.
    Miss,
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, CacheLookup::Suppressed)
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, CacheLookup::Miss)
    }
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Success(Metadata),
    Failures(u32),
}

#[derive(Debug, Clone)]
struct Slot {
    entry: CacheEntry,
    /// When the entry was created or last overwritten by `set`.
    stored_at: Instant,
}

impl Slot {
    fn new(entry: CacheEntry, stored_at: Instant) -> Self {
        Self { entry, stored_at }
    }
}

/// In-memory metadata cache with LRU eviction and ttl expiry.
#[derive(Debug)]
pub struct MetadataCache {
    opts: CacheOptions,
    entries: LruCache<String, Slot>,
}

impl MetadataCache {
    /// Create a cache, rejecting invalid options.
    pub fn new(opts: CacheOptions) -> Result<Self, ConfigError> {
        opts.validate()?;
        let capacity =
            NonZeroUsize::new(opts.max_size).ok_or(ConfigError::InvalidMaxSize(opts.max_size))?;
        debug!(
            max_size = opts.max_size,
            ttl_ms = ttl_millis(opts.ttl),
            retry_threshold = opts.retry_threshold,
            "metadata cache created"
        );
        Ok(Self {
            entries: LruCache::new(capacity),
            opts,
        })
    }

    /// Create a CacheBuilder with default options.
    pub fn builder() -> CacheBuilder {
        CacheBuilder::new()
    }

    pub fn options(&self) -> &CacheOptions {
        &self.opts
    }

    /// Look up a URL, refreshing its recency when a live entry exists.
    pub fn get(&mut self, url: &str) -> CacheLookup {
        self.get_at(url, Instant::now())
    }

    /// Store a successful value, replacing any success or failure state.
    pub fn set(&mut self, url: &str, metadata: Metadata) {
        self.set_at(url, metadata, Instant::now());
    }

    /// Record a failed fetch for a URL.
    pub fn report_failure(&mut self, url: &str) {
        self.report_failure_at(url, Instant::now());
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, slot)| !self.is_expired(slot, now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a live entry of either kind exists. Does not affect recency.
    pub fn contains(&self, url: &str) -> bool {
        let now = Instant::now();
        self.entries
            .peek(url)
            .is_some_and(|slot| !self.is_expired(slot, now))
    }

    /// Current consecutive failure count for a URL, if it has a live failure entry.
    /// Does not affect recency.
    pub fn failure_count(&self, url: &str) -> Option<u32> {
        let now = Instant::now();
        match self.entries.peek(url) {
            Some(slot) if !self.is_expired(slot, now) => match slot.entry {
                CacheEntry::Failures(count) => Some(count),
                CacheEntry::Success(_) => None,
            },
            _ => None,
        }
    }

    /// Drop any entry for a URL. Returns true if one was present.
    pub fn invalidate(&mut self, url: &str) -> bool {
        self.entries.pop(url).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Eagerly remove every expired entry, returning how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    fn get_at(&mut self, url: &str, now: Instant) -> CacheLookup {
        self.drop_if_expired(url, now);
        let threshold = self.opts.retry_threshold;

        let Some(slot) = self.entries.get(url) else {
            debug!(url, "metadata cache miss");
            return CacheLookup::Miss;
        };

        match &slot.entry {
            CacheEntry::Success(metadata) => {
                debug!(url, "metadata cache hit");
                CacheLookup::Hit(metadata.clone())
            }
            CacheEntry::Failures(count) if *count >= threshold => {
                debug!(url, failures = count, "retries suppressed");
                CacheLookup::Suppressed
            }
            CacheEntry::Failures(count) => {
                debug!(url, failures = count, "failure below threshold, retrying");
                CacheLookup::Miss
            }
        }
    }

    fn set_at(&mut self, url: &str, metadata: Metadata, now: Instant) {
        self.drop_if_expired(url, now);
        self.insert(url, Slot::new(CacheEntry::Success(metadata), now), now);
        debug!(url, "metadata cached");
    }

    fn report_failure_at(&mut self, url: &str, now: Instant) {
        self.drop_if_expired(url, now);
        let threshold = self.opts.retry_threshold;

        if let Some(slot) = self.entries.get_mut(url) {
            match &mut slot.entry {
                CacheEntry::Success(_) => {
                    debug!(url, "ignoring failure for cached success");
                }
                CacheEntry::Failures(count) => {
                    *count = (*count + 1).min(threshold);
                    debug!(url, failures = *count, "fetch failure recorded");
                }
            }
            return;
        }

        self.insert(url, Slot::new(CacheEntry::Failures(1), now), now);
        debug!(url, failures = 1, "fetch failure recorded");
    }

    /// Inserts or replaces `url` as the most recently used entry.
    ///
    /// A new key arriving at capacity first reclaims expired entries, which
    /// no longer count as stored; if none were expired the LRU entry goes.
    fn insert(&mut self, url: &str, slot: Slot, now: Instant) {
        if !self.entries.contains(url) && self.entries.len() >= self.entries.cap().get() {
            self.purge_expired_at(now);
        }
        if let Some((evicted, _)) = self.entries.push(url.to_string(), slot) {
            if evicted != url {
                debug!(url = %evicted, "evicted least recently used entry");
            }
        }
    }

    fn purge_expired_at(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| self.is_expired(slot, now))
            .map(|(url, _)| url.clone())
            .collect();
        for url in &expired {
            self.entries.pop(url);
        }
        if !expired.is_empty() {
            debug!(removed = expired.len(), "purged expired metadata entries");
        }
        expired.len()
    }

    fn is_expired(&self, slot: &Slot, now: Instant) -> bool {
        now.saturating_duration_since(slot.stored_at) > self.opts.ttl
    }

    fn drop_if_expired(&mut self, url: &str, now: Instant) {
        let expired = self
            .entries
            .peek(url)
            .is_some_and(|slot| self.is_expired(slot, now));
        if expired {
            self.entries.pop(url);
            debug!(url, "metadata entry expired");
        }
    }
}
