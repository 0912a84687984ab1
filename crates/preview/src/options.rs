// ABOUTME: Configuration for the metadata cache: capacity, entry ttl, and retry threshold.
// ABOUTME: CacheBuilder provides a fluent API for constructing validated MetadataCache instances.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cache::MetadataCache;
use crate::error::ConfigError;

/// Settings consumed by `MetadataCache`.
///
/// Deserializes from camelCase JSON (`maxSize`, `ttlMs`, `retryThreshold`);
/// missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheOptions {
    /// Maximum number of URLs held before least-recently-used eviction.
    pub max_size: usize,
    /// Age after which an entry is treated as absent.
    #[serde(
        rename = "ttlMs",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub ttl: Duration,
    /// Consecutive failures after which retries are suppressed.
    pub retry_threshold: u32,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_size: 100,
            ttl: Duration::from_secs(5 * 60),
            retry_threshold: 2,
        }
    }
}

impl CacheOptions {
    /// Rejects settings the cache cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::InvalidMaxSize(self.max_size));
        }
        if self.ttl.is_zero() {
            return Err(ConfigError::InvalidTtl);
        }
        if self.retry_threshold == 0 {
            return Err(ConfigError::InvalidRetryThreshold(self.retry_threshold));
        }
        Ok(())
    }
}

/// Whole milliseconds in `ttl`, saturating at `u64::MAX`.
pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

fn serialize_millis<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(ttl_millis(*ttl))
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

/// Builder for constructing MetadataCache instances with custom settings.
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    opts: CacheOptions,
}

impl CacheBuilder {
    /// Create a new CacheBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing options, e.g. ones loaded from a settings file.
    pub fn from_options(opts: CacheOptions) -> Self {
        Self { opts }
    }

    /// Set the maximum number of cached URLs.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.opts.max_size = max_size;
        self
    }

    /// Set how long an entry stays live.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.opts.ttl = ttl;
        self
    }

    /// Set how many consecutive failures are tolerated before retries stop.
    pub fn retry_threshold(mut self, retry_threshold: u32) -> Self {
        self.opts.retry_threshold = retry_threshold;
        self
    }

    /// Validate the options and build the cache.
    pub fn build(self) -> Result<MetadataCache, ConfigError> {
        MetadataCache::new(self.opts)
    }
}
