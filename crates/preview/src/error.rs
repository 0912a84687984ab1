// ABOUTME: Error types for the link preview core.
// ABOUTME: Only cache construction can fail; extraction and merging degrade to empty metadata.

use thiserror::Error;

/// Errors raised when a metadata cache is built with unusable settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The cache must be able to hold at least one entry.
    #[error("invalid cache max size {0}: must be at least 1")]
    InvalidMaxSize(usize),

    /// Entries must live for a non-zero amount of time.
    #[error("invalid cache ttl: must be greater than zero")]
    InvalidTtl,

    /// At least one failure must be tolerated before retries are suppressed.
    #[error("invalid retry threshold {0}: must be at least 1")]
    InvalidRetryThreshold(u32),
}

impl ConfigError {
    /// Returns true if this error concerns the cache capacity.
    pub fn is_max_size(&self) -> bool {
        matches!(self, ConfigError::InvalidMaxSize(_))
    }

    /// Returns true if this error concerns the entry ttl.
    pub fn is_ttl(&self) -> bool {
        matches!(self, ConfigError::InvalidTtl)
    }

    /// Returns true if this error concerns the retry threshold.
    pub fn is_retry_threshold(&self) -> bool {
        matches!(self, ConfigError::InvalidRetryThreshold(_))
    }
}
