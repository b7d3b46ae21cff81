//! Configuration for the sync orchestrator and its retry policy.

use serde::{Deserialize, Serialize};

/// Exponential backoff configuration for retry delays.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Minimum backoff delay in milliseconds.
    pub min_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_backoff_ms: u64,
    /// Exponential factor to increase delay after each failure (>= 1).
    pub factor: u32,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_backoff_ms: 500,
            max_backoff_ms: 30_000,
            factor: 2,
            jitter_percent: 20,
        }
    }
}

/// Bounded-retry policy applied to transient fetch failures and to
/// optimistic-concurrency conflicts at save time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first failed attempt (so up to `max_retries + 1`
    /// attempts in total).
    pub max_retries: u32,
    /// Delay schedule between attempts.
    pub backoff: BackoffConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffConfig::default(),
        }
    }
}

/// Options recognized by one sync unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Default sync window, measured in timeframe periods back from now.
    pub window_periods: u32,
    /// Maximum candles requested per fetch page.
    pub max_page_size: u32,
    /// Allowed deviation from exact period spacing between adjacent candles
    /// before a merge is rejected as corrupt, in milliseconds.
    pub spacing_tolerance_ms: i64,
    /// Optional retention cap: after merge, keep at most this many of the
    /// newest candles. `None` keeps everything.
    pub retention: Option<usize>,
    /// Retry policy for fetch failures and save conflicts.
    pub retry: RetryConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            window_periods: 100,
            max_page_size: 100,
            spacing_tolerance_ms: 0,
            retention: None,
            retry: RetryConfig::default(),
        }
    }
}
