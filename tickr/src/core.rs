use std::fmt;

use chrono::Utc;

use tickr_core::FetchAdapter;
use tickr_store::SeriesStore;
use tickr_types::{RetryConfig, SyncConfig, TickrError};

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Orchestrates sync transactions for one adapter/store pair.
///
/// A `Tickr` owns a [`FetchAdapter`] and a [`SeriesStore`] and drives the
/// fetch-merge-persist pipeline per series key: detect coverage gaps, page
/// candles out of the adapter, merge them incoming-wins onto what is stored,
/// and save behind the store's version token. It holds no per-series state
/// of its own, so one instance can serve many keys, including concurrently.
pub struct Tickr<A, S> {
    pub(crate) adapter: A,
    pub(crate) store: S,
    pub(crate) cfg: SyncConfig,
}

impl<A, S> fmt::Debug for Tickr<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tickr")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl<A: FetchAdapter, S: SeriesStore> Tickr<A, S> {
    /// Start building an orchestrator around `adapter` and `store`.
    #[must_use]
    pub fn builder(adapter: A, store: S) -> TickrBuilder<A, S> {
        TickrBuilder::new(adapter, store)
    }

    /// The configuration this instance runs with.
    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.cfg
    }

    /// The adapter behind this instance, mostly for its
    /// [`name`](FetchAdapter::name).
    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }
}

/// Builder for a [`Tickr`] orchestrator.
pub struct TickrBuilder<A, S> {
    adapter: A,
    store: S,
    cfg: SyncConfig,
}

impl<A: FetchAdapter, S: SeriesStore> TickrBuilder<A, S> {
    /// A builder carrying the default [`SyncConfig`].
    #[must_use]
    pub fn new(adapter: A, store: S) -> Self {
        Self {
            adapter,
            store,
            cfg: SyncConfig::default(),
        }
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub const fn config(mut self, cfg: SyncConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// How many periods back from now [`Tickr::sync_one`] reaches.
    #[must_use]
    pub const fn window_periods(mut self, periods: u32) -> Self {
        self.cfg.window_periods = periods;
        self
    }

    /// Cap on candles requested per fetch page.
    ///
    /// Behavior and trade-offs:
    /// - Smaller pages mean more requests but finer-grained progress; a gap
    ///   is walked page by page and everything fetched before a failure is
    ///   still merged and persisted.
    /// - The orchestrator never requests more than the remaining span of the
    ///   gap being filled, so a small trailing gap costs one small page.
    #[must_use]
    pub const fn max_page_size(mut self, candles: u32) -> Self {
        self.cfg.max_page_size = candles;
        self
    }

    /// Allowed deviation from exact period spacing before a merge is
    /// rejected as corrupt.
    #[must_use]
    pub const fn spacing_tolerance_ms(mut self, tolerance: i64) -> Self {
        self.cfg.spacing_tolerance_ms = tolerance;
        self
    }

    /// Keep at most this many of the newest candles after each merge.
    ///
    /// Behavior and trade-offs:
    /// - Trimmed spans read as gaps to later scans, so a sync over an old
    ///   range can re-fetch what retention dropped. Size the cap to comfortably
    ///   cover the windows you sync.
    #[must_use]
    pub const fn retention(mut self, max_candles: usize) -> Self {
        self.cfg.retention = Some(max_candles);
        self
    }

    /// Retry policy for transient fetch failures and save conflicts.
    #[must_use]
    pub const fn retry(mut self, retry: RetryConfig) -> Self {
        self.cfg.retry = retry;
        self
    }

    /// Validate the configuration and finish the orchestrator.
    ///
    /// # Errors
    /// Returns [`TickrError::Validation`] when a knob is out of range: a zero
    /// window or page size, a negative spacing tolerance, a zero retention
    /// cap, a backoff factor of zero, a jitter above 100 percent, or a
    /// minimum backoff above the maximum.
    pub fn build(self) -> Result<Tickr<A, S>, TickrError> {
        let cfg = &self.cfg;
        if cfg.window_periods == 0 {
            return Err(TickrError::validation("window_periods must be at least 1"));
        }
        if cfg.max_page_size == 0 {
            return Err(TickrError::validation("max_page_size must be at least 1"));
        }
        if cfg.spacing_tolerance_ms < 0 {
            return Err(TickrError::validation(
                "spacing_tolerance_ms cannot be negative",
            ));
        }
        if cfg.retention == Some(0) {
            return Err(TickrError::validation(
                "retention must keep at least one candle; omit it to keep everything",
            ));
        }
        if cfg.retry.backoff.factor == 0 {
            return Err(TickrError::validation("backoff factor must be at least 1"));
        }
        if cfg.retry.backoff.jitter_percent > 100 {
            return Err(TickrError::validation(
                "backoff jitter_percent must be within [0, 100]",
            ));
        }
        if cfg.retry.backoff.min_backoff_ms > cfg.retry.backoff.max_backoff_ms {
            return Err(TickrError::validation(
                "min_backoff_ms cannot exceed max_backoff_ms",
            ));
        }
        Ok(Tickr {
            adapter: self.adapter,
            store: self.store,
            cfg: self.cfg,
        })
    }
}
