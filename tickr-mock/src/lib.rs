//! tickr-mock
//!
//! A deterministic, in-memory [`FetchAdapter`] for tests and examples.
//!
//! The mock serves candles from a fixed script, optionally delayed, and can
//! inject a bounded run of transient failures to exercise retry paths. A
//! closure override replaces the scripted behavior entirely when a test
//! needs something stranger, and a shared call counter survives moving the
//! adapter into the orchestrator.
#![warn(missing_docs)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tickr_core::FetchAdapter;
use tickr_types::{Candle, TickrError, Timeframe};

type FetchFn = dyn Fn(&str, Timeframe, i64, u32) -> Result<Vec<Candle>, TickrError> + Send + Sync;

/// Scripted [`FetchAdapter`] built via [`MockAdapter::builder`].
pub struct MockAdapter {
    name: &'static str,
    timeframes: &'static [Timeframe],
    candles: Vec<Candle>,
    fetch_fn: Option<Arc<FetchFn>>,
    fail_remaining: AtomicU32,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockAdapter {
    /// Start building a mock; the default serves nothing and supports every
    /// timeframe.
    #[must_use]
    pub fn builder() -> MockAdapterBuilder {
        MockAdapterBuilder::new()
    }

    /// Shorthand for a mock that serves exactly `candles`.
    #[must_use]
    pub fn with_candles(candles: Vec<Candle>) -> Self {
        Self::builder().candles(candles).build()
    }

    /// Fetch calls observed so far, including failed and refused ones.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle to the call counter; clone it out before moving the
    /// adapter into an orchestrator.
    #[must_use]
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl FetchAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supported_timeframes(&self) -> &'static [Timeframe] {
        self.timeframes
    }

    async fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: i64,
        limit: u32,
    ) -> Result<Vec<Candle>, TickrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(TickrError::fetch(symbol, "injected transient failure"));
        }
        if !self.supports_timeframe(timeframe) {
            return Err(TickrError::not_supported(format!(
                "timeframe {timeframe} is not served by {}",
                self.name
            )));
        }
        if let Some(fetch_fn) = &self.fetch_fn {
            return fetch_fn(symbol, timeframe, since, limit);
        }
        Ok(self
            .candles
            .iter()
            .filter(|c| c.open_time >= since)
            .take(limit as usize)
            .copied()
            .collect())
    }
}

/// Builder for [`MockAdapter`].
pub struct MockAdapterBuilder {
    name: &'static str,
    timeframes: &'static [Timeframe],
    candles: Vec<Candle>,
    fetch_fn: Option<Arc<FetchFn>>,
    fail_times: u32,
    delay: Option<Duration>,
}

impl Default for MockAdapterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAdapterBuilder {
    /// A builder with no script, no failures, and every timeframe supported.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: "tickr-mock",
            timeframes: &Timeframe::ALL,
            candles: Vec::new(),
            fetch_fn: None,
            fail_times: 0,
            delay: None,
        }
    }

    /// Adapter name reported in logs and errors.
    #[must_use]
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Restrict the advertised timeframes.
    #[must_use]
    pub const fn timeframes(mut self, timeframes: &'static [Timeframe]) -> Self {
        self.timeframes = timeframes;
        self
    }

    /// The full history this source knows about. A fetch returns the first
    /// `limit` scripted candles at or after `since`, so running past the
    /// script yields an empty page, which is how a real source signals
    /// exhaustion. Candles are sorted on build, so fixtures can be listed in
    /// any order.
    #[must_use]
    pub fn candles(mut self, candles: Vec<Candle>) -> Self {
        self.candles = candles;
        self
    }

    /// Replace the scripted behavior with a closure.
    #[must_use]
    pub fn fetch_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, Timeframe, i64, u32) -> Result<Vec<Candle>, TickrError> + Send + Sync + 'static,
    {
        self.fetch_fn = Some(Arc::new(f));
        self
    }

    /// Fail the first `n` fetches with a transient error, then recover.
    #[must_use]
    pub const fn fail_times(mut self, n: u32) -> Self {
        self.fail_times = n;
        self
    }

    /// Sleep this long inside every fetch, for cancellation and timing tests.
    #[must_use]
    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Finish the mock.
    #[must_use]
    pub fn build(self) -> MockAdapter {
        let mut candles = self.candles;
        candles.sort_by_key(|c| c.open_time);
        MockAdapter {
            name: self.name,
            timeframes: self.timeframes,
            candles,
            fetch_fn: self.fetch_fn,
            fail_remaining: AtomicU32::new(self.fail_times),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: self.delay,
        }
    }
}

/// A candle with all four prices equal to `px` and unit volume, for fixtures
/// where only identity and position matter.
#[must_use]
pub fn candle(open_time: i64, px: f64) -> Candle {
    Candle::new(open_time, px, px, px, px, 1.0)
}

/// `count` consecutive candles starting at `start`, one per `timeframe`
/// period, with closes `100.0, 101.0, ...` so neighbors are distinguishable.
#[must_use]
pub fn candles_every(timeframe: Timeframe, start: i64, count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| candle(start + (i as i64) * timeframe.period_ms(), 100.0 + i as f64))
        .collect()
}
