use tickr_core::{FetchAdapter, resample};
use tickr_store::SeriesStore;
use tickr_types::{Series, SeriesKey, TickrError, Timeframe};

use crate::core::{Tickr, now_ms};

impl<A: FetchAdapter, S: SeriesStore> Tickr<A, S> {
    /// Read stored candles for `key` within the half-open range
    /// `[start, end)`.
    ///
    /// `end` defaults to now and `start` to `window_periods` periods before
    /// `end`, so a bare `get_candles(&key, None, None)` reads the same
    /// trailing window [`sync_one`](Self::sync_one) maintains. This only
    /// reads the store; nothing is fetched, and spans that were never synced
    /// simply come back empty.
    ///
    /// # Errors
    /// - [`TickrError::Validation`] when the resolved `start > end`.
    /// - [`TickrError::Integrity`] when the stored artifact is out of order,
    ///   and [`TickrError::Storage`] for store I/O failures.
    pub async fn get_candles(
        &self,
        key: &SeriesKey,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<Series, TickrError> {
        let end = end.unwrap_or_else(now_ms);
        let start = start.unwrap_or_else(|| {
            end - i64::from(self.cfg.window_periods) * key.timeframe.period_ms()
        });
        if start > end {
            return Err(TickrError::validation(format!(
                "query range is inverted: start {start} > end {end}"
            )));
        }
        let loaded = self.store.load(key).await?;
        Ok(Series::from_sorted(loaded.series.slice(start, end).to_vec()))
    }

    /// Read the full stored series for `key` rolled up into coarser `to`
    /// candles.
    ///
    /// Only complete target buckets are emitted; see
    /// [`resample`](tickr_core::resample) for the bucket rules.
    ///
    /// # Errors
    /// - [`TickrError::Validation`] when `to` is finer than the key's
    ///   timeframe or not a whole multiple of it.
    /// - [`TickrError::Integrity`] when the stored artifact is out of order,
    ///   and [`TickrError::Storage`] for store I/O failures.
    pub async fn resample_to(&self, key: &SeriesKey, to: Timeframe) -> Result<Series, TickrError> {
        let loaded = self.store.load(key).await?;
        resample(&loaded.series, key.timeframe, to)
    }
}
