use tracing::{debug, warn};

use tickr_core::{FetchAdapter, find_gaps, merge};
use tickr_store::SeriesStore;
use tickr_types::{
    Candle, FinalRange, GapRange, RangeOutcome, RangeStatus, Series, SeriesKey, SyncResult,
    TickrError,
};

use crate::backoff::delay_for_attempt;
use crate::core::{Tickr, now_ms};

fn final_range_of(series: &Series) -> Option<FinalRange> {
    match (series.first_open_time(), series.last_open_time()) {
        (Some(first_open_time), Some(last_open_time)) => Some(FinalRange {
            first_open_time,
            last_open_time,
        }),
        _ => None,
    }
}

impl<A: FetchAdapter, S: SeriesStore> Tickr<A, S> {
    /// Sync the trailing window for `key`: the last `window_periods` closed
    /// periods before now.
    ///
    /// The window ends at the current period boundary, so the candle still
    /// forming right now is not fetched; only closed candles are stored, and
    /// a second run with no new data is a no-op with `added == 0`.
    ///
    /// # Errors
    /// See [`sync_range`](Self::sync_range).
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    pub async fn sync_one(&self, key: &SeriesKey) -> Result<SyncResult, TickrError> {
        let tf = key.timeframe;
        let end = tf.align_down(now_ms());
        let start = end - i64::from(self.cfg.window_periods) * tf.period_ms();
        self.sync_range(key, start, end).await
    }

    /// Sync an explicit half-open range `[start, end)` for `key`, typically
    /// a historical backfill.
    ///
    /// One call is one transaction against the store: load the series and
    /// its version, scan for coverage gaps, page each gap out of the
    /// adapter, merge incoming-wins, and save behind the loaded version.
    /// When the save hits a version conflict the fetched candles are kept,
    /// the series is reloaded, only still-missing ranges are re-fetched, and
    /// the save is retried up to the configured retry bound.
    ///
    /// A range whose fetch or validation fails is abandoned and reported in
    /// the result's `ranges`; sibling ranges and everything already fetched
    /// are still merged and persisted. Nothing is written until the final
    /// save, so dropping the future mid-fetch leaves the store exactly as it
    /// was.
    ///
    /// # Errors
    /// - [`TickrError::Validation`] when `start > end`.
    /// - [`TickrError::NotSupported`] when the adapter does not advertise
    ///   the key's timeframe; no fetch is attempted.
    /// - [`TickrError::ConcurrencyExhausted`] when conflict retries run out.
    /// - [`TickrError::Integrity`] when the stored series itself fails
    ///   validation, and [`TickrError::Storage`] for store I/O failures.
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    pub async fn sync_range(
        &self,
        key: &SeriesKey,
        start: i64,
        end: i64,
    ) -> Result<SyncResult, TickrError> {
        if start > end {
            return Err(TickrError::validation(format!(
                "sync range is inverted: start {start} > end {end}"
            )));
        }
        if !self.adapter.supports_timeframe(key.timeframe) {
            return Err(TickrError::not_supported(format!(
                "timeframe {} is not served by adapter {}",
                key.timeframe,
                self.adapter.name()
            )));
        }
        let tf = key.timeframe;
        let tol = self.cfg.spacing_tolerance_ms;
        let start = tf.align_down(start);
        let end = tf.align_up(end);

        // Candles fetched so far; carried across conflict retries so a lost
        // race never re-fetches what this sync already paid for.
        let mut fetched = Series::new();
        let mut outcomes: Vec<RangeOutcome> = Vec::new();
        let mut conflict_retries: u32 = 0;
        loop {
            let loaded = self.store.load(key).await?;
            let mut outcome = merge(&loaded.series, &fetched, tf, tol)?;

            let gaps = find_gaps(&outcome.series, start, end, tf)?;
            if gaps.is_empty() {
                debug!(version = loaded.version, "requested range fully covered");
            } else {
                debug!(gaps = gaps.len(), "coverage gaps detected");
                // A re-attempted span supersedes its outcome from an earlier
                // conflict round.
                outcomes.retain(|o| {
                    !gaps
                        .iter()
                        .any(|g| g.start < o.range.end && o.range.start < g.end)
                });
                self.fill_gaps(key, &mut fetched, &gaps, &mut outcomes)
                    .await?;
                outcome = merge(&loaded.series, &fetched, tf, tol)?;
            }

            let mut merged = outcome.series;
            if let Some(cap) = self.cfg.retention {
                merged.trim_front(cap);
            }
            // The version token moves only when the stored series does.
            if merged == loaded.series {
                outcomes.sort_by_key(|o| o.range.start);
                return Ok(SyncResult {
                    added: 0,
                    overwritten: 0,
                    final_range: final_range_of(&merged),
                    ranges: outcomes,
                    conflict_retries,
                });
            }

            match self.store.save(key, &merged, loaded.version).await {
                Ok(version) => {
                    debug!(
                        version,
                        added = outcome.added,
                        overwritten = outcome.overwritten,
                        "sync persisted"
                    );
                    outcomes.sort_by_key(|o| o.range.start);
                    return Ok(SyncResult {
                        added: outcome.added,
                        overwritten: outcome.overwritten,
                        final_range: final_range_of(&merged),
                        ranges: outcomes,
                        conflict_retries,
                    });
                }
                Err(err) if err.is_conflict() => {
                    conflict_retries += 1;
                    if conflict_retries > self.cfg.retry.max_retries {
                        return Err(TickrError::ConcurrencyExhausted {
                            key: key.to_string(),
                            attempts: conflict_retries,
                        });
                    }
                    warn!(
                        attempt = conflict_retries,
                        "save conflicted with a concurrent writer; reloading"
                    );
                    tokio::time::sleep(delay_for_attempt(
                        &self.cfg.retry.backoff,
                        conflict_retries - 1,
                    ))
                    .await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Run one trailing-window sync per key, concurrently, collecting each
    /// key's result without letting one failure abort its siblings.
    ///
    /// Keys share nothing but the adapter and the store; per-key artifacts
    /// and version tokens keep the units isolated.
    #[tracing::instrument(skip_all, fields(keys = keys.len()))]
    pub async fn sync_many(
        &self,
        keys: &[SeriesKey],
    ) -> Vec<(SeriesKey, Result<SyncResult, TickrError>)> {
        let tasks = keys
            .iter()
            .map(|key| async move { (key.clone(), self.sync_one(key).await) });
        futures::future::join_all(tasks).await
    }

    /// Fetch every gap in order, merging each range's candles into `fetched`
    /// and recording a per-range outcome. A range whose data fails
    /// validation, or whose fetch retries run out, is abandoned without
    /// touching its siblings; any other error aborts the sync.
    async fn fill_gaps(
        &self,
        key: &SeriesKey,
        fetched: &mut Series,
        gaps: &[GapRange],
        outcomes: &mut Vec<RangeOutcome>,
    ) -> Result<(), TickrError> {
        let tf = key.timeframe;
        for gap in gaps {
            match self.fetch_gap(key, *gap).await {
                Ok((candles, status)) => {
                    let count = candles.len();
                    match merge(
                        fetched,
                        &Series::from_sorted(candles),
                        tf,
                        self.cfg.spacing_tolerance_ms,
                    ) {
                        Ok(outcome) => {
                            *fetched = outcome.series;
                            outcomes.push(RangeOutcome {
                                range: *gap,
                                status,
                                fetched: count,
                                error: None,
                            });
                        }
                        Err(err) => {
                            warn!(
                                gap = %gap,
                                error = %err,
                                "fetched candles failed validation; range abandoned"
                            );
                            outcomes.push(RangeOutcome {
                                range: *gap,
                                status: RangeStatus::Failed,
                                fetched: count,
                                error: Some(err),
                            });
                        }
                    }
                }
                Err(err) if err.is_transient() => {
                    warn!(gap = %gap, error = %err, "fetch retries exhausted; range abandoned");
                    outcomes.push(RangeOutcome {
                        range: *gap,
                        status: RangeStatus::Failed,
                        fetched: 0,
                        error: Some(err),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Walk one gap page by page. Pages start at the unfilled remainder and
    /// never request more than the periods left in the gap. An empty page
    /// means the adapter ran out of history, which ends the walk as
    /// [`RangeStatus::Exhausted`]; so does a page that fails to advance the
    /// cursor, to guarantee termination against a misbehaving source.
    async fn fetch_gap(
        &self,
        key: &SeriesKey,
        gap: GapRange,
    ) -> Result<(Vec<Candle>, RangeStatus), TickrError> {
        let tf = key.timeframe;
        let period = tf.period_ms();
        let mut cursor = gap.start;
        let mut out: Vec<Candle> = Vec::new();
        while cursor < gap.end {
            let remaining = (gap.end - cursor) / period;
            let limit = u32::try_from(remaining)
                .map_or(self.cfg.max_page_size, |r| r.min(self.cfg.max_page_size));
            let page = self.fetch_page(key, cursor, limit).await?;
            debug!(gap = %gap, cursor, candles = page.len(), "page fetched");

            let Some(last_open) = page.last().map(|c| c.open_time) else {
                debug!(gap = %gap, cursor, "adapter exhausted before range end");
                return Ok((out, RangeStatus::Exhausted));
            };
            out.extend(
                page.into_iter()
                    .filter(|c| c.open_time >= cursor && c.open_time < gap.end),
            );
            let next = tf.align_down(last_open) + period;
            if next <= cursor {
                warn!(gap = %gap, cursor, "page did not advance the cursor; stopping the walk");
                return Ok((out, RangeStatus::Exhausted));
            }
            cursor = next;
        }
        Ok((out, RangeStatus::Filled))
    }

    /// One page fetch with bounded retries on transient failures.
    async fn fetch_page(
        &self,
        key: &SeriesKey,
        since: i64,
        limit: u32,
    ) -> Result<Vec<Candle>, TickrError> {
        let mut attempt: u32 = 0;
        loop {
            match self
                .adapter
                .fetch(&key.symbol, key.timeframe, since, limit)
                .await
            {
                Ok(page) => return Ok(page),
                Err(err) if err.is_transient() && attempt < self.cfg.retry.max_retries => {
                    warn!(error = %err, attempt, "transient fetch failure; backing off");
                    tokio::time::sleep(delay_for_attempt(&self.cfg.retry.backoff, attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
