//! Boundary-walk gap detection over a candle series.

use tickr_types::{Candle, GapRange, Series, TickrError, Timeframe};

/// Lazy scan of the granularity-aligned boundaries in a requested range,
/// yielding each maximal run of missing boundaries as one [`GapRange`].
///
/// The scan borrows the series and walks it in one forward pass, so cloning
/// a `GapScan` is cheap and restarts nothing: a clone resumes from the same
/// cursor, and a fresh scan over the same inputs yields the same gaps.
/// Coverage means an exact `open_time` match on a boundary; a candle between
/// boundaries covers nothing.
#[derive(Debug, Clone)]
pub struct GapScan<'a> {
    candles: &'a [Candle],
    idx: usize,
    cursor: i64,
    end: i64,
    period: i64,
}

impl<'a> GapScan<'a> {
    /// Start a scan of `[range_start, range_end)` at `timeframe` granularity.
    ///
    /// The range is widened outward to boundary alignment: `range_start` is
    /// floored and `range_end` is ceiled, so the period containing an
    /// unaligned `range_start` still counts as expected coverage.
    ///
    /// # Errors
    /// Returns [`TickrError::Validation`] when `range_start > range_end`.
    pub fn new(
        existing: &'a Series,
        range_start: i64,
        range_end: i64,
        timeframe: Timeframe,
    ) -> Result<Self, TickrError> {
        if range_start > range_end {
            return Err(TickrError::validation(format!(
                "gap scan range is inverted: start {range_start} > end {range_end}"
            )));
        }
        let start = timeframe.align_down(range_start);
        let candles = existing.as_slice();
        Ok(Self {
            candles,
            idx: candles.partition_point(|c| c.open_time < start),
            cursor: start,
            end: timeframe.align_up(range_end),
            period: timeframe.period_ms(),
        })
    }

    /// Whether a candle opens exactly at the current boundary, advancing the
    /// series index past earlier candles as a side effect.
    fn covered(&mut self) -> bool {
        while self.idx < self.candles.len() && self.candles[self.idx].open_time < self.cursor {
            self.idx += 1;
        }
        self.idx < self.candles.len() && self.candles[self.idx].open_time == self.cursor
    }
}

impl Iterator for GapScan<'_> {
    type Item = GapRange;

    fn next(&mut self) -> Option<GapRange> {
        while self.cursor < self.end && self.covered() {
            self.cursor += self.period;
        }
        if self.cursor >= self.end {
            return None;
        }
        let gap_start = self.cursor;
        while self.cursor < self.end && !self.covered() {
            self.cursor += self.period;
        }
        Some(GapRange::new(gap_start, self.cursor))
    }
}

/// Collect every gap in `[range_start, range_end)` at `timeframe` granularity.
///
/// An empty series yields one gap spanning the whole aligned range; a fully
/// covered range yields none. Adjacent missing boundaries coalesce into a
/// single range.
///
/// # Errors
/// Returns [`TickrError::Validation`] when `range_start > range_end`.
pub fn find_gaps(
    existing: &Series,
    range_start: i64,
    range_end: i64,
    timeframe: Timeframe,
) -> Result<Vec<GapRange>, TickrError> {
    Ok(GapScan::new(existing, range_start, range_end, timeframe)?.collect())
}
