//! Aggregation of a fine-grained series into a coarser timeframe.

use tickr_types::{Candle, Series, TickrError, Timeframe};

struct Bucket {
    start: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    count: usize,
}

impl Bucket {
    fn begin(start: i64, c: &Candle) -> Self {
        Self {
            start,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
            count: 1,
        }
    }

    fn absorb(&mut self, c: &Candle) {
        self.high = self.high.max(c.high);
        self.low = self.low.min(c.low);
        self.close = c.close;
        self.volume += c.volume;
        self.count += 1;
    }

    /// Emit only when every source period in the bucket is present.
    fn emit(self, ratio: usize, out: &mut Vec<Candle>) {
        if self.count == ratio {
            out.push(Candle::new(
                self.start,
                self.open,
                self.high,
                self.low,
                self.close,
                self.volume,
            ));
        }
    }
}

/// Aggregate a series recorded at `from` granularity into `to` candles.
///
/// Buckets are the `to`-aligned periods. Within a bucket, open is the first
/// source open, high and low the extremes, close the last source close, and
/// volume the sum. A bucket is emitted only when every source boundary in it
/// is covered, so a trailing period still being filled, or one overlapping a
/// gap, never fabricates a candle.
///
/// The input must uphold the [`Series`] ordering invariant at `from`
/// granularity; the sync pipeline guarantees that for anything it stores.
///
/// # Errors
/// Returns [`TickrError::Validation`] when `to` is finer than `from` or not
/// a whole multiple of it.
pub fn resample(series: &Series, from: Timeframe, to: Timeframe) -> Result<Series, TickrError> {
    let from_ms = from.period_ms();
    let to_ms = to.period_ms();
    if to_ms < from_ms || to_ms % from_ms != 0 {
        return Err(TickrError::validation(format!(
            "cannot resample {from} to {to}: target must be a whole multiple of the source period"
        )));
    }
    let ratio = usize::try_from(to_ms / from_ms).unwrap_or(usize::MAX);

    let mut out = Vec::with_capacity(series.len() / ratio);
    let mut bucket: Option<Bucket> = None;
    for c in series {
        let start = to.align_down(c.open_time);
        match bucket.as_mut() {
            Some(b) if b.start == start => b.absorb(c),
            _ => {
                if let Some(b) = bucket.take() {
                    b.emit(ratio, &mut out);
                }
                bucket = Some(Bucket::begin(start, c));
            }
        }
    }
    if let Some(b) = bucket.take() {
        b.emit(ratio, &mut out);
    }
    Ok(Series::from_sorted(out))
}
