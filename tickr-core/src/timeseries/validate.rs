//! Series invariant checks shared by the merge and load paths.

use tickr_types::{Candle, TickrError, Timeframe};

/// Distance from `ts` to the nearest `period` boundary.
const fn boundary_offset(ts: i64, period: i64) -> i64 {
    let rem = ts.rem_euclid(period);
    if rem <= period - rem { rem } else { period - rem }
}

/// Check the invariants a series at `timeframe` granularity must hold.
///
/// Verifies that every `open_time` sits on a timeframe boundary within
/// `tolerance_ms`, that open times are strictly increasing, and that
/// adjacent candles are at least one period apart (again within
/// `tolerance_ms`).
///
/// Spacing of several whole periods passes: missing coverage is tracked by
/// the gap scan, never by placeholder records, so a hole between two candles
/// is legal here.
///
/// # Errors
/// Returns [`TickrError::Integrity`] naming the first offending candle.
pub fn validate_series(
    candles: &[Candle],
    timeframe: Timeframe,
    tolerance_ms: i64,
) -> Result<(), TickrError> {
    let period = timeframe.period_ms();
    for c in candles {
        let off = boundary_offset(c.open_time, period);
        if off > tolerance_ms {
            return Err(TickrError::integrity(format!(
                "candle at {} is {off}ms off the {timeframe} boundary",
                c.open_time
            )));
        }
    }
    for pair in candles.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if b.open_time <= a.open_time {
            return Err(TickrError::integrity(format!(
                "open times are not strictly increasing: {} then {}",
                a.open_time, b.open_time
            )));
        }
        let spacing = b.open_time - a.open_time;
        if spacing + tolerance_ms < period {
            return Err(TickrError::integrity(format!(
                "{spacing}ms between candles at {} and {} is below the {timeframe} period",
                a.open_time, b.open_time
            )));
        }
    }
    Ok(())
}
