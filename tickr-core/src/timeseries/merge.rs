//! Union merge of an incoming candle batch into an existing series.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tickr_types::{Candle, Series, TickrError, Timeframe};

use crate::timeseries::validate::validate_series;

/// Result of one merge: the merged series plus what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// The merged series, sorted and validated.
    pub series: Series,
    /// Incoming candles whose `open_time` was not yet present.
    pub added: usize,
    /// Existing candles replaced by a differing incoming record. An incoming
    /// candle identical to the stored one counts as neither.
    pub overwritten: usize,
}

/// Merge `incoming` into `existing`, keyed by `open_time`, incoming wins.
///
/// The union is rebuilt through a `BTreeMap`, so the output is sorted and
/// duplicate-free regardless of input interleaving; merging the same batch
/// twice yields the same series with `added == 0`. On a key collision the
/// incoming record replaces the stored one, which is how revised candles
/// from an exchange supersede what an earlier fetch wrote.
///
/// The merged series is validated before it is returned, so a caller can
/// persist the result without re-checking.
///
/// # Errors
/// Returns [`TickrError::Integrity`] when the merged series has a candle off
/// the `timeframe` boundary or two candles closer than one period, judged
/// against `tolerance_ms`.
pub fn merge(
    existing: &Series,
    incoming: &Series,
    timeframe: Timeframe,
    tolerance_ms: i64,
) -> Result<MergeOutcome, TickrError> {
    let mut by_open: BTreeMap<i64, Candle> = existing.iter().map(|c| (c.open_time, *c)).collect();
    let mut added = 0usize;
    let mut overwritten = 0usize;
    for c in incoming {
        match by_open.entry(c.open_time) {
            Entry::Vacant(slot) => {
                slot.insert(*c);
                added += 1;
            }
            Entry::Occupied(mut slot) => {
                if slot.get() != c {
                    slot.insert(*c);
                    overwritten += 1;
                }
            }
        }
    }
    let candles: Vec<Candle> = by_open.into_values().collect();
    validate_series(&candles, timeframe, tolerance_ms)?;
    Ok(MergeOutcome {
        series: Series::from_sorted(candles),
        added,
        overwritten,
    })
}
