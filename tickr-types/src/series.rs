//! Ordered candle series.

use serde::{Deserialize, Serialize};

use crate::candle::Candle;

/// Ordered candle series, strictly increasing by `open_time`, no duplicates.
///
/// The ordering invariant is established by the merge and validation paths;
/// the constructors here either start empty or trust the caller, which keeps
/// the merge engine and the store the only writers. Serializes transparently
/// as a JSON array of candles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    candles: Vec<Candle>,
}

impl Series {
    /// An empty series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            candles: Vec::new(),
        }
    }

    /// Wrap candles already sorted strictly ascending by `open_time`.
    ///
    /// The caller guarantees ordering and uniqueness; the merge and load
    /// paths re-validate before trusting data from outside the process.
    #[must_use]
    pub fn from_sorted(candles: Vec<Candle>) -> Self {
        Self { candles }
    }

    /// Number of candles stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// True when no candles are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// All candles, ascending by `open_time`.
    #[must_use]
    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    /// Iterator over the candles in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    /// Earliest candle, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Candle> {
        self.candles.first()
    }

    /// Latest candle, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// `open_time` of the earliest candle.
    #[must_use]
    pub fn first_open_time(&self) -> Option<i64> {
        self.candles.first().map(|c| c.open_time)
    }

    /// `open_time` of the latest candle.
    #[must_use]
    pub fn last_open_time(&self) -> Option<i64> {
        self.candles.last().map(|c| c.open_time)
    }

    /// True when a candle with exactly this `open_time` is present.
    #[must_use]
    pub fn contains_open_time(&self, open_time: i64) -> bool {
        self.candles
            .binary_search_by_key(&open_time, |c| c.open_time)
            .is_ok()
    }

    /// Candles with `start <= open_time < end`; empty when `start >= end`.
    #[must_use]
    pub fn slice(&self, start: i64, end: i64) -> &[Candle] {
        let lo = self.candles.partition_point(|c| c.open_time < start);
        let hi = self.candles.partition_point(|c| c.open_time < end);
        &self.candles[lo..hi.max(lo)]
    }

    /// Drop the oldest candles until at most `max_len` remain.
    pub fn trim_front(&mut self, max_len: usize) {
        if self.candles.len() > max_len {
            let excess = self.candles.len() - max_len;
            self.candles.drain(..excess);
        }
    }

    /// Consume the series, yielding the underlying candles.
    #[must_use]
    pub fn into_candles(self) -> Vec<Candle> {
        self.candles
    }
}

impl IntoIterator for Series {
    type Item = Candle;
    type IntoIter = std::vec::IntoIter<Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.into_iter()
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
