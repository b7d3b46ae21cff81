//! Missing-coverage ranges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timeframe::Timeframe;

/// Half-open interval `[start, end)` of missing coverage, in epoch
/// milliseconds, aligned to the granularity the scan ran at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GapRange {
    /// First missing boundary (inclusive).
    pub start: i64,
    /// End of the missing span (exclusive).
    pub end: i64,
}

impl GapRange {
    /// Construct a half-open range.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// True when the range covers nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Span length in milliseconds, zero for empty ranges.
    #[must_use]
    pub const fn duration_ms(&self) -> i64 {
        let d = self.end - self.start;
        if d > 0 { d } else { 0 }
    }

    /// Number of whole `timeframe` periods the range covers.
    #[must_use]
    pub const fn period_count(&self, timeframe: Timeframe) -> u64 {
        (self.duration_ms() / timeframe.period_ms()) as u64
    }
}

impl fmt::Display for GapRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
