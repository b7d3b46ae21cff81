//! Report envelopes produced by the sync orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::TickrError;
use crate::gap::GapRange;

/// Inclusive span of open times present in a stored series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalRange {
    /// Earliest stored `open_time`.
    pub first_open_time: i64,
    /// Latest stored `open_time`.
    pub last_open_time: i64,
}

/// Terminal state of one gap range within a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeStatus {
    /// The fetch walked the whole range without the source running dry.
    Filled,
    /// The adapter ran out of history before the range was covered; what was
    /// fetched is kept.
    Exhausted,
    /// The range was abandoned after fetch retries ran out; sibling ranges
    /// are unaffected.
    Failed,
}

/// What happened to a single gap range during a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOutcome {
    /// The gap the orchestrator tried to fill.
    pub range: GapRange,
    /// How the attempt ended.
    pub status: RangeStatus,
    /// Candles fetched for this range across all pages.
    pub fetched: usize,
    /// The terminal error for [`RangeStatus::Failed`] ranges.
    pub error: Option<TickrError>,
}

/// Summary of one sync transaction.
///
/// Partial success is structural: a failed range shows up in `ranges` with
/// its error while the counts reflect everything that was still merged and
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyncResult {
    /// Candles newly added to the series.
    pub added: usize,
    /// Existing candles replaced by an incoming revision.
    pub overwritten: usize,
    /// Span of the persisted series after the sync, `None` when still empty.
    pub final_range: Option<FinalRange>,
    /// Per-gap outcomes, ascending by range start.
    pub ranges: Vec<RangeOutcome>,
    /// Save attempts that hit a version conflict and were retried.
    pub conflict_retries: u32,
}

impl SyncResult {
    /// True when no range was abandoned.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.ranges
            .iter()
            .all(|r| !matches!(r.status, RangeStatus::Failed))
    }

    /// Ranges that were abandoned, with their errors.
    pub fn failed_ranges(&self) -> impl Iterator<Item = &RangeOutcome> {
        self.ranges
            .iter()
            .filter(|r| matches!(r.status, RangeStatus::Failed))
    }
}
