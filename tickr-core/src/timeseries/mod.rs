//! Time-series logic over candle series.
//!
//! Modules:
//! - `gaps`: boundary-walk gap detection producing lazy, restartable scans
//! - `merge`: union merge with incoming-wins collision handling
//! - `validate`: series invariant checks (ordering, alignment, spacing)
//! - `resample`: aggregation of a fine series into a coarser timeframe

/// Gap detection over granularity-aligned boundaries.
pub mod gaps;
/// Union merge of an incoming batch into an existing series.
pub mod merge;
/// Resampling a series to a coarser supported timeframe.
pub mod resample;
/// Series invariant validation.
pub mod validate;
