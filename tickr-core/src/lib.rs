//! tickr-core
//!
//! Core traits and time-series logic shared across the tickr workspace.
//!
//! - `adapter`: the [`FetchAdapter`] boundary to exchange history sources.
//! - `timeseries`: gap detection, merge, series validation, and resampling.
//!
//! The sync orchestrator in the `tickr` crate drives these pieces; nothing
//! here performs I/O or holds state beyond one call. Gap scans and merges are
//! deterministic given the same inputs, which is what makes sync runs
//! idempotent and safely retryable.
#![warn(missing_docs)]

/// The `FetchAdapter` capability trait for exchange history sources.
pub mod adapter;
/// Gap detection, merge, validation, and resampling over candle series.
pub mod timeseries;

pub use adapter::FetchAdapter;
pub use timeseries::gaps::{GapScan, find_gaps};
pub use timeseries::merge::{MergeOutcome, merge};
pub use timeseries::resample::resample;
pub use timeseries::validate::validate_series;

pub use tickr_types::{
    Candle, GapRange, Series, SeriesKey, SyncConfig, TickrError, Timeframe,
};
