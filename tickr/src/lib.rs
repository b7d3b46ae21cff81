//! Tickr keeps locally stored OHLCV candle series in sync with a market
//! data source.
//!
//! Overview
//! - Scans stored series for coverage gaps and fetches only the missing
//!   spans, page by page, through a [`FetchAdapter`].
//! - Merges fetched candles incoming-wins: revised history replaces stale
//!   stored records while identical redeliveries change nothing.
//! - Persists through a [`SeriesStore`] guarded by optimistic version
//!   tokens; a lost race reloads, re-merges, and retries within a bounded
//!   budget instead of clobbering the winner.
//! - Reports outcomes per range, so one exhausted or failed span never
//!   poisons its siblings.
//!
//! Key behaviors and trade-offs
//! - Idempotence: syncing covered ground fetches nothing and skips the
//!   save entirely, so versions only move when data does.
//! - Conflicts: candles fetched before a lost race are carried into the
//!   retry; losing costs a reload and a re-merge, never a second fetch.
//! - Exhaustion: a source that runs out of history ends the range as
//!   [`RangeStatus::Exhausted`] and keeps what it returned; re-asking later
//!   is cheap because the gap scan starts from stored coverage.
//! - Ranges are half-open `[start, end)` and widen outward to period
//!   boundaries; the candle still forming now is never fetched.
//!
//! Examples
//! Backfilling one series and reading it back:
//! ```rust,ignore
//! use tickr::{FileStore, SeriesKey, Tickr, Timeframe};
//!
//! let adapter = MyExchangeAdapter::new();
//! let store = FileStore::new("data")?;
//! let tickr = Tickr::builder(adapter, store)
//!     .window_periods(500)
//!     .max_page_size(1000)
//!     .build()?;
//!
//! let key = SeriesKey::new("binance", "BTC-USDT", Timeframe::M1);
//! let result = tickr.sync_range(&key, start_ms, end_ms).await?;
//! println!("added {} over {} ranges", result.added, result.ranges.len());
//!
//! let recent = tickr.get_candles(&key, None, None).await?;
//! let hourly = tickr.resample_to(&key, Timeframe::H1).await?;
//! ```
//!
//! Keeping a whole watchlist fresh:
//! ```rust,ignore
//! let keys = vec![
//!     SeriesKey::new("binance", "BTC-USDT", Timeframe::M1),
//!     SeriesKey::new("binance", "ETH-USDT", Timeframe::M1),
//! ];
//! for (key, result) in tickr.sync_many(&keys).await {
//!     match result {
//!         Ok(r) => println!("{key}: +{}", r.added),
//!         Err(err) => eprintln!("{key}: {err}"),
//!     }
//! }
//! ```
#![warn(missing_docs)]

mod backoff;
pub(crate) mod core;
mod query;
mod sync;

pub use crate::core::{Tickr, TickrBuilder};

pub use tickr_core::{
    FetchAdapter, GapScan, MergeOutcome, find_gaps, merge, resample, validate_series,
};
pub use tickr_store::{FileStore, SeriesStore, VersionedSeries};

// Re-export the domain types so downstream code can depend on `tickr` alone.
pub use tickr_types::{
    BackoffConfig, Candle, FinalRange, GapRange, RangeOutcome, RangeStatus, RetryConfig, Series,
    SeriesKey, SyncConfig, SyncResult, TickrError, Timeframe,
};
