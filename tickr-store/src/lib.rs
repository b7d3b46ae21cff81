//! tickr-store
//!
//! Versioned persistence for candle series.
//!
//! The [`SeriesStore`] trait is the optimistic-concurrency boundary the sync
//! orchestrator writes through: loads carry a version token, saves name the
//! token they expect, and a moved version refuses the write instead of
//! clobbering it. [`FileStore`] is the reference implementation, keeping one
//! JSON artifact per `(exchange, symbol, timeframe)` key under a data root.
#![warn(missing_docs)]

mod file;
mod store;

pub use file::FileStore;
pub use store::{SeriesStore, VersionedSeries};
