//! Shared vocabulary for the `tickr` workspace: candles, series, timeframes,
//! gap ranges, configuration, and the error taxonomy.
#![warn(missing_docs)]

mod candle;
mod config;
mod error;
mod gap;
mod key;
mod reports;
mod series;
mod timeframe;

pub use candle::Candle;
pub use config::{BackoffConfig, RetryConfig, SyncConfig};
pub use error::TickrError;
pub use gap::GapRange;
pub use key::SeriesKey;
pub use reports::{FinalRange, RangeOutcome, RangeStatus, SyncResult};
pub use series::Series;
pub use timeframe::Timeframe;
