//! The canonical OHLCV data point.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV aggregate over a single timeframe period.
///
/// `open_time` is the period start in epoch milliseconds (UTC) and is the
/// unique key of the candle within its series; it must sit exactly on a
/// boundary of the series timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Period start, epoch milliseconds UTC, aligned to the timeframe boundary.
    pub open_time: i64,
    /// First traded price in the period.
    pub open: f64,
    /// Highest traded price in the period.
    pub high: f64,
    /// Lowest traded price in the period.
    pub low: f64,
    /// Last traded price in the period.
    pub close: f64,
    /// Total traded base volume in the period.
    pub volume: f64,
}

impl Candle {
    /// Construct a candle from raw fields.
    #[must_use]
    pub const fn new(open_time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// The period start as a UTC datetime, for display at the edges.
    ///
    /// Returns `None` if `open_time` is outside the representable chrono
    /// range. All arithmetic in the workspace stays in epoch milliseconds.
    #[must_use]
    pub fn open_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.open_time).single()
    }
}
