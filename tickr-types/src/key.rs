//! Series identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timeframe::Timeframe;

/// Composite identity of one stored series: (exchange, symbol, timeframe).
///
/// Sync units keyed differently are fully independent; the store keeps one
/// artifact per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesKey {
    /// Exchange identifier, e.g. `"binance"`.
    pub exchange: String,
    /// Instrument symbol, e.g. `"BTC/USDT"`.
    pub symbol: String,
    /// Candle timeframe.
    pub timeframe: Timeframe,
}

impl SeriesKey {
    /// Construct a key from its parts.
    #[must_use]
    pub fn new(exchange: impl Into<String>, symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            exchange: exchange.into(),
            symbol: symbol.into(),
            timeframe,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.exchange, self.symbol, self.timeframe)
    }
}
