//! Fetch adapter that replays candles from a JSON fixture file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tickr::{Candle, FetchAdapter, TickrError, Timeframe};

/// One symbol's scripted candles inside a fixture file.
#[derive(Debug, Deserialize)]
struct ReplayEntry {
    symbol: String,
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

/// Serves candles from a fixture instead of a network source, so a sync can
/// be rehearsed offline and always produces the same store.
#[derive(Debug)]
pub struct ReplayAdapter {
    entries: HashMap<(String, Timeframe), Vec<Candle>>,
}

impl ReplayAdapter {
    /// Load a fixture: a JSON array of `{symbol, timeframe, candles}`
    /// entries. Candles are sorted on load; the fixture order does not
    /// matter.
    ///
    /// # Errors
    /// Returns [`TickrError::Storage`] when the file cannot be read or
    /// parsed.
    pub fn from_path(path: &Path) -> Result<Self, TickrError> {
        let bytes = fs::read(path)?;
        Self::from_json_slice(&bytes)
    }

    fn from_json_slice(bytes: &[u8]) -> Result<Self, TickrError> {
        let parsed: Vec<ReplayEntry> = serde_json::from_slice(bytes)?;
        let mut entries = HashMap::new();
        for entry in parsed {
            let mut candles = entry.candles;
            candles.sort_by_key(|c| c.open_time);
            entries.insert((entry.symbol, entry.timeframe), candles);
        }
        Ok(Self { entries })
    }
}

#[async_trait]
impl FetchAdapter for ReplayAdapter {
    fn name(&self) -> &'static str {
        "replay"
    }

    async fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: i64,
        limit: u32,
    ) -> Result<Vec<Candle>, TickrError> {
        let Some(candles) = self.entries.get(&(symbol.to_string(), timeframe)) else {
            return Ok(Vec::new());
        };
        Ok(candles
            .iter()
            .filter(|c| c.open_time >= since)
            .take(limit as usize)
            .copied()
            .collect())
    }
}
