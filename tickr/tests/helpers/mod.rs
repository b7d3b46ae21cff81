// Shared fixtures for the orchestrator integration tests.
#![allow(dead_code)]

use tempfile::TempDir;
use tickr::{BackoffConfig, Candle, FileStore, RetryConfig, SeriesKey, Timeframe};

/// One minute in epoch milliseconds.
pub const MINUTE_MS: i64 = 60_000;

/// The key most tests sync against.
pub fn btc_m1() -> SeriesKey {
    SeriesKey::new("binance", "BTC-USDT", Timeframe::M1)
}

/// Candles on each listed minute boundary, priced `100 + minute` so a test
/// can tell where a value came from.
pub fn minutes(idxs: &[i64]) -> Vec<Candle> {
    idxs.iter()
        .map(|&i| {
            let px = 100.0 + i as f64;
            Candle::new(i * MINUTE_MS, px, px, px, px, 1.0)
        })
        .collect()
}

/// A file store rooted in a fresh temp dir; keep the guard alive for the
/// duration of the test.
pub fn temp_store() -> (TempDir, FileStore) {
    let dir = TempDir::new().expect("temp dir");
    let store = FileStore::new(dir.path()).expect("store root");
    (dir, store)
}

/// Retry policy with near-zero deterministic backoff so failure-path tests
/// do not spend wall-clock time sleeping.
pub fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig {
        max_retries,
        backoff: BackoffConfig {
            min_backoff_ms: 1,
            max_backoff_ms: 2,
            factor: 1,
            jitter_percent: 0,
        },
    }
}
