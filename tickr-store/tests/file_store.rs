use tickr_store::{FileStore, SeriesStore, VersionedSeries};
use tickr_types::{Candle, Series, SeriesKey, TickrError, Timeframe};

fn c(open_time: i64, px: f64) -> Candle {
    Candle::new(open_time, px, px, px, px, 1.0)
}

fn minute_series(idxs: &[i64]) -> Series {
    Series::from_sorted(idxs.iter().map(|i| c(i * 60_000, 100.0)).collect())
}

fn key() -> SeriesKey {
    SeriesKey::new("binance", "BTC/USDT", Timeframe::M1)
}

#[tokio::test]
async fn missing_key_loads_empty_at_version_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let loaded = store.load(&key()).await.unwrap();
    assert_eq!(loaded, VersionedSeries::empty());
}

#[tokio::test]
async fn save_then_load_round_trips_with_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let series = minute_series(&[0, 1, 2]);

    let v1 = store.save(&key(), &series, 0).await.unwrap();
    assert_eq!(v1, 1);

    let loaded = store.load(&key()).await.unwrap();
    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.series, series);

    let v2 = store.save(&key(), &minute_series(&[0, 1, 2, 3]), 1).await.unwrap();
    assert_eq!(v2, 2);
}

#[tokio::test]
async fn stale_version_is_refused_and_nothing_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let current = minute_series(&[0, 1]);
    store.save(&key(), &current, 0).await.unwrap();

    let err = store
        .save(&key(), &minute_series(&[5, 6]), 0)
        .await
        .unwrap_err();
    match err {
        TickrError::Conflict { expected, found, .. } => {
            assert_eq!(expected, 0);
            assert_eq!(found, 1);
        }
        other => panic!("expected Conflict, got {other:?}"),
    }

    // The winner's artifact is untouched.
    let loaded = store.load(&key()).await.unwrap();
    assert_eq!(loaded.series, current);
    assert_eq!(loaded.version, 1);
}

#[tokio::test]
async fn two_writers_with_the_same_snapshot_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let k = key();

    let series_a = minute_series(&[0]);
    let series_b = minute_series(&[1]);
    let a = store.save(&k, &series_a, 0);
    let b = store.save(&k, &series_b, 0);
    let (ra, rb) = tokio::join!(a, b);

    assert!(ra.is_ok() != rb.is_ok(), "exactly one writer must win");
    let loser = if ra.is_ok() { rb } else { ra };
    assert_eq!(loser.unwrap_err().kind(), "ConflictError");
    assert_eq!(store.load(&k).await.unwrap().version, 1);
}

#[tokio::test]
async fn loser_reloads_and_retries_at_the_new_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let k = key();

    store.save(&k, &minute_series(&[0]), 0).await.unwrap();
    assert!(store.save(&k, &minute_series(&[1]), 0).await.is_err());

    let fresh = store.load(&k).await.unwrap();
    let v2 = store
        .save(&k, &minute_series(&[0, 1]), fresh.version)
        .await
        .unwrap();
    assert_eq!(v2, 2);
}

#[tokio::test]
async fn keys_are_fully_independent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let btc = SeriesKey::new("binance", "BTC/USDT", Timeframe::M1);
    let eth = SeriesKey::new("binance", "ETH/USDT", Timeframe::M1);
    let btc_5m = SeriesKey::new("binance", "BTC/USDT", Timeframe::M5);

    assert_eq!(store.save(&btc, &minute_series(&[0]), 0).await.unwrap(), 1);
    assert_eq!(store.save(&eth, &minute_series(&[0]), 0).await.unwrap(), 1);
    assert_eq!(
        store
            .save(&btc_5m, &Series::from_sorted(vec![c(0, 1.0)]), 0)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn symbol_separators_are_sanitized_in_paths() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    store.save(&key(), &minute_series(&[0]), 0).await.unwrap();

    let expected = dir.path().join("binance").join("BTC-USDT").join("1m.json");
    assert!(expected.is_file());
    assert_eq!(store.artifact_path(&key()), expected);
}

#[tokio::test]
async fn unsorted_artifact_loads_as_integrity_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let path = store.artifact_path(&key());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{"version":1,"updated_at":"2024-01-01T00:00:00Z","candles":[
            {"open_time":120000,"open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":1.0},
            {"open_time":60000,"open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":1.0}
        ]}"#,
    )
    .unwrap();

    let err = store.load(&key()).await.unwrap_err();
    assert_eq!(err.kind(), "IntegrityError");
}

#[tokio::test]
async fn malformed_artifact_loads_as_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let path = store.artifact_path(&key());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"not json").unwrap();

    let err = store.load(&key()).await.unwrap_err();
    assert_eq!(err.kind(), "StorageError");
}

#[tokio::test]
async fn unsorted_series_is_refused_at_save() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    let broken = Series::from_sorted(vec![c(120_000, 1.0), c(60_000, 1.0)]);

    let err = store.save(&key(), &broken, 0).await.unwrap_err();
    assert_eq!(err.kind(), "IntegrityError");
    assert!(store.load(&key()).await.unwrap().series.is_empty());
}
