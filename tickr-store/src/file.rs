//! File-backed series store, one JSON artifact per key.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use tickr_types::{Candle, Series, SeriesKey, TickrError};

use crate::store::{SeriesStore, VersionedSeries};

/// Versioned JSON envelope written to disk for one series.
#[derive(Debug, Serialize, Deserialize)]
struct SeriesArtifact {
    version: u64,
    updated_at: DateTime<Utc>,
    candles: Series,
}

/// Just the version field, for the pre-write check.
#[derive(Debug, Deserialize)]
struct VersionProbe {
    version: u64,
}

/// File-backed [`SeriesStore`]: one JSON artifact per key under a data root,
/// laid out as `<root>/<exchange>/<symbol>/<timeframe>.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// reader sees either the previous artifact or the new one. Saves for the
/// same key are serialized through an in-process per-key lock; the version
/// token in the envelope is what protects against writers in other
/// processes.
#[derive(Debug)]
pub struct FileStore {
    data_root: PathBuf,
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl FileStore {
    /// Open a store rooted at `data_root`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns [`TickrError::Storage`] when the root cannot be created.
    pub fn new<P: AsRef<Path>>(data_root: P) -> Result<Self, TickrError> {
        let data_root = data_root.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_root)?;
        Ok(Self {
            data_root,
            locks: DashMap::new(),
        })
    }

    /// The directory all artifacts live under.
    #[must_use]
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Artifact path for `key`. Symbol separators like `/` in `"BTC/USDT"`
    /// would otherwise nest directories, so path-hostile characters are
    /// replaced.
    #[must_use]
    pub fn artifact_path(&self, key: &SeriesKey) -> PathBuf {
        self.data_root
            .join(sanitize(&key.exchange))
            .join(sanitize(&key.symbol))
            .join(format!("{}.json", key.timeframe))
    }

    fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        self.locks
            .entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn sanitize(part: &str) -> String {
    part.replace(['/', '\\', ':'], "-")
}

fn read_artifact(path: &Path) -> Result<Option<SeriesArtifact>, TickrError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn probe_version(path: &Path) -> Result<u64, TickrError> {
    match std::fs::read(path) {
        Ok(bytes) => {
            let probe: VersionProbe = serde_json::from_slice(&bytes)?;
            Ok(probe.version)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(0),
        Err(err) => Err(err.into()),
    }
}

/// The artifact contract: strictly increasing open times, no duplicates.
/// Timeframe-aware spacing checks belong to the merge path.
fn ensure_sorted(candles: &[Candle]) -> Result<(), TickrError> {
    for pair in candles.windows(2) {
        if pair[1].open_time <= pair[0].open_time {
            return Err(TickrError::integrity(format!(
                "artifact candles are not strictly increasing: {} then {}",
                pair[0].open_time, pair[1].open_time
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl SeriesStore for FileStore {
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn load(&self, key: &SeriesKey) -> Result<VersionedSeries, TickrError> {
        let path = self.artifact_path(key);
        let Some(artifact) = read_artifact(&path)? else {
            return Ok(VersionedSeries::empty());
        };
        ensure_sorted(artifact.candles.as_slice())?;
        debug!(
            version = artifact.version,
            candles = artifact.candles.len(),
            "series loaded"
        );
        Ok(VersionedSeries {
            series: artifact.candles,
            version: artifact.version,
        })
    }

    #[tracing::instrument(skip(self, key, series), fields(key = %key, candles = series.len()))]
    async fn save(
        &self,
        key: &SeriesKey,
        series: &Series,
        expected_version: u64,
    ) -> Result<u64, TickrError> {
        ensure_sorted(series.as_slice())?;
        let path = self.artifact_path(key);
        let lock = self.lock_for(&path);
        let _guard = lock.lock().await;

        let found = probe_version(&path)?;
        if found != expected_version {
            warn!(
                expected = expected_version,
                found, "save refused: version moved under the writer"
            );
            return Err(TickrError::Conflict {
                key: key.to_string(),
                expected: expected_version,
                found,
            });
        }

        let artifact = SeriesArtifact {
            version: expected_version + 1,
            updated_at: Utc::now(),
            candles: series.clone(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename keeps the artifact whole for concurrent readers.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(&artifact)?)?;
        std::fs::rename(&tmp, &path)?;
        debug!(version = artifact.version, "series saved");
        Ok(artifact.version)
    }
}
