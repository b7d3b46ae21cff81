//! The versioned persistence boundary.

use async_trait::async_trait;

use tickr_types::{Series, SeriesKey, TickrError};

/// A stored series together with the version token it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedSeries {
    /// The candles on record for the key.
    pub series: Series,
    /// Monotonic version token; `0` means the key has never been stored.
    pub version: u64,
}

impl VersionedSeries {
    /// The state of a key that has never been written.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            series: Series::new(),
            version: 0,
        }
    }
}

/// Persistence for candle series with optimistic concurrency.
///
/// Every save names the version the writer loaded. If the stored version has
/// moved in the meantime the save is refused with
/// [`TickrError::Conflict`] and nothing is written; the writer is expected
/// to reload, re-merge its data onto the fresh series, and try again. There
/// is no force-overwrite path, so a concurrent writer can never silently
/// clobber another's candles.
///
/// Writes must be atomic per key: a reader sees either the previous series
/// or the new one, never a torn artifact.
#[async_trait]
pub trait SeriesStore: Send + Sync {
    /// Load the series and its current version token.
    ///
    /// A key that has never been stored loads as an empty series at version
    /// `0`; saving against version `0` is how the first write happens.
    ///
    /// # Errors
    /// - [`TickrError::Integrity`] when the stored artifact violates the
    ///   series ordering invariant.
    /// - [`TickrError::Storage`] for I/O or decoding failures.
    async fn load(&self, key: &SeriesKey) -> Result<VersionedSeries, TickrError>;

    /// Persist `series` for `key`, expecting the stored version to still be
    /// `expected_version`. Returns the new version token.
    ///
    /// # Errors
    /// - [`TickrError::Conflict`] when the stored version differs from
    ///   `expected_version`; the store is left untouched.
    /// - [`TickrError::Integrity`] when `series` violates the ordering
    ///   invariant; nothing partial is written.
    /// - [`TickrError::Storage`] for I/O or encoding failures.
    async fn save(
        &self,
        key: &SeriesKey,
        series: &Series,
        expected_version: u64,
    ) -> Result<u64, TickrError>;
}
