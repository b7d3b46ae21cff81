//! Unified error taxonomy for the tickr workspace.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the tickr workspace.
///
/// Variants map one-to-one onto the retry semantics the orchestrator applies:
/// [`Fetch`](Self::Fetch) is retried with backoff, [`Conflict`](Self::Conflict)
/// is retried with a reload and re-merge, and everything else is surfaced to
/// the caller unchanged.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TickrError {
    /// Invalid input: a malformed range, timeframe, or argument.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A fetch attempt failed for a reason worth retrying (network, upstream outage).
    #[error("fetch failed for {symbol}: {msg}")]
    Fetch {
        /// Symbol the fetch was issued for.
        symbol: String,
        /// Human-readable failure description.
        msg: String,
    },

    /// The requested operation or timeframe is not supported.
    #[error("not supported: {what}")]
    NotSupported {
        /// Description of the unsupported request, e.g. "timeframe 1M".
        what: String,
    },

    /// Merged or loaded data violates a series invariant.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// Optimistic-concurrency conflict: the stored version moved under the writer.
    #[error("version conflict for {key}: expected {expected}, found {found}")]
    Conflict {
        /// Display form of the series key that conflicted.
        key: String,
        /// Version the writer loaded and expected to still be current.
        expected: u64,
        /// Version actually found in the store at save time.
        found: u64,
    },

    /// Conflict retries were exhausted without a successful save.
    #[error("concurrency retries exhausted for {key} after {attempts} attempts")]
    ConcurrencyExhausted {
        /// Display form of the series key being saved.
        key: String,
        /// Number of save attempts made before giving up.
        attempts: u32,
    },

    /// Underlying storage failure (I/O or artifact encoding).
    #[error("storage error: {0}")]
    Storage(String),
}

impl TickrError {
    /// Build a [`Validation`](Self::Validation) error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`Fetch`](Self::Fetch) error for `symbol`.
    #[must_use]
    pub fn fetch(symbol: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Fetch {
            symbol: symbol.into(),
            msg: msg.into(),
        }
    }

    /// Build a [`NotSupported`](Self::NotSupported) error.
    #[must_use]
    pub fn not_supported(what: impl Into<String>) -> Self {
        Self::NotSupported { what: what.into() }
    }

    /// Build an [`Integrity`](Self::Integrity) error.
    #[must_use]
    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    /// Build a [`Storage`](Self::Storage) error.
    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// True for failures the orchestrator retries with backoff.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// True when the caller should reload, re-merge, and try the save again.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Stable kind name for exit reporting and structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Fetch { .. } => "FetchError",
            Self::NotSupported { .. } => "NotSupportedError",
            Self::Integrity(_) => "IntegrityError",
            Self::Conflict { .. } => "ConflictError",
            Self::ConcurrencyExhausted { .. } => "ConcurrencyExhaustedError",
            Self::Storage(_) => "StorageError",
        }
    }
}

impl From<std::io::Error> for TickrError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TickrError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
