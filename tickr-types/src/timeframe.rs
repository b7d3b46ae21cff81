//! Supported candle timeframes and their fixed period lengths.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TickrError;

/// Fixed-length candle period.
///
/// Calendar months are deliberately absent: a month has no fixed length in
/// milliseconds, so monthly candles cannot be boundary-aligned or gap-scanned
/// the way these periods can. Parsing `"1M"` fails with
/// [`TickrError::NotSupported`]; anything else unrecognized fails with
/// [`TickrError::Validation`]. Labels are case-sensitive (`1m` is one minute,
/// `1M` is the rejected month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    /// One minute.
    #[serde(rename = "1m")]
    M1,
    /// Five minutes.
    #[serde(rename = "5m")]
    M5,
    /// Fifteen minutes.
    #[serde(rename = "15m")]
    M15,
    /// One hour.
    #[serde(rename = "1h")]
    H1,
    /// Six hours.
    #[serde(rename = "6h")]
    H6,
    /// Twelve hours.
    #[serde(rename = "12h")]
    H12,
    /// One day.
    #[serde(rename = "1d")]
    D1,
    /// One week.
    #[serde(rename = "1w")]
    W1,
}

impl Timeframe {
    /// Every supported timeframe, finest first.
    pub const ALL: [Self; 8] = [
        Self::M1,
        Self::M5,
        Self::M15,
        Self::H1,
        Self::H6,
        Self::H12,
        Self::D1,
        Self::W1,
    ];

    /// Period length in milliseconds.
    #[must_use]
    pub const fn period_ms(self) -> i64 {
        match self {
            Self::M1 => 60_000,
            Self::M5 => 300_000,
            Self::M15 => 900_000,
            Self::H1 => 3_600_000,
            Self::H6 => 21_600_000,
            Self::H12 => 43_200_000,
            Self::D1 => 86_400_000,
            Self::W1 => 604_800_000,
        }
    }

    /// Canonical wire label, e.g. `"5m"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::M15 => "15m",
            Self::H1 => "1h",
            Self::H6 => "6h",
            Self::H12 => "12h",
            Self::D1 => "1d",
            Self::W1 => "1w",
        }
    }

    /// Floor `ts` to the nearest period boundary at or before it.
    #[must_use]
    pub const fn align_down(self, ts: i64) -> i64 {
        ts - ts.rem_euclid(self.period_ms())
    }

    /// Ceil `ts` to the nearest period boundary at or after it.
    #[must_use]
    pub const fn align_up(self, ts: i64) -> i64 {
        let rem = ts.rem_euclid(self.period_ms());
        if rem == 0 { ts } else { ts + (self.period_ms() - rem) }
    }

    /// True when `ts` sits exactly on a period boundary.
    #[must_use]
    pub const fn is_aligned(self, ts: i64) -> bool {
        ts.rem_euclid(self.period_ms()) == 0
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TickrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Self::M1),
            "5m" => Ok(Self::M5),
            "15m" => Ok(Self::M15),
            "1h" => Ok(Self::H1),
            "6h" => Ok(Self::H6),
            "12h" => Ok(Self::H12),
            "1d" => Ok(Self::D1),
            "1w" => Ok(Self::W1),
            "1M" => Err(TickrError::not_supported(
                "timeframe 1M: calendar months are not fixed-length; maximum is 1w",
            )),
            other => Err(TickrError::validation(format!(
                "unrecognized timeframe: {other}"
            ))),
        }
    }
}
