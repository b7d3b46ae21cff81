use async_trait::async_trait;

use tickr_types::{Candle, TickrError, Timeframe};

/// Capability boundary for exchange history sources.
///
/// Concrete exchange connectivity lives outside the core; the orchestrator
/// only requires this narrow fetch surface. One adapter instance is passed in
/// per sync unit, so there is no process-wide client state.
#[async_trait]
pub trait FetchAdapter: Send + Sync {
    /// A stable identifier for logs and error messages, e.g. `"replay"`.
    fn name(&self) -> &'static str;

    /// Exact timeframes this source can natively serve.
    ///
    /// The orchestrator rejects a sync for an unadvertised timeframe before
    /// issuing any fetch.
    fn supported_timeframes(&self) -> &'static [Timeframe] {
        &Timeframe::ALL
    }

    /// Fetch up to `limit` candles at `timeframe`, starting at the first
    /// candle whose `open_time` is at or after `since` (epoch milliseconds).
    ///
    /// Returned candles are ascending by `open_time` and aligned to the
    /// timeframe. An empty page signals exhaustion: the source has no data at
    /// or after `since`. That is a terminal condition for the range being
    /// filled, not an error.
    ///
    /// # Errors
    /// - [`TickrError::Fetch`] for transient failures worth retrying.
    /// - [`TickrError::NotSupported`] when the timeframe is not served.
    async fn fetch(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        since: i64,
        limit: u32,
    ) -> Result<Vec<Candle>, TickrError>;

    /// Whether `timeframe` appears in [`supported_timeframes`](Self::supported_timeframes).
    fn supports_timeframe(&self, timeframe: Timeframe) -> bool {
        self.supported_timeframes().contains(&timeframe)
    }
}
