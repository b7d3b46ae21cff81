use async_trait::async_trait;
use tickr_core::FetchAdapter;
use tickr_types::{Candle, TickrError, Timeframe};

struct MinuteOnly;

#[async_trait]
impl FetchAdapter for MinuteOnly {
    fn name(&self) -> &'static str {
        "minute-only"
    }

    fn supported_timeframes(&self) -> &'static [Timeframe] {
        &[Timeframe::M1]
    }

    async fn fetch(
        &self,
        _symbol: &str,
        timeframe: Timeframe,
        since: i64,
        limit: u32,
    ) -> Result<Vec<Candle>, TickrError> {
        if timeframe != Timeframe::M1 {
            return Err(TickrError::not_supported(format!(
                "timeframe {timeframe} is not served by {}",
                self.name()
            )));
        }
        let start = timeframe.align_up(since);
        Ok((0..i64::from(limit))
            .map(|i| {
                let ts = start + i * 60_000;
                Candle::new(ts, 1.0, 1.0, 1.0, 1.0, 1.0)
            })
            .collect())
    }
}

#[tokio::test]
async fn advertised_timeframes_drive_the_default_support_check() {
    let adapter = MinuteOnly;
    assert!(adapter.supports_timeframe(Timeframe::M1));
    assert!(!adapter.supports_timeframe(Timeframe::M5));
}

#[tokio::test]
async fn fetch_honors_since_and_limit() {
    let adapter = MinuteOnly;
    let page = adapter.fetch("BTC/USDT", Timeframe::M1, 90_000, 3).await.unwrap();
    assert_eq!(page.len(), 3);
    assert_eq!(page[0].open_time, 120_000);
    assert!(page.windows(2).all(|p| p[0].open_time < p[1].open_time));
}

#[tokio::test]
async fn unsupported_timeframe_errors_with_kind() {
    let adapter = MinuteOnly;
    let err = adapter
        .fetch("BTC/USDT", Timeframe::H1, 0, 1)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "NotSupportedError");
}
