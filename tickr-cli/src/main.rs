//! Command-line front end for the tickr sync engine.
//!
//! Syncs run against a replay fixture so the whole pipeline can be exercised
//! offline; `gaps` and `show` read the store directly. Error kinds map to
//! stable exit codes so scripts can tell a stale-version conflict from a
//! corrupt artifact.

mod replay;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use tickr::{
    FileStore, RangeStatus, SeriesKey, SeriesStore, Tickr, TickrError, Timeframe, find_gaps,
};
use tracing_subscriber::EnvFilter;

use crate::replay::ReplayAdapter;

#[derive(Parser)]
#[command(name = "tickr")]
#[command(about = "Idempotent OHLCV candle sync against a local file store.", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync a series from a replay fixture into the store.
    Sync {
        #[arg(long)]
        exchange: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "1m")]
        timeframe: String,
        /// JSON fixture the replay adapter serves candles from.
        #[arg(long)]
        source: PathBuf,
        #[arg(long, env = "TICKR_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
        /// Periods back from now when no explicit range is given.
        #[arg(long, default_value_t = 100)]
        window: u32,
        #[arg(long, default_value_t = 100)]
        page_size: u32,
        /// Range start: epoch seconds, epoch milliseconds, or RFC 3339.
        #[arg(long)]
        start: Option<String>,
        /// Range end, same formats as start.
        #[arg(long)]
        end: Option<String>,
    },
    /// List coverage gaps in a stored series over a range.
    Gaps {
        #[arg(long)]
        exchange: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "1m")]
        timeframe: String,
        #[arg(long, env = "TICKR_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
        /// Range start: epoch seconds, epoch milliseconds, or RFC 3339.
        #[arg(long)]
        start: String,
        /// Range end, same formats as start.
        #[arg(long)]
        end: String,
    },
    /// Print stored candles for a range.
    Show {
        #[arg(long)]
        exchange: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "1m")]
        timeframe: String,
        #[arg(long, env = "TICKR_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
        /// Periods back from the end when no start is given.
        #[arg(long, default_value_t = 100)]
        window: u32,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        eprintln!("error: {err} [{}]", err.kind());
        std::process::exit(exit_code(&err));
    }
}

async fn run() -> Result<(), TickrError> {
    match Cli::parse().command {
        Commands::Sync {
            exchange,
            symbol,
            timeframe,
            source,
            data_dir,
            window,
            page_size,
            start,
            end,
        } => {
            let key = series_key(&exchange, &symbol, &timeframe)?;
            cmd_sync(
                key,
                &source,
                &data_dir,
                window,
                page_size,
                start.as_deref(),
                end.as_deref(),
            )
            .await
        }
        Commands::Gaps {
            exchange,
            symbol,
            timeframe,
            data_dir,
            start,
            end,
        } => {
            let key = series_key(&exchange, &symbol, &timeframe)?;
            cmd_gaps(key, &data_dir, &start, &end).await
        }
        Commands::Show {
            exchange,
            symbol,
            timeframe,
            data_dir,
            window,
            start,
            end,
        } => {
            let key = series_key(&exchange, &symbol, &timeframe)?;
            cmd_show(key, &data_dir, window, start.as_deref(), end.as_deref()).await
        }
    }
}

async fn cmd_sync(
    key: SeriesKey,
    source: &Path,
    data_dir: &Path,
    window: u32,
    page_size: u32,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(), TickrError> {
    let adapter = ReplayAdapter::from_path(source)?;
    let store = FileStore::new(data_dir)?;
    let tickr = Tickr::builder(adapter, store)
        .window_periods(window)
        .max_page_size(page_size)
        .build()?;

    let result = match (start, end) {
        (Some(s), Some(e)) => {
            tickr
                .sync_range(&key, parse_time(s)?, parse_time(e)?)
                .await?
        }
        (None, None) => tickr.sync_one(&key).await?,
        _ => {
            return Err(TickrError::validation(
                "start and end must be given together",
            ));
        }
    };

    println!(
        "sync complete: key={key} added={} overwritten={} conflict_retries={}",
        result.added, result.overwritten, result.conflict_retries
    );
    for outcome in &result.ranges {
        let status = match outcome.status {
            RangeStatus::Filled => "filled",
            RangeStatus::Exhausted => "exhausted",
            RangeStatus::Failed => "failed",
        };
        match &outcome.error {
            Some(err) => println!(
                "range {} status={status} fetched={} error={err}",
                outcome.range, outcome.fetched
            ),
            None => println!(
                "range {} status={status} fetched={}",
                outcome.range, outcome.fetched
            ),
        }
    }
    if let Some(span) = result.final_range {
        println!(
            "stored span: {} .. {}",
            format_ms(span.first_open_time),
            format_ms(span.last_open_time)
        );
    }
    Ok(())
}

async fn cmd_gaps(
    key: SeriesKey,
    data_dir: &Path,
    start: &str,
    end: &str,
) -> Result<(), TickrError> {
    let store = FileStore::new(data_dir)?;
    let loaded = store.load(&key).await?;
    let gaps = find_gaps(
        &loaded.series,
        parse_time(start)?,
        parse_time(end)?,
        key.timeframe,
    )?;

    for gap in &gaps {
        println!(
            "gap {} .. {} ({} periods)",
            format_ms(gap.start),
            format_ms(gap.end),
            gap.period_count(key.timeframe)
        );
    }
    println!(
        "{} gaps in {} stored candles (version {})",
        gaps.len(),
        loaded.series.len(),
        loaded.version
    );
    Ok(())
}

async fn cmd_show(
    key: SeriesKey,
    data_dir: &Path,
    window: u32,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(), TickrError> {
    let store = FileStore::new(data_dir)?;
    let loaded = store.load(&key).await?;

    let end_ms = match end {
        Some(value) => parse_time(value)?,
        None => Utc::now().timestamp_millis(),
    };
    let start_ms = match start {
        Some(value) => parse_time(value)?,
        None => end_ms - i64::from(window) * key.timeframe.period_ms(),
    };
    if start_ms > end_ms {
        return Err(TickrError::validation(format!(
            "show range is inverted: start {start_ms} > end {end_ms}"
        )));
    }

    let slice = loaded.series.slice(start_ms, end_ms);
    for c in slice {
        println!(
            "{} o={} h={} l={} c={} v={}",
            format_ms(c.open_time),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        );
    }
    println!("{} candles shown for {key}", slice.len());
    Ok(())
}

fn series_key(exchange: &str, symbol: &str, timeframe: &str) -> Result<SeriesKey, TickrError> {
    Ok(SeriesKey::new(
        exchange,
        symbol,
        timeframe.parse::<Timeframe>()?,
    ))
}

/// Accepts epoch seconds, epoch milliseconds, or RFC 3339, returning epoch
/// milliseconds. Magnitudes of a trillion or more are read as milliseconds.
fn parse_time(value: &str) -> Result<i64, TickrError> {
    if let Ok(n) = value.parse::<i64>() {
        return Ok(if n.abs() >= 1_000_000_000_000 {
            n
        } else {
            n.saturating_mul(1000)
        });
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).timestamp_millis())
        .map_err(|_| {
            TickrError::validation(format!(
                "unrecognized timestamp: {value} (use epoch ms or RFC 3339)"
            ))
        })
}

fn format_ms(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map_or_else(|| ms.to_string(), |dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

const fn exit_code(err: &TickrError) -> i32 {
    match err {
        TickrError::Validation(_) => 2,
        TickrError::NotSupported { .. } => 3,
        TickrError::Fetch { .. } => 4,
        TickrError::Integrity(_) => 5,
        TickrError::Conflict { .. } => 6,
        TickrError::ConcurrencyExhausted { .. } => 7,
        _ => 8,
    }
}
