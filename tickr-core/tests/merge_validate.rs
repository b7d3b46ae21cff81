use tickr_core::{merge, validate_series};
use tickr_types::{Candle, Series, Timeframe};

fn c(open_time: i64, px: f64) -> Candle {
    Candle::new(open_time, px, px, px, px, 1.0)
}

#[test]
fn misaligned_incoming_candle_is_rejected() {
    let existing = Series::from_sorted(vec![c(0, 1.0)]);
    let incoming = Series::from_sorted(vec![c(61_234, 2.0)]);
    let err = merge(&existing, &incoming, Timeframe::M1, 0).unwrap_err();
    assert_eq!(err.kind(), "IntegrityError");
}

#[test]
fn tolerance_permits_small_clock_skew() {
    let existing = Series::from_sorted(vec![c(0, 1.0)]);
    let incoming = Series::from_sorted(vec![c(60_010, 2.0)]);
    assert!(merge(&existing, &incoming, Timeframe::M1, 0).is_err());
    let outcome = merge(&existing, &incoming, Timeframe::M1, 10).unwrap();
    assert_eq!(outcome.added, 1);
}

#[test]
fn sub_period_spacing_is_rejected_even_within_alignment_tolerance() {
    // With an hour timeframe and a generous tolerance, two candles a minute
    // apart both pass the alignment check but still sit inside one period.
    let a = c(0, 1.0);
    let b = c(60_000, 2.0);
    let err = validate_series(&[a, b], Timeframe::H1, 60_000).unwrap_err();
    assert_eq!(err.kind(), "IntegrityError");
    assert!(err.to_string().contains("below the 1h period"));
}

#[test]
fn duplicate_open_times_are_rejected() {
    let err = validate_series(&[c(0, 1.0), c(0, 2.0)], Timeframe::M1, 0).unwrap_err();
    assert_eq!(err.kind(), "IntegrityError");
}

#[test]
fn unsorted_input_is_rejected() {
    let err = validate_series(&[c(120_000, 1.0), c(60_000, 2.0)], Timeframe::M1, 0).unwrap_err();
    assert_eq!(err.kind(), "IntegrityError");
}

#[test]
fn empty_and_singleton_series_validate() {
    assert!(validate_series(&[], Timeframe::M1, 0).is_ok());
    assert!(validate_series(&[c(60_000, 1.0)], Timeframe::M1, 0).is_ok());
}

#[test]
fn gaps_between_candles_are_legal() {
    // Holes are tracked by the gap scan, not rejected by validation.
    let candles = [c(0, 1.0), c(300_000, 2.0)];
    assert!(validate_series(&candles, Timeframe::M1, 0).is_ok());
}

#[test]
fn pre_epoch_candles_align_correctly() {
    let candles = [c(-120_000, 1.0), c(-60_000, 2.0)];
    assert!(validate_series(&candles, Timeframe::M1, 0).is_ok());
    let err = validate_series(&[c(-61_000, 1.0)], Timeframe::M1, 0).unwrap_err();
    assert_eq!(err.kind(), "IntegrityError");
}

#[test]
fn revised_candle_replaces_stored_record() {
    let existing = Series::from_sorted(vec![c(0, 1.0), c(60_000, 2.0)]);
    let incoming = Series::from_sorted(vec![c(60_000, 9.0)]);
    let outcome = merge(&existing, &incoming, Timeframe::M1, 0).unwrap();
    assert_eq!(outcome.added, 0);
    assert_eq!(outcome.overwritten, 1);
    assert_eq!(outcome.series.as_slice()[1].close, 9.0);
}
