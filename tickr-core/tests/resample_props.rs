use proptest::prelude::*;
use std::collections::BTreeMap;
use tickr_core::resample;
use tickr_types::{Candle, Series, Timeframe};

fn arb_series(tf: Timeframe) -> impl Strategy<Value = Series> {
    (
        prop::collection::btree_set(0i64..240, 0..160),
        prop::collection::vec((1i64..10_000, 1i64..10_000, 0i64..1_000), 160),
    )
        .prop_map(move |(idxs, vals)| {
            let period = tf.period_ms();
            let candles = idxs
                .into_iter()
                .zip(vals)
                .map(|(i, (a, b, vol))| {
                    let open = a as f64;
                    let close = b as f64;
                    let high = open.max(close) + 1.0;
                    let low = open.min(close) - 1.0;
                    Candle::new(i * period, open, high, low, close, vol as f64)
                })
                .collect();
            Series::from_sorted(candles)
        })
}

proptest! {
    #[test]
    fn bucket_rules_hold_and_partial_buckets_are_dropped(
        series in arb_series(Timeframe::M1),
        to in prop::sample::select(vec![Timeframe::M5, Timeframe::M15, Timeframe::H1]),
    ) {
        let ratio = (to.period_ms() / 60_000) as usize;
        let out = resample(&series, Timeframe::M1, to).unwrap();

        // Slow model: group source candles by target bucket.
        let mut groups: BTreeMap<i64, Vec<Candle>> = BTreeMap::new();
        for c in &series {
            groups.entry(to.align_down(c.open_time)).or_default().push(*c);
        }
        let out_map: BTreeMap<i64, Candle> = out.iter().map(|c| (c.open_time, *c)).collect();

        for (bucket, group) in &groups {
            match out_map.get(bucket) {
                Some(rc) => {
                    prop_assert_eq!(group.len(), ratio, "emitted bucket must be full");
                    prop_assert_eq!(rc.open, group.first().unwrap().open);
                    prop_assert_eq!(rc.close, group.last().unwrap().close);
                    let high = group.iter().map(|c| c.high).fold(f64::MIN, f64::max);
                    let low = group.iter().map(|c| c.low).fold(f64::MAX, f64::min);
                    prop_assert_eq!(rc.high, high);
                    prop_assert_eq!(rc.low, low);
                    let vol: f64 = group.iter().map(|c| c.volume).sum();
                    prop_assert!((rc.volume - vol).abs() < 1e-9);
                }
                None => prop_assert!(group.len() < ratio, "full bucket must be emitted"),
            }
        }
        // No bucket is fabricated out of nothing.
        for b in out_map.keys() {
            prop_assert!(groups.contains_key(b));
        }
    }

    #[test]
    fn volume_is_conserved_over_emitted_buckets(
        series in arb_series(Timeframe::M5),
    ) {
        let to = Timeframe::H1;
        let out = resample(&series, Timeframe::M5, to).unwrap();
        let emitted: std::collections::BTreeSet<i64> = out.iter().map(|c| c.open_time).collect();
        let source_vol: f64 = series
            .iter()
            .filter(|c| emitted.contains(&to.align_down(c.open_time)))
            .map(|c| c.volume)
            .sum();
        let out_vol: f64 = out.iter().map(|c| c.volume).sum();
        prop_assert!((source_vol - out_vol).abs() < 1e-6);
    }

    #[test]
    fn same_timeframe_is_identity(series in arb_series(Timeframe::M5)) {
        let out = resample(&series, Timeframe::M5, Timeframe::M5).unwrap();
        prop_assert_eq!(out, series);
    }

    #[test]
    fn output_is_sorted_and_aligned(
        series in arb_series(Timeframe::M1),
        to in prop::sample::select(vec![Timeframe::M5, Timeframe::H1, Timeframe::D1]),
    ) {
        let out = resample(&series, Timeframe::M1, to).unwrap();
        for pair in out.as_slice().windows(2) {
            prop_assert!(pair[0].open_time < pair[1].open_time);
        }
        for c in &out {
            prop_assert!(to.is_aligned(c.open_time));
        }
    }
}

#[test]
fn finer_target_is_rejected() {
    let err = resample(&Series::new(), Timeframe::H1, Timeframe::M5).unwrap_err();
    assert_eq!(err.kind(), "ValidationError");
    assert!(err.to_string().contains("whole multiple"));
}

#[test]
fn full_day_of_hours_rolls_up() {
    let candles: Vec<Candle> = (0..24)
        .map(|i| Candle::new(i * 3_600_000, 10.0 + i as f64, 20.0 + i as f64, 5.0, 15.0, 2.0))
        .collect();
    let series = Series::from_sorted(candles);
    let out = resample(&series, Timeframe::H1, Timeframe::D1).unwrap();
    assert_eq!(out.len(), 1);
    let day = out.as_slice()[0];
    assert_eq!(day.open_time, 0);
    assert_eq!(day.open, 10.0);
    assert_eq!(day.high, 43.0);
    assert_eq!(day.low, 5.0);
    assert_eq!(day.close, 15.0);
    assert_eq!(day.volume, 48.0);
}
