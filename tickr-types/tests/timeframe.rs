use tickr_types::{TickrError, Timeframe};

#[test]
fn labels_parse_to_their_periods() {
    let cases = [
        ("1m", 60_000),
        ("5m", 300_000),
        ("15m", 900_000),
        ("1h", 3_600_000),
        ("6h", 21_600_000),
        ("12h", 43_200_000),
        ("1d", 86_400_000),
        ("1w", 604_800_000),
    ];
    for (label, period) in cases {
        let tf: Timeframe = label.parse().expect("supported label");
        assert_eq!(tf.period_ms(), period, "{label}");
        assert_eq!(tf.as_str(), label);
    }
}

#[test]
fn month_is_rejected_as_unsupported() {
    let err = "1M".parse::<Timeframe>().expect_err("1M must not parse");
    assert!(matches!(err, TickrError::NotSupported { .. }));
    assert_eq!(err.kind(), "NotSupportedError");
}

#[test]
fn garbage_is_a_validation_error() {
    let err = "90z".parse::<Timeframe>().expect_err("nonsense label");
    assert!(matches!(err, TickrError::Validation(_)));
    assert_eq!(err.kind(), "ValidationError");
}

#[test]
fn alignment_floors_and_ceils_to_boundaries() {
    let tf = Timeframe::M1;
    assert_eq!(tf.align_down(60_000), 60_000);
    assert_eq!(tf.align_down(60_001), 60_000);
    assert_eq!(tf.align_down(119_999), 60_000);
    assert_eq!(tf.align_up(60_000), 60_000);
    assert_eq!(tf.align_up(60_001), 120_000);
    assert!(tf.is_aligned(0));
    assert!(!tf.is_aligned(1));
}

#[test]
fn alignment_handles_pre_epoch_timestamps() {
    let tf = Timeframe::M1;
    assert_eq!(tf.align_down(-1), -60_000);
    assert_eq!(tf.align_up(-1), 0);
    assert_eq!(tf.align_down(-60_000), -60_000);
}

#[test]
fn serde_uses_wire_labels() {
    let json = serde_json::to_string(&Timeframe::M15).expect("serialize");
    assert_eq!(json, "\"15m\"");
    let tf: Timeframe = serde_json::from_str("\"6h\"").expect("deserialize");
    assert_eq!(tf, Timeframe::H6);
}
