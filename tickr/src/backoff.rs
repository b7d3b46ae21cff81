use std::time::Duration;

use rand::Rng;

use tickr_types::BackoffConfig;

/// Jittered delay for the given zero-based retry attempt: the configured
/// minimum grows by `factor` per attempt, is capped at the maximum, and gets
/// up to `jitter_percent` of random spread on top so concurrent retries
/// don't stampede in lockstep.
pub(crate) fn delay_for_attempt(cfg: &BackoffConfig, attempt: u32) -> Duration {
    let scaled = cfg
        .min_backoff_ms
        .saturating_mul(u64::from(cfg.factor).saturating_pow(attempt));
    Duration::from_millis(jitter_wait(
        scaled.min(cfg.max_backoff_ms),
        u32::from(cfg.jitter_percent),
    ))
}

fn jitter_wait(base_ms: u64, jitter_percent: u32) -> u64 {
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, (base_ms.saturating_mul(u64::from(jitter_percent))) / 100)
    };
    let mut rng = rand::rng();
    base_ms + rng.random_range(0..jitter_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> BackoffConfig {
        BackoffConfig {
            min_backoff_ms: 100,
            max_backoff_ms: 1_000,
            factor: 2,
            jitter_percent: 20,
        }
    }

    #[test]
    fn delay_grows_exponentially_within_jitter_bounds() {
        let cfg = cfg();
        for (attempt, base) in [(0u32, 100u64), (1, 200), (2, 400), (3, 800)] {
            for _ in 0..50 {
                let d = delay_for_attempt(&cfg, attempt).as_millis() as u64;
                assert!(d >= base, "attempt {attempt}: {d} < base {base}");
                assert!(d < base + base / 5 + 1, "attempt {attempt}: {d} too jittered");
            }
        }
    }

    #[test]
    fn delay_is_capped_at_the_maximum() {
        let cfg = cfg();
        for _ in 0..50 {
            let d = delay_for_attempt(&cfg, 30).as_millis() as u64;
            assert!(d >= 1_000 && d <= 1_200);
        }
    }

    #[test]
    fn zero_jitter_is_deterministic() {
        let cfg = BackoffConfig {
            jitter_percent: 0,
            ..cfg()
        };
        assert_eq!(delay_for_attempt(&cfg, 0), Duration::from_millis(100));
        assert_eq!(delay_for_attempt(&cfg, 2), Duration::from_millis(400));
    }

    #[test]
    fn huge_attempt_counts_do_not_overflow() {
        let d = delay_for_attempt(&cfg(), u32::MAX);
        assert!(d >= Duration::from_millis(1_000));
    }
}
