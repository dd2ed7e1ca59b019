//! Fallback desirability scoring for symbols without enough trade history.
//!
//! Liquidity tier plus a per-strategy affinity bonus plus a small random
//! jitter. The jitter keeps untested symbols from being starved by a fixed
//! ordering; callers inject the RNG so tests can seed it.

use rand::Rng;

use crate::domain::universe::{MEGA_CAPS, TOP_LIQUID};

pub const MEGA_CAP_SCORE: f64 = 15.0;
pub const TOP_LIQUID_SCORE: f64 = 10.0;
pub const AFFINITY_BONUS: f64 = 5.0;
pub const JITTER_MAX: f64 = 3.0;

/// Curated symbol affinities per strategy.
const AFFINITIES: &[(&str, &[&str])] = &[
    ("VWAP Mean Reversion", &["AAPL", "MSFT", "GOOGL"]),
    ("Gap Fade", &["TSLA", "NVDA", "AMD"]),
    ("Technical Breakout", &["NVDA", "TSLA", "AMD", "CRM"]),
    ("Sector Rotation", &["AAPL", "MSFT", "NVDA", "GOOGL", "META"]),
];

/// Score a (symbol, strategy) pair without consulting trade history.
///
/// The liquidity tiers override rather than stack: a mega-cap scores 15,
/// any other top-liquid name 10, everything else 0. Jitter is uniform in
/// `[0, 3)`.
pub fn quality_score<R: Rng>(symbol: &str, strategy: &str, rng: &mut R) -> f64 {
    let mut score = liquidity_tier(symbol);
    if has_affinity(strategy, symbol) {
        score += AFFINITY_BONUS;
    }
    score + rng.gen_range(0.0..JITTER_MAX)
}

fn liquidity_tier(symbol: &str) -> f64 {
    if MEGA_CAPS.contains(&symbol) {
        MEGA_CAP_SCORE
    } else if TOP_LIQUID.contains(&symbol) {
        TOP_LIQUID_SCORE
    } else {
        0.0
    }
}

fn has_affinity(strategy: &str, symbol: &str) -> bool {
    AFFINITIES
        .iter()
        .find(|(name, _)| *name == strategy)
        .is_some_and(|(_, symbols)| symbols.contains(&symbol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    fn base_of(symbol: &str, strategy: &str) -> f64 {
        // Many draws; the minimum converges on the jitter-free base.
        let mut rng = rng();
        (0..500)
            .map(|_| quality_score(symbol, strategy, &mut rng))
            .fold(f64::INFINITY, f64::min)
            .floor()
    }

    #[test]
    fn mega_cap_tier_overrides_top_liquid() {
        assert_eq!(base_of("AAPL", "Gap Fade"), MEGA_CAP_SCORE);
    }

    #[test]
    fn top_liquid_without_mega_cap_scores_ten() {
        assert_eq!(base_of("TSLA", "RSI Mean Reversion"), TOP_LIQUID_SCORE);
    }

    #[test]
    fn unknown_symbol_scores_jitter_only() {
        let mut rng = rng();
        for _ in 0..200 {
            let score = quality_score("ZZZZ", "RSI Mean Reversion", &mut rng);
            assert!((0.0..JITTER_MAX).contains(&score));
        }
    }

    #[test]
    fn affinity_bonus_applies_to_listed_pairs() {
        assert_eq!(
            base_of("TSLA", "Gap Fade"),
            TOP_LIQUID_SCORE + AFFINITY_BONUS
        );
        assert_eq!(
            base_of("AAPL", "VWAP Mean Reversion"),
            MEGA_CAP_SCORE + AFFINITY_BONUS
        );
    }

    #[test]
    fn affinity_does_not_leak_across_strategies() {
        // AMD is a Gap Fade affinity, not a VWAP one.
        assert_eq!(base_of("AMD", "VWAP Mean Reversion"), 0.0);
        assert_eq!(base_of("AMD", "Gap Fade"), AFFINITY_BONUS);
    }

    #[test]
    fn score_stays_within_jitter_band() {
        let mut rng = rng();
        for _ in 0..200 {
            let score = quality_score("AAPL", "Sector Rotation", &mut rng);
            let base = MEGA_CAP_SCORE + AFFINITY_BONUS;
            assert!(score >= base && score < base + JITTER_MAX);
        }
    }

    #[test]
    fn seeded_rng_reproduces_scores() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            assert_eq!(
                quality_score("NVDA", "Technical Breakout", &mut a),
                quality_score("NVDA", "Technical Breakout", &mut b)
            );
        }
    }
}
