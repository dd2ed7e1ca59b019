//! Watch-list selection policy.
//!
//! Composes the performance scorer with the quality heuristic: proven
//! performers keep their slots, the remainder is filled from the strategy's
//! candidate universe, and sparse history falls back to quality-only
//! selection rather than failing.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::ledger::TradeLedger;
use crate::domain::quality::quality_score;
use crate::domain::scorer::{
    self, StrategySummary, SymbolPerformance, MIN_TRADES_RANKING, MIN_TRADES_SCORING,
};
use crate::domain::universe;

/// Aggregate trades required before a strategy's list is reshuffled at all.
pub const OPTIMIZE_TRADE_FLOOR: u32 = 20;
/// Trades needed before recommendations are labelled high quality.
pub const HIGH_QUALITY_TRADE_FLOOR: usize = 50;
/// Watch lists never grow beyond this by default.
pub const DEFAULT_TARGET_CAP: usize = 10;

/// Advisory per-strategy liquidity thresholds. Not consulted by the
/// selection algorithm itself; exposed for downstream screening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityRequirements {
    pub min_volume: u64,
    pub max_spread: f64,
}

/// Static selection inputs for one strategy.
#[derive(Debug, Clone)]
pub struct StrategyProfile {
    pub name: String,
    pub base_candidates: Vec<String>,
    pub quality_requirements: Option<QualityRequirements>,
}

/// Where a strategy sits in the feedback loop. Derived from the ledger on
/// every call; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    ColdStart,
    Warm,
    Optimized,
}

impl std::fmt::Display for SelectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SelectionPhase::ColdStart => "cold-start",
            SelectionPhase::Warm => "warm",
            SelectionPhase::Optimized => "optimized",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataQuality {
    Low,
    High,
}

impl std::fmt::Display for DataQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DataQuality::Low => "low",
            DataQuality::High => "high",
        })
    }
}

#[derive(Debug, Clone)]
pub struct StrategyRecommendations {
    pub strategy: String,
    pub recommended: Vec<String>,
    pub performance: BTreeMap<String, SymbolPerformance>,
    pub summary: Option<StrategySummary>,
    pub data_quality: DataQuality,
}

pub struct DynamicSelector {
    profiles: BTreeMap<String, StrategyProfile>,
    rng: StdRng,
}

impl DynamicSelector {
    /// Selector over the built-in strategy profiles. The seed drives only
    /// the quality-score jitter.
    pub fn new(seed: u64) -> Self {
        Self::with_profiles(builtin_profiles(), seed)
    }

    pub fn with_profiles(profiles: Vec<StrategyProfile>, seed: u64) -> Self {
        DynamicSelector {
            profiles: profiles
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn profile(&self, strategy: &str) -> Option<&StrategyProfile> {
        self.profiles.get(strategy)
    }

    /// Default watch-list size for a strategy: its universe size, capped.
    pub fn default_target(&self, strategy: &str) -> usize {
        self.base_candidates(strategy).len().min(DEFAULT_TARGET_CAP)
    }

    fn base_candidates(&self, strategy: &str) -> Vec<String> {
        match self.profiles.get(strategy) {
            Some(profile) => profile.base_candidates.clone(),
            None => universe::default_universe(),
        }
    }

    /// Build a fresh watch list of at most `target_count` unique symbols.
    ///
    /// With enough ranked history, up to half the slots go to proven
    /// performers in rank order and the rest are filled from the candidate
    /// universe by quality score. Otherwise the whole list comes from the
    /// quality heuristic.
    pub fn optimized_watch_list(
        &mut self,
        ledger: &TradeLedger,
        strategy: &str,
        target_count: usize,
    ) -> Vec<String> {
        let base = self.base_candidates(strategy);
        let top = scorer::top_performers(ledger, strategy, target_count * 2, MIN_TRADES_RANKING);

        if top.len() >= target_count / 2 {
            self.performance_selection(strategy, &base, top, target_count)
        } else {
            self.quality_selection(strategy, &base, target_count)
        }
    }

    fn performance_selection(
        &mut self,
        strategy: &str,
        base: &[String],
        top: Vec<String>,
        target_count: usize,
    ) -> Vec<String> {
        let mut selected: Vec<String> = top.into_iter().take(target_count / 2).collect();

        let mut scored: Vec<(String, f64)> = base
            .iter()
            .filter(|symbol| !selected.contains(symbol))
            .map(|symbol| {
                let score = quality_score(symbol, strategy, &mut self.rng);
                (symbol.clone(), score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let remaining = target_count - selected.len();
        selected.extend(scored.into_iter().take(remaining).map(|(symbol, _)| symbol));
        selected.truncate(target_count);
        selected
    }

    fn quality_selection(
        &mut self,
        strategy: &str,
        base: &[String],
        target_count: usize,
    ) -> Vec<String> {
        let mut scored: Vec<(String, f64)> = base
            .iter()
            .map(|symbol| {
                let score = quality_score(symbol, strategy, &mut self.rng);
                (symbol.clone(), score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(target_count)
            .map(|(symbol, _)| symbol)
            .collect()
    }

    /// Recompute a strategy's watch list, or return `current` unchanged
    /// while aggregate history is below [`OPTIMIZE_TRADE_FLOOR`]. The
    /// caller compares old and new lists to decide whether anything moved.
    pub fn update_strategy_targets(
        &mut self,
        ledger: &TradeLedger,
        strategy: &str,
        current: &[String],
    ) -> Vec<String> {
        let performance = scorer::strategy_performance(ledger, strategy, MIN_TRADES_SCORING);
        let total_trades: u32 = performance.values().map(|p| p.total_trades).sum();

        if total_trades < OPTIMIZE_TRADE_FLOOR {
            return current.to_vec();
        }

        eprintln!("Reoptimizing {strategy} watch list from {total_trades} recorded trades");
        self.optimized_watch_list(ledger, strategy, current.len())
    }

    /// Derive the current phase of the feedback loop for a strategy.
    pub fn selection_phase(
        &self,
        ledger: &TradeLedger,
        strategy: &str,
        target_count: usize,
    ) -> SelectionPhase {
        let performance = scorer::strategy_performance(ledger, strategy, MIN_TRADES_SCORING);
        let total_trades: u32 = performance.values().map(|p| p.total_trades).sum();
        if total_trades < OPTIMIZE_TRADE_FLOOR {
            return SelectionPhase::ColdStart;
        }

        let top = scorer::top_performers(ledger, strategy, target_count * 2, MIN_TRADES_RANKING);
        if top.len() < target_count / 2 {
            SelectionPhase::Warm
        } else {
            SelectionPhase::Optimized
        }
    }

    /// Full advisory bundle for one strategy.
    pub fn recommendations(
        &mut self,
        ledger: &TradeLedger,
        strategy: &str,
    ) -> StrategyRecommendations {
        let target = self.default_target(strategy);
        let recommended = self.optimized_watch_list(ledger, strategy, target);
        let performance = scorer::strategy_performance(ledger, strategy, MIN_TRADES_SCORING);
        let summary = scorer::strategy_summary(ledger, strategy);

        let data_quality = match &summary {
            Some(s) if s.total_trades > HIGH_QUALITY_TRADE_FLOOR => DataQuality::High,
            _ => DataQuality::Low,
        };

        StrategyRecommendations {
            strategy: strategy.to_string(),
            recommended,
            performance,
            summary,
            data_quality,
        }
    }
}

fn take_symbols(universe: &[&str], count: usize) -> Vec<String> {
    universe.iter().take(count).map(|s| s.to_string()).collect()
}

fn builtin_profiles() -> Vec<StrategyProfile> {
    use crate::domain::universe::{NASDAQ_100, TOP_LIQUID};

    let profile = |name: &str, base: Vec<String>, quality: Option<QualityRequirements>| {
        StrategyProfile {
            name: name.to_string(),
            base_candidates: base,
            quality_requirements: quality,
        }
    };
    let req = |min_volume: u64, max_spread: f64| {
        Some(QualityRequirements {
            min_volume,
            max_spread,
        })
    };

    vec![
        profile(
            "VWAP Mean Reversion",
            take_symbols(TOP_LIQUID, 8),
            req(2_000_000, 0.02),
        ),
        profile("Gap Fade", take_symbols(NASDAQ_100, 25), req(1_000_000, 0.03)),
        profile(
            "Technical Breakout",
            take_symbols(NASDAQ_100, 20),
            req(1_500_000, 0.025),
        ),
        profile(
            "Earnings Momentum",
            take_symbols(NASDAQ_100, 15),
            req(1_000_000, 0.03),
        ),
        profile("Sector Rotation", take_symbols(NASDAQ_100, 30), None),
        profile(
            "Statistical Pairs",
            take_symbols(TOP_LIQUID, TOP_LIQUID.len()),
            req(2_500_000, 0.015),
        ),
        profile("RSI Mean Reversion", take_symbols(NASDAQ_100, 20), None),
        profile("Volume Spike Reversal", take_symbols(NASDAQ_100, 15), None),
        profile(
            "End-of-Day Momentum",
            take_symbols(TOP_LIQUID, 8),
            req(3_000_000, 0.01),
        ),
        profile("Time-Based Patterns", take_symbols(TOP_LIQUID, 6), None),
        profile("News-Driven Momentum", take_symbols(NASDAQ_100, 25), None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AdaptraderError;
    use crate::domain::ledger::LedgerState;
    use crate::domain::trade::{Direction, TradeOutcome};
    use crate::ports::ledger_store::LedgerStore;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::HashSet;

    struct NullStore;

    impl LedgerStore for NullStore {
        fn load(&self) -> Result<Option<LedgerState>, AdaptraderError> {
            Ok(None)
        }
        fn save(&self, _state: &LedgerState) -> Result<(), AdaptraderError> {
            Ok(())
        }
    }

    fn ts(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn ledger() -> TradeLedger {
        TradeLedger::open(Box::new(NullStore))
    }

    fn record_n(ledger: &mut TradeLedger, strategy: &str, symbol: &str, pnl: f64, n: usize) {
        for _ in 0..n {
            let outcome = TradeOutcome {
                strategy: strategy.into(),
                symbol: symbol.into(),
                direction: Direction::Long,
                entry_price: 100.0,
                exit_price: 100.0 * (1.0 + pnl),
                entry_time: ts(10),
                exit_time: ts(12),
                signal_strength: 1.0,
            };
            ledger.record_trade(outcome, ts(12)).unwrap();
        }
    }

    fn assert_unique(list: &[String]) {
        let set: HashSet<_> = list.iter().collect();
        assert_eq!(set.len(), list.len(), "duplicates in {list:?}");
    }

    #[test]
    fn cold_ledger_yields_full_quality_list() {
        let ledger = ledger();
        let mut selector = DynamicSelector::new(1);

        let list = selector.optimized_watch_list(&ledger, "Gap Fade", 8);
        assert_eq!(list.len(), 8);
        assert_unique(&list);

        let profile = selector.profile("Gap Fade").unwrap();
        for symbol in &list {
            assert!(profile.base_candidates.contains(symbol));
        }
    }

    #[test]
    fn list_never_exceeds_target_count() {
        let ledger = ledger();
        let mut selector = DynamicSelector::new(2);
        for target in [1, 4, 8] {
            let list = selector.optimized_watch_list(&ledger, "Sector Rotation", target);
            assert_eq!(list.len(), target);
            assert_unique(&list);
        }
    }

    #[test]
    fn list_shrinks_to_universe_when_smaller_than_target() {
        let ledger = ledger();
        let mut selector = DynamicSelector::new(3);
        // Time-Based Patterns watches a 6-symbol universe.
        let list = selector.optimized_watch_list(&ledger, "Time-Based Patterns", 8);
        assert_eq!(list.len(), 6);
        assert_unique(&list);
    }

    #[test]
    fn unknown_strategy_falls_back_to_default_universe() {
        let ledger = ledger();
        let mut selector = DynamicSelector::new(4);
        let list = selector.optimized_watch_list(&ledger, "No Such Strategy", 20);
        assert_eq!(list.len(), universe::DEFAULT_UNIVERSE_SIZE);
        assert_unique(&list);
    }

    #[test]
    fn proven_performers_lead_the_list_in_rank_order() {
        let mut ledger = ledger();
        // Four qualifying performers with distinct scores.
        record_n(&mut ledger, "Gap Fade", "INTC", 0.04, 5);
        record_n(&mut ledger, "Gap Fade", "MU", 0.03, 5);
        record_n(&mut ledger, "Gap Fade", "SBUX", 0.02, 5);
        record_n(&mut ledger, "Gap Fade", "GILD", 0.01, 5);

        let mut selector = DynamicSelector::new(5);
        let list = selector.optimized_watch_list(&ledger, "Gap Fade", 8);

        assert_eq!(&list[..4], &["INTC", "MU", "SBUX", "GILD"]);
        assert_eq!(list.len(), 8);
        assert_unique(&list);
    }

    #[test]
    fn performance_slots_are_capped_at_half_target() {
        let mut ledger = ledger();
        for symbol in ["AAPL", "MSFT", "NVDA", "AMZN", "TSLA", "META"] {
            record_n(&mut ledger, "VWAP Mean Reversion", symbol, 0.02, 5);
        }

        let mut selector = DynamicSelector::new(6);
        let list = selector.optimized_watch_list(&ledger, "VWAP Mean Reversion", 8);

        assert_eq!(list.len(), 8);
        assert_unique(&list);
        // Only the first four slots come from the ranking; the tail is
        // quality-filled from the remaining universe.
        assert_eq!(&list[..4], &["AAPL", "AMZN", "META", "MSFT"]);
    }

    #[test]
    fn update_below_trade_floor_returns_input_unchanged() {
        let mut ledger = ledger();
        record_n(&mut ledger, "Gap Fade", "INTC", 0.02, 19);

        let current: Vec<String> = vec!["INTC".into(), "MU".into(), "SBUX".into()];
        let mut selector = DynamicSelector::new(7);
        let updated = selector.update_strategy_targets(&ledger, "Gap Fade", &current);

        assert_eq!(updated, current);
    }

    #[test]
    fn thin_symbols_do_not_count_toward_the_floor() {
        let mut ledger = ledger();
        // 24 trades spread so that no symbol reaches the scoring minimum.
        for symbol in ["AAPL", "MSFT", "NVDA", "AMZN", "TSLA", "META"] {
            record_n(&mut ledger, "Sector Rotation", symbol, 0.02, 4);
        }

        let current: Vec<String> = vec!["AAPL".into(), "MSFT".into()];
        let mut selector = DynamicSelector::new(8);
        let updated = selector.update_strategy_targets(&ledger, "Sector Rotation", &current);

        assert_eq!(updated, current);
    }

    #[test]
    fn update_above_trade_floor_recomputes_at_same_length() {
        let mut ledger = ledger();
        record_n(&mut ledger, "VWAP Mean Reversion", "AAPL", 0.02, 21);

        let current: Vec<String> = ["MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "AVGO", "PEP"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut selector = DynamicSelector::new(9);
        let updated = selector.update_strategy_targets(&ledger, "VWAP Mean Reversion", &current);

        assert_eq!(updated.len(), current.len());
        assert_unique(&updated);
    }

    #[test]
    fn selection_phase_tracks_the_gates() {
        let mut ledger = ledger();
        let selector = DynamicSelector::new(10);

        assert_eq!(
            selector.selection_phase(&ledger, "Gap Fade", 8),
            SelectionPhase::ColdStart
        );

        // 21 trades on one symbol: past the floor, one ranked performer,
        // below half of an 8-symbol target.
        record_n(&mut ledger, "Gap Fade", "INTC", 0.02, 21);
        assert_eq!(
            selector.selection_phase(&ledger, "Gap Fade", 8),
            SelectionPhase::Warm
        );

        for symbol in ["MU", "SBUX", "GILD"] {
            record_n(&mut ledger, "Gap Fade", symbol, 0.02, 5);
        }
        assert_eq!(
            selector.selection_phase(&ledger, "Gap Fade", 8),
            SelectionPhase::Optimized
        );
    }

    #[test]
    fn same_seed_reproduces_selection() {
        let ledger = ledger();
        let mut a = DynamicSelector::new(42);
        let mut b = DynamicSelector::new(42);

        assert_eq!(
            a.optimized_watch_list(&ledger, "RSI Mean Reversion", 10),
            b.optimized_watch_list(&ledger, "RSI Mean Reversion", 10)
        );
    }

    #[test]
    fn default_target_is_capped() {
        let selector = DynamicSelector::new(11);
        assert_eq!(selector.default_target("Sector Rotation"), 10);
        assert_eq!(selector.default_target("Time-Based Patterns"), 6);
        assert_eq!(selector.default_target("VWAP Mean Reversion"), 8);
    }

    #[test]
    fn recommendations_label_data_quality() {
        let mut ledger = ledger();
        let mut selector = DynamicSelector::new(12);

        let recs = selector.recommendations(&ledger, "Gap Fade");
        assert_eq!(recs.data_quality, DataQuality::Low);
        assert!(recs.summary.is_none());
        assert!(!recs.recommended.is_empty());

        record_n(&mut ledger, "Gap Fade", "INTC", 0.02, 51);
        let recs = selector.recommendations(&ledger, "Gap Fade");
        assert_eq!(recs.data_quality, DataQuality::High);
        assert_eq!(recs.summary.unwrap().total_trades, 51);
    }

    #[test]
    fn fifty_trades_is_still_low_quality() {
        let mut ledger = ledger();
        record_n(&mut ledger, "Gap Fade", "INTC", 0.02, 50);

        let mut selector = DynamicSelector::new(13);
        let recs = selector.recommendations(&ledger, "Gap Fade");
        assert_eq!(recs.data_quality, DataQuality::Low);
    }
}
