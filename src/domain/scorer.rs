//! Per-symbol performance scoring and ranked queries over the trade ledger.

use std::collections::BTreeMap;

use crate::domain::ledger::TradeLedger;

/// Minimum sample size before a symbol appears in a performance map.
pub const MIN_TRADES_SCORING: u32 = 5;
/// Looser minimum used when ranking top performers.
pub const MIN_TRADES_RANKING: u32 = 3;
/// Floor applied to the average return inside the score, so a high win rate
/// on a flat or negative average never ranks as attractive through a sign
/// flip, and qualifying scores stay non-negative.
pub const AVG_PNL_FLOOR: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolPerformance {
    pub total_trades: u32,
    pub win_rate: f64,
    pub avg_pnl_percent: f64,
    pub total_pnl_percent: f64,
    pub avg_hold_time: f64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategySummary {
    pub total_trades: usize,
    pub win_rate: f64,
    pub avg_pnl_percent: f64,
    pub total_pnl_percent: f64,
    pub best_stock: Option<String>,
    pub active_stocks: usize,
}

/// Per-symbol performance for one strategy, restricted to symbols with at
/// least `min_trades` recorded trades.
pub fn strategy_performance(
    ledger: &TradeLedger,
    strategy: &str,
    min_trades: u32,
) -> BTreeMap<String, SymbolPerformance> {
    let Some(stats) = ledger.strategy_stats(strategy) else {
        return BTreeMap::new();
    };

    stats
        .iter()
        .filter(|(_, s)| s.total_trades >= min_trades)
        .map(|(symbol, s)| {
            let win_rate = s.winning_trades as f64 / s.total_trades as f64;
            let avg_pnl = s.total_pnl / s.total_trades as f64;
            let performance_score = win_rate * avg_pnl.max(AVG_PNL_FLOOR);
            (
                symbol.clone(),
                SymbolPerformance {
                    total_trades: s.total_trades,
                    win_rate,
                    avg_pnl_percent: avg_pnl,
                    total_pnl_percent: s.total_pnl,
                    avg_hold_time: s.avg_hold_time,
                    performance_score,
                },
            )
        })
        .collect()
}

/// Symbols ranked by performance score, best first, at most `count`.
/// Equal scores fall back to lexicographic symbol order: the map iterates
/// lexicographically and the sort is stable.
pub fn top_performers(
    ledger: &TradeLedger,
    strategy: &str,
    count: usize,
    min_trades: u32,
) -> Vec<String> {
    let performance = strategy_performance(ledger, strategy, min_trades);

    let mut ranked: Vec<(String, f64)> = performance
        .into_iter()
        .map(|(symbol, p)| (symbol, p.performance_score))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked.into_iter().take(count).map(|(s, _)| s).collect()
}

/// Whole-strategy roll-up across every recorded trade, or `None` when the
/// strategy has never traded.
pub fn strategy_summary(ledger: &TradeLedger, strategy: &str) -> Option<StrategySummary> {
    let trades = ledger.get_trades(strategy);
    if trades.is_empty() {
        return None;
    }

    let total_trades = trades.len();
    let winning = trades.iter().filter(|t| t.win).count();
    let total_pnl: f64 = trades.iter().map(|t| t.pnl_percent).sum();
    let active_stocks = trades
        .iter()
        .map(|t| t.symbol.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();

    Some(StrategySummary {
        total_trades,
        win_rate: winning as f64 / total_trades as f64,
        avg_pnl_percent: total_pnl / total_trades as f64,
        total_pnl_percent: total_pnl,
        best_stock: top_performers(ledger, strategy, 1, MIN_TRADES_RANKING)
            .into_iter()
            .next(),
        active_stocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AdaptraderError;
    use crate::domain::ledger::LedgerState;
    use crate::domain::trade::{Direction, TradeOutcome};
    use crate::ports::ledger_store::LedgerStore;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};

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

    fn record(ledger: &mut TradeLedger, strategy: &str, symbol: &str, pnl: f64) {
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

    fn record_n(ledger: &mut TradeLedger, strategy: &str, symbol: &str, pnl: f64, n: usize) {
        for _ in 0..n {
            record(ledger, strategy, symbol, pnl);
        }
    }

    #[test]
    fn performance_of_mixed_wins_and_losses() {
        let mut ledger = ledger();
        record_n(&mut ledger, "S1", "AAPL", 0.02, 5);
        record_n(&mut ledger, "S1", "AAPL", -0.01, 5);

        let performance = strategy_performance(&ledger, "S1", MIN_TRADES_SCORING);
        let p = &performance["AAPL"];
        assert_eq!(p.total_trades, 10);
        assert_relative_eq!(p.win_rate, 0.5);
        assert_relative_eq!(p.avg_pnl_percent, 0.005, max_relative = 1e-9);
        assert_relative_eq!(p.performance_score, 0.0025, max_relative = 1e-9);
        assert_relative_eq!(p.total_pnl_percent, 0.05, max_relative = 1e-9);
    }

    #[test]
    fn score_floor_prevents_negative_scores() {
        let mut ledger = ledger();
        record_n(&mut ledger, "S1", "INTC", -0.01, 1);
        record_n(&mut ledger, "S1", "INTC", 0.000001, 9);

        let performance = strategy_performance(&ledger, "S1", MIN_TRADES_SCORING);
        let p = &performance["INTC"];
        assert_relative_eq!(p.win_rate, 0.9);
        assert!(p.avg_pnl_percent < 0.0);
        assert_relative_eq!(p.performance_score, 0.9 * AVG_PNL_FLOOR, max_relative = 1e-9);
        assert!(p.performance_score > 0.0);
    }

    #[test]
    fn min_trades_filters_thin_symbols() {
        let mut ledger = ledger();
        record_n(&mut ledger, "S1", "AAPL", 0.01, 5);
        record_n(&mut ledger, "S1", "MSFT", 0.01, 4);

        let performance = strategy_performance(&ledger, "S1", 5);
        assert!(performance.contains_key("AAPL"));
        assert!(!performance.contains_key("MSFT"));
    }

    #[test]
    fn unknown_strategy_has_empty_performance() {
        let ledger = ledger();
        assert!(strategy_performance(&ledger, "nope", 1).is_empty());
    }

    #[test]
    fn top_performers_ranked_by_score() {
        let mut ledger = ledger();
        record_n(&mut ledger, "S1", "AAPL", 0.01, 4);
        record_n(&mut ledger, "S1", "NVDA", 0.03, 4);
        record_n(&mut ledger, "S1", "MSFT", 0.02, 4);

        let top = top_performers(&ledger, "S1", 10, MIN_TRADES_RANKING);
        assert_eq!(top, vec!["NVDA", "MSFT", "AAPL"]);
    }

    #[test]
    fn top_performers_truncates_to_count() {
        let mut ledger = ledger();
        for symbol in ["AAPL", "MSFT", "NVDA", "AMD"] {
            record_n(&mut ledger, "S1", symbol, 0.01, 3);
        }
        let top = top_performers(&ledger, "S1", 2, MIN_TRADES_RANKING);
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn equal_scores_break_ties_lexicographically() {
        let mut ledger = ledger();
        for symbol in ["MSFT", "AAPL", "NVDA"] {
            record_n(&mut ledger, "S1", symbol, 0.02, 3);
        }
        let top = top_performers(&ledger, "S1", 3, MIN_TRADES_RANKING);
        assert_eq!(top, vec!["AAPL", "MSFT", "NVDA"]);
    }

    #[test]
    fn summary_rolls_up_all_trades() {
        let mut ledger = ledger();
        record_n(&mut ledger, "S1", "AAPL", 0.02, 3);
        record_n(&mut ledger, "S1", "MSFT", -0.01, 1);

        let summary = strategy_summary(&ledger, "S1").unwrap();
        assert_eq!(summary.total_trades, 4);
        assert_relative_eq!(summary.win_rate, 0.75);
        assert_relative_eq!(
            summary.total_pnl_percent,
            0.06 - 0.01,
            max_relative = 1e-9
        );
        assert_eq!(summary.active_stocks, 2);
        assert_eq!(summary.best_stock.as_deref(), Some("AAPL"));
    }

    #[test]
    fn summary_best_stock_requires_ranking_minimum() {
        let mut ledger = ledger();
        record_n(&mut ledger, "S1", "AAPL", 0.02, 2);

        let summary = strategy_summary(&ledger, "S1").unwrap();
        assert_eq!(summary.total_trades, 2);
        assert!(summary.best_stock.is_none());
    }

    #[test]
    fn summary_absent_without_trades() {
        let ledger = ledger();
        assert!(strategy_summary(&ledger, "S1").is_none());
    }
}
