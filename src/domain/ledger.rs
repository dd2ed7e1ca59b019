//! Append-only trade ledger with per-(strategy, symbol) aggregate statistics.
//!
//! The ledger is the sole writer of trade history. Every accepted trade is
//! appended to the ordered record sequence, folded into the matching
//! aggregate, and the full state is persisted synchronously before the call
//! returns. A failed save is surfaced and the in-memory state rolled back so
//! memory never runs ahead of the durable store.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::AdaptraderError;
use crate::domain::trade::{TradeOutcome, TradeRecord};
use crate::ports::ledger_store::LedgerStore;

/// Incrementally maintained summary of all trades for one
/// (strategy, symbol) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_trades: u32,
    pub winning_trades: u32,
    pub total_pnl: f64,
    pub avg_hold_time: f64,
}

impl AggregateStats {
    fn new() -> Self {
        AggregateStats {
            total_trades: 0,
            winning_trades: 0,
            total_pnl: 0.0,
            avg_hold_time: 0.0,
        }
    }

    fn absorb(&mut self, record: &TradeRecord) {
        self.total_trades += 1;
        if record.win {
            self.winning_trades += 1;
        }
        self.total_pnl += record.pnl_percent;
        let n = self.total_trades as f64;
        self.avg_hold_time = (self.avg_hold_time * (n - 1.0) + record.hold_time_hours) / n;
    }
}

/// The persisted document: ordered trade sequence plus the
/// strategy → symbol → aggregate mapping. Round-trips losslessly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    pub trades: Vec<TradeRecord>,
    pub strategy_stats: BTreeMap<String, BTreeMap<String, AggregateStats>>,
}

pub struct TradeLedger {
    state: LedgerState,
    store: Box<dyn LedgerStore>,
}

impl TradeLedger {
    /// Open a ledger backed by `store`. An absent document starts an empty
    /// ledger; an unreadable one is warned about and also starts empty, so
    /// corrupt history never blocks startup.
    pub fn open(store: Box<dyn LedgerStore>) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => LedgerState::default(),
            Err(e) => {
                eprintln!("warning: discarding unreadable ledger state ({e})");
                LedgerState::default()
            }
        };
        TradeLedger { state, store }
    }

    /// Validate, record, and persist a completed trade.
    ///
    /// On success the record has been appended, the pair's aggregate
    /// updated with the incremental-mean rule, and the whole state saved.
    /// On a save failure both the append and the aggregate update are
    /// undone before the error is returned.
    pub fn record_trade(
        &mut self,
        outcome: TradeOutcome,
        recorded_at: NaiveDateTime,
    ) -> Result<&TradeRecord, AdaptraderError> {
        let record = outcome.into_record(recorded_at)?;

        let previous = self
            .state
            .strategy_stats
            .get(&record.strategy)
            .and_then(|by_symbol| by_symbol.get(&record.symbol))
            .cloned();

        self.state
            .strategy_stats
            .entry(record.strategy.clone())
            .or_default()
            .entry(record.symbol.clone())
            .or_insert_with(AggregateStats::new)
            .absorb(&record);
        self.state.trades.push(record);

        if let Err(e) = self.store.save(&self.state) {
            self.roll_back_last(previous);
            return Err(e);
        }

        let index = self.state.trades.len() - 1;
        Ok(&self.state.trades[index])
    }

    fn roll_back_last(&mut self, previous: Option<AggregateStats>) {
        let Some(record) = self.state.trades.pop() else {
            return;
        };
        let Some(by_symbol) = self.state.strategy_stats.get_mut(&record.strategy) else {
            return;
        };
        match previous {
            Some(stats) => {
                by_symbol.insert(record.symbol, stats);
            }
            None => {
                by_symbol.remove(&record.symbol);
                if by_symbol.is_empty() {
                    self.state.strategy_stats.remove(&record.strategy);
                }
            }
        }
    }

    /// Persist the current state explicitly. `record_trade` already saves on
    /// every write; this exists for callers that mutate nothing but want a
    /// fresh document (for example after opening against a new store path).
    pub fn save(&self) -> Result<(), AdaptraderError> {
        self.store.save(&self.state)
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.state.trades
    }

    pub fn get_aggregate(&self, strategy: &str, symbol: &str) -> Option<&AggregateStats> {
        self.state
            .strategy_stats
            .get(strategy)
            .and_then(|by_symbol| by_symbol.get(symbol))
    }

    /// All aggregates for one strategy, keyed by symbol.
    pub fn strategy_stats(&self, strategy: &str) -> Option<&BTreeMap<String, AggregateStats>> {
        self.state.strategy_stats.get(strategy)
    }

    /// A strategy's trades in insertion order.
    pub fn get_trades(&self, strategy: &str) -> Vec<&TradeRecord> {
        self.state
            .trades
            .iter()
            .filter(|t| t.strategy == strategy)
            .collect()
    }
}
