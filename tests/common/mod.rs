#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::cell::{Cell, RefCell};

use adaptrader::domain::error::AdaptraderError;
use adaptrader::domain::ledger::{LedgerState, TradeLedger};
use adaptrader::domain::trade::{Direction, TradeOutcome};
use adaptrader::ports::ledger_store::LedgerStore;

/// In-memory store with a switchable save failure, shared state readable
/// from the outside through `Rc`.
pub struct MemoryStore {
    pub saved: RefCell<Option<LedgerState>>,
    pub fail_saves: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            saved: RefCell::new(None),
            fail_saves: Cell::new(false),
        }
    }

    pub fn preloaded(state: LedgerState) -> Self {
        MemoryStore {
            saved: RefCell::new(Some(state)),
            fail_saves: Cell::new(false),
        }
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Result<Option<LedgerState>, AdaptraderError> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&self, state: &LedgerState) -> Result<(), AdaptraderError> {
        if self.fail_saves.get() {
            return Err(AdaptraderError::Persistence {
                reason: "simulated write failure".into(),
            });
        }
        *self.saved.borrow_mut() = Some(state.clone());
        Ok(())
    }
}

pub fn empty_ledger() -> TradeLedger {
    TradeLedger::open(Box::new(MemoryStore::new()))
}

pub fn ts(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn make_outcome(strategy: &str, symbol: &str, pnl: f64) -> TradeOutcome {
    TradeOutcome {
        strategy: strategy.to_string(),
        symbol: symbol.to_string(),
        direction: Direction::Long,
        entry_price: 100.0,
        exit_price: 100.0 * (1.0 + pnl),
        entry_time: ts(10, 10),
        exit_time: ts(10, 13),
        signal_strength: 1.0,
    }
}

pub fn record_n(ledger: &mut TradeLedger, strategy: &str, symbol: &str, pnl: f64, n: usize) {
    for _ in 0..n {
        ledger
            .record_trade(make_outcome(strategy, symbol, pnl), ts(10, 13))
            .unwrap();
    }
}
