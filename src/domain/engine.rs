//! Paper-trading engine driving the feedback loop end to end.
//!
//! Each cycle: refresh every shell's watch list (selector-gated), scan for
//! signals, size them, simulate round-trip fills, and record the outcomes in
//! the ledger, which in turn feeds the next optimization pass.

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::error::AdaptraderError;
use crate::domain::ledger::TradeLedger;
use crate::domain::selector::DynamicSelector;
use crate::domain::shell::{MockStrategist, Signal, StrategyShell, STRATEGY_SPECS};
use crate::domain::trade::TradeOutcome;

/// Signals sized below this notional value are skipped.
pub const MIN_POSITION_VALUE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub starting_capital: f64,
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            starting_capital: 25_000.0,
            seed: 7,
        }
    }
}

/// What happened in one cycle, for caller-side logging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    pub signals: usize,
    pub trades: usize,
    pub watch_lists_changed: usize,
}

pub struct PaperEngine {
    shells: Vec<StrategyShell>,
    selector: DynamicSelector,
    account_value: f64,
    rng: StdRng,
}

impl PaperEngine {
    /// Build the full eleven-strategy roster. Each shell starts with an
    /// optimized watch list and its own deterministically derived RNG seed.
    pub fn new(ledger: &TradeLedger, config: &EngineConfig, now: NaiveDateTime) -> Self {
        let mut selector = DynamicSelector::new(config.seed);
        let mut shells = Vec::with_capacity(STRATEGY_SPECS.len());

        for (index, spec) in STRATEGY_SPECS.iter().enumerate() {
            let target = selector.default_target(spec.name);
            let watch_list = selector.optimized_watch_list(ledger, spec.name, target);
            let strategist = MockStrategist::new(
                spec.sizing,
                config.seed.wrapping_add((index as u64 + 1) * 7919),
            );
            shells.push(StrategyShell::new(
                spec.name.to_string(),
                spec.sizing,
                Box::new(strategist),
                watch_list,
                now,
            ));
        }

        PaperEngine {
            shells,
            selector,
            account_value: config.starting_capital,
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    pub fn account_value(&self) -> f64 {
        self.account_value
    }

    pub fn shells(&self) -> &[StrategyShell] {
        &self.shells
    }

    /// Run one scan-execute-record pass across all shells.
    ///
    /// Ledger persistence failures propagate immediately; the failed trade
    /// is not reflected anywhere (the ledger rolls itself back and the
    /// account value is only adjusted after a successful record).
    pub fn run_cycle(
        &mut self,
        ledger: &mut TradeLedger,
        now: NaiveDateTime,
    ) -> Result<CycleReport, AdaptraderError> {
        let mut report = CycleReport::default();

        for shell in &mut self.shells {
            if shell.refresh_watch_list(&mut self.selector, ledger, now) {
                report.watch_lists_changed += 1;
            }

            let signals = shell.scan_for_signals();
            report.signals += signals.len();

            for signal in signals {
                let size = shell.position_size(self.account_value, signal.strength);
                if size < MIN_POSITION_VALUE {
                    continue;
                }

                let outcome = simulate_round_trip(shell.name(), &signal, now, &mut self.rng);
                let record = ledger.record_trade(outcome, now)?;
                self.account_value += size * record.pnl_percent;
                report.trades += 1;
            }
        }

        Ok(report)
    }
}

/// Turn a signal into a completed paper round trip: the position is assumed
/// to have been opened earlier in the session and closed now, with the exit
/// drawn from a strength-scaled random move.
fn simulate_round_trip(
    strategy: &str,
    signal: &Signal,
    now: NaiveDateTime,
    rng: &mut StdRng,
) -> TradeOutcome {
    let hold_minutes = rng.gen_range(30..360);
    let drift = rng.gen_range(-2.0 * signal.strength..2.0 * signal.strength);
    let exit_price = signal.price * (1.0 + drift);

    TradeOutcome {
        strategy: strategy.to_string(),
        symbol: signal.symbol.clone(),
        direction: signal.direction,
        entry_price: signal.price,
        exit_price,
        entry_time: now - Duration::minutes(hold_minutes),
        exit_time: now,
        signal_strength: signal.strength,
    }
}
