//! Strategy shells: watch-list ownership, position sizing, and the mock
//! signal generators standing in for real strategies.
//!
//! The eleven strategies differ only in configuration, so they share one
//! shell type parameterized by a [`SizingPolicy`] and a [`Strategist`]
//! implementation. The shell owns its watch list and the timestamp gating
//! re-optimization; the selector only ever hands back a new list by value.

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::ledger::TradeLedger;
use crate::domain::selector::DynamicSelector;
use crate::domain::trade::Direction;

/// Minimum hours between watch-list optimizations per shell.
pub const OPTIMIZE_INTERVAL_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub direction: Direction,
    pub price: f64,
    pub strength: f64,
}

/// The capability pair every strategy exposes: find signals on a watch
/// list, and size a position for an account.
pub trait Strategist {
    fn scan_for_signals(&mut self, watch_list: &[String]) -> Vec<Signal>;
    fn position_size(&self, account_value: f64, signal_strength: f64) -> f64;
}

/// Per-strategy position sizing:
/// `min(account * allocation * base_fraction * min(strength * mult, limit),
/// account * cap)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingPolicy {
    pub allocation_percent: f64,
    pub base_fraction: f64,
    pub strength_mult: f64,
    pub strength_limit: f64,
    pub position_cap: f64,
}

impl SizingPolicy {
    pub fn position_size(&self, account_value: f64, signal_strength: f64) -> f64 {
        let base = account_value * self.allocation_percent * self.base_fraction;
        let adjusted = base * (signal_strength * self.strength_mult).min(self.strength_limit);
        adjusted.min(account_value * self.position_cap)
    }
}

/// One row of the strategy table.
#[derive(Debug, Clone, Copy)]
pub struct StrategySpec {
    pub name: &'static str,
    pub sizing: SizingPolicy,
}

/// The full roster, allocation-ordered: tier one concentrates capital,
/// tier three stays opportunistic.
pub const STRATEGY_SPECS: &[StrategySpec] = &[
    StrategySpec {
        name: "Earnings Momentum",
        sizing: SizingPolicy {
            allocation_percent: 0.20,
            base_fraction: 0.4,
            strength_mult: 1.0,
            strength_limit: f64::INFINITY,
            position_cap: 0.08,
        },
    },
    StrategySpec {
        name: "VWAP Mean Reversion",
        sizing: SizingPolicy {
            allocation_percent: 0.15,
            base_fraction: 0.5,
            strength_mult: 1.0,
            strength_limit: f64::INFINITY,
            position_cap: 0.05,
        },
    },
    StrategySpec {
        name: "Technical Breakout",
        sizing: SizingPolicy {
            allocation_percent: 0.15,
            base_fraction: 0.5,
            strength_mult: 3.0,
            strength_limit: 1.5,
            position_cap: 0.08,
        },
    },
    StrategySpec {
        name: "Gap Fade",
        sizing: SizingPolicy {
            allocation_percent: 0.10,
            base_fraction: 0.7,
            strength_mult: 1.5,
            strength_limit: 1.2,
            position_cap: 0.05,
        },
    },
    StrategySpec {
        name: "Sector Rotation",
        sizing: SizingPolicy {
            allocation_percent: 0.10,
            base_fraction: 0.6,
            strength_mult: 1.0,
            strength_limit: f64::INFINITY,
            position_cap: 0.06,
        },
    },
    StrategySpec {
        name: "Statistical Pairs",
        sizing: SizingPolicy {
            allocation_percent: 0.08,
            base_fraction: 0.8,
            strength_mult: 1.0,
            strength_limit: f64::INFINITY,
            position_cap: 0.04,
        },
    },
    StrategySpec {
        name: "RSI Mean Reversion",
        sizing: SizingPolicy {
            allocation_percent: 0.07,
            base_fraction: 0.8,
            strength_mult: 1.3,
            strength_limit: 1.1,
            position_cap: 0.04,
        },
    },
    StrategySpec {
        name: "Volume Spike Reversal",
        sizing: SizingPolicy {
            allocation_percent: 0.05,
            base_fraction: 0.9,
            strength_mult: 2.0,
            strength_limit: 1.3,
            position_cap: 0.03,
        },
    },
    StrategySpec {
        name: "End-of-Day Momentum",
        sizing: SizingPolicy {
            allocation_percent: 0.05,
            base_fraction: 1.0,
            strength_mult: 2.0,
            strength_limit: 1.2,
            position_cap: 0.03,
        },
    },
    StrategySpec {
        name: "Time-Based Patterns",
        sizing: SizingPolicy {
            allocation_percent: 0.03,
            base_fraction: 1.0,
            strength_mult: 3.0,
            strength_limit: 1.5,
            position_cap: 0.02,
        },
    },
    StrategySpec {
        name: "News-Driven Momentum",
        sizing: SizingPolicy {
            allocation_percent: 0.02,
            base_fraction: 1.0,
            strength_mult: 2.5,
            strength_limit: 1.8,
            position_cap: 0.015,
        },
    },
];

/// Randomized stand-in for a real signal scanner. Each watched symbol fires
/// with a fixed probability per scan; direction, price variation, and
/// strength all come from the injected RNG.
pub struct MockStrategist {
    sizing: SizingPolicy,
    rng: StdRng,
    signal_probability: f64,
}

impl MockStrategist {
    pub fn new(sizing: SizingPolicy, seed: u64) -> Self {
        MockStrategist {
            sizing,
            rng: StdRng::seed_from_u64(seed),
            signal_probability: 0.3,
        }
    }

    pub fn with_signal_probability(mut self, probability: f64) -> Self {
        self.signal_probability = probability;
        self
    }
}

impl Strategist for MockStrategist {
    fn scan_for_signals(&mut self, watch_list: &[String]) -> Vec<Signal> {
        let mut signals = Vec::new();

        for symbol in watch_list {
            if !self.rng.gen_bool(self.signal_probability) {
                continue;
            }
            let variation = self.rng.gen_range(-0.03..0.03);
            let price = reference_price(symbol) * (1.0 + variation);
            let direction = if self.rng.gen_bool(0.5) {
                Direction::Long
            } else {
                Direction::Short
            };
            let strength = self.rng.gen_range(0.005..0.03);
            signals.push(Signal {
                symbol: symbol.clone(),
                direction,
                price,
                strength,
            });
        }

        signals
    }

    fn position_size(&self, account_value: f64, signal_strength: f64) -> f64 {
        self.sizing.position_size(account_value, signal_strength)
    }
}

/// Synthetic reference prices for the liquid names; everything else trades
/// around 100.
fn reference_price(symbol: &str) -> f64 {
    match symbol {
        "AAPL" => 225.0,
        "MSFT" => 420.0,
        "GOOGL" => 165.0,
        "AMZN" => 185.0,
        "NVDA" => 135.0,
        "TSLA" => 248.0,
        "META" => 575.0,
        "AVGO" => 175.0,
        "PEP" => 160.0,
        "COST" => 875.0,
        _ => 100.0,
    }
}

/// A live strategy instance: name, sizing, a strategist, and the watch
/// list it exclusively owns.
pub struct StrategyShell {
    name: String,
    sizing: SizingPolicy,
    strategist: Box<dyn Strategist>,
    watch_list: Vec<String>,
    last_optimized: NaiveDateTime,
}

impl StrategyShell {
    pub fn new(
        name: String,
        sizing: SizingPolicy,
        strategist: Box<dyn Strategist>,
        watch_list: Vec<String>,
        now: NaiveDateTime,
    ) -> Self {
        StrategyShell {
            name,
            sizing,
            strategist,
            watch_list,
            last_optimized: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sizing(&self) -> &SizingPolicy {
        &self.sizing
    }

    pub fn watch_list(&self) -> &[String] {
        &self.watch_list
    }

    pub fn last_optimized(&self) -> NaiveDateTime {
        self.last_optimized
    }

    /// Ask the selector for a fresh list, at most once per
    /// [`OPTIMIZE_INTERVAL_HOURS`]. Adopts whatever comes back and returns
    /// whether the list actually changed.
    pub fn refresh_watch_list(
        &mut self,
        selector: &mut DynamicSelector,
        ledger: &TradeLedger,
        now: NaiveDateTime,
    ) -> bool {
        if now - self.last_optimized < Duration::hours(OPTIMIZE_INTERVAL_HOURS) {
            return false;
        }

        let next = selector.update_strategy_targets(ledger, &self.name, &self.watch_list);
        self.last_optimized = now;
        let changed = next != self.watch_list;
        if changed {
            eprintln!("{} watch list updated: {}", self.name, next.join(", "));
        }
        self.watch_list = next;
        changed
    }

    pub fn scan_for_signals(&mut self) -> Vec<Signal> {
        self.strategist.scan_for_signals(&self.watch_list)
    }

    pub fn position_size(&self, account_value: f64, signal_strength: f64) -> f64 {
        self.strategist.position_size(account_value, signal_strength)
    }
}
