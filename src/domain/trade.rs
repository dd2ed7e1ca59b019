//! Completed trade records and their derived outcome fields.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::error::AdaptraderError;

const SECONDS_PER_HOUR: f64 = 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed round trip as reported by a strategy shell, before the ledger
/// has derived and stamped anything.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOutcome {
    pub strategy: String,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub signal_strength: f64,
}

impl TradeOutcome {
    /// Validate and convert into an immutable [`TradeRecord`].
    ///
    /// Rejects non-positive (or non-finite) prices and an exit time earlier
    /// than the entry time. Equal entry and exit times are a valid
    /// zero-hold trade.
    pub fn into_record(
        self,
        recorded_at: NaiveDateTime,
    ) -> Result<TradeRecord, AdaptraderError> {
        if !(self.entry_price > 0.0) || !self.entry_price.is_finite() {
            return Err(self.invalid("entry price must be positive"));
        }
        if !(self.exit_price > 0.0) || !self.exit_price.is_finite() {
            return Err(self.invalid("exit price must be positive"));
        }
        if self.exit_time < self.entry_time {
            return Err(self.invalid("exit time precedes entry time"));
        }

        let pnl_percent = match self.direction {
            Direction::Long => (self.exit_price - self.entry_price) / self.entry_price,
            Direction::Short => (self.entry_price - self.exit_price) / self.entry_price,
        };
        let hold_time_hours =
            (self.exit_time - self.entry_time).num_seconds() as f64 / SECONDS_PER_HOUR;

        Ok(TradeRecord {
            strategy: self.strategy,
            symbol: self.symbol,
            direction: self.direction,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            entry_time: self.entry_time,
            exit_time: self.exit_time,
            signal_strength: self.signal_strength,
            recorded_at,
            pnl_percent,
            hold_time_hours,
            win: pnl_percent > 0.0,
        })
    }

    fn invalid(&self, reason: &str) -> AdaptraderError {
        AdaptraderError::InvalidTrade {
            strategy: self.strategy.clone(),
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        }
    }
}

/// An accepted trade. Immutable once created; the ledger is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub strategy: String,
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub signal_strength: f64,
    pub recorded_at: NaiveDateTime,
    pub pnl_percent: f64,
    pub hold_time_hours: f64,
    pub win: bool,
}
