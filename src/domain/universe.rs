//! Symbol universes and watch-list parsing.
//!
//! The candidate universes are static working lists; selection quality comes
//! from the feedback loop, not from keeping these current.

use std::collections::HashSet;

/// Highest-volume names, eligible for the strategies that need tight spreads.
pub const TOP_LIQUID: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "AVGO", "PEP", "COST",
];

/// Mega-cap subset; ranks above [`TOP_LIQUID`] in the liquidity tiers.
pub const MEGA_CAPS: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "NVDA"];

/// NASDAQ-100 working list (top thirty by weight).
pub const NASDAQ_100: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META", "AVGO", "PEP", "COST", "ADBE",
    "CMCSA", "NFLX", "INTC", "QCOM", "TXN", "INTU", "AMAT", "AMD", "ISRG", "BKNG", "HON", "AMGN",
    "VRTX", "GILD", "MU", "ADP", "LRCX", "SBUX", "MDLZ",
];

/// Fallback universe size for strategies without a profile.
pub const DEFAULT_UNIVERSE_SIZE: usize = 15;

/// The candidate list used when a strategy has no registered profile.
pub fn default_universe() -> Vec<String> {
    NASDAQ_100
        .iter()
        .take(DEFAULT_UNIVERSE_SIZE)
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum WatchListError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

/// Parse a comma-separated symbol list: trims, uppercases, rejects empty
/// tokens and duplicates.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, WatchListError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(WatchListError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(WatchListError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
