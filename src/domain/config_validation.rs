//! Configuration validation, run before any command touches the ledger.

use crate::domain::error::AdaptraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), AdaptraderError> {
    validate_ledger_path(config)?;
    validate_starting_capital(config)?;
    validate_seed(config)?;
    Ok(())
}

fn validate_ledger_path(config: &dyn ConfigPort) -> Result<(), AdaptraderError> {
    match config.get_string("ledger", "path") {
        None => Err(AdaptraderError::ConfigMissing {
            section: "ledger".to_string(),
            key: "path".to_string(),
        }),
        Some(s) if s.trim().is_empty() => Err(AdaptraderError::ConfigInvalid {
            section: "ledger".to_string(),
            key: "path".to_string(),
            reason: "path must not be empty".to_string(),
        }),
        Some(_) => Ok(()),
    }
}

fn validate_starting_capital(config: &dyn ConfigPort) -> Result<(), AdaptraderError> {
    let value = config.get_double("engine", "starting_capital", 25_000.0);
    if value <= 0.0 || !value.is_finite() {
        return Err(AdaptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "starting_capital".to_string(),
            reason: "starting_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_seed(config: &dyn ConfigPort) -> Result<(), AdaptraderError> {
    let value = config.get_int("engine", "seed", 0);
    if value < 0 {
        return Err(AdaptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "seed".to_string(),
            reason: "seed must be non-negative".to_string(),
        });
    }
    Ok(())
}
