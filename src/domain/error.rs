//! Domain error types.

/// Top-level error type for adaptrader.
#[derive(Debug, thiserror::Error)]
pub enum AdaptraderError {
    #[error("invalid trade for {strategy} {symbol}: {reason}")]
    InvalidTrade {
        strategy: String,
        symbol: String,
        reason: String,
    },

    #[error("ledger persistence error: {reason}")]
    Persistence { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AdaptraderError> for std::process::ExitCode {
    fn from(err: &AdaptraderError) -> Self {
        let code: u8 = match err {
            AdaptraderError::Io(_) => 1,
            AdaptraderError::ConfigParse { .. }
            | AdaptraderError::ConfigMissing { .. }
            | AdaptraderError::ConfigInvalid { .. } => 2,
            AdaptraderError::Persistence { .. } => 3,
            AdaptraderError::InvalidTrade { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
