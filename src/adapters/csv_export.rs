//! CSV export of the recorded trade history.

use std::io;
use std::path::Path;

use crate::domain::error::AdaptraderError;
use crate::domain::trade::TradeRecord;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const HEADER: &[&str] = &[
    "strategy",
    "symbol",
    "direction",
    "entry_price",
    "exit_price",
    "entry_time",
    "exit_time",
    "signal_strength",
    "recorded_at",
    "pnl_percent",
    "hold_time_hours",
    "win",
];

/// Write trades as CSV rows, header first.
pub fn write_trades<W: io::Write>(
    writer: W,
    trades: &[&TradeRecord],
) -> Result<(), AdaptraderError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(HEADER)
        .map_err(|e| csv_error("header", e))?;

    for trade in trades {
        let row = [
            trade.strategy.clone(),
            trade.symbol.clone(),
            trade.direction.as_str().to_string(),
            trade.entry_price.to_string(),
            trade.exit_price.to_string(),
            trade.entry_time.format(TIME_FORMAT).to_string(),
            trade.exit_time.format(TIME_FORMAT).to_string(),
            trade.signal_strength.to_string(),
            trade.recorded_at.format(TIME_FORMAT).to_string(),
            trade.pnl_percent.to_string(),
            trade.hold_time_hours.to_string(),
            trade.win.to_string(),
        ];
        wtr.write_record(&row)
            .map_err(|e| csv_error(&trade.symbol, e))?;
    }

    wtr.flush().map_err(AdaptraderError::Io)?;
    Ok(())
}

/// Write trades to a file path.
pub fn export_to_path(path: &Path, trades: &[&TradeRecord]) -> Result<(), AdaptraderError> {
    let file = std::fs::File::create(path)?;
    write_trades(io::BufWriter::new(file), trades)
}

fn csv_error(context: &str, e: csv::Error) -> AdaptraderError {
    AdaptraderError::Persistence {
        reason: format!("CSV write failed at {context}: {e}"),
    }
}
