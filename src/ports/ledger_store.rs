//! Ledger persistence port trait.

use crate::domain::error::AdaptraderError;
use crate::domain::ledger::LedgerState;

pub trait LedgerStore {
    /// Read the persisted document. `Ok(None)` means no document exists
    /// yet; an unreadable or malformed document is an error (the ledger
    /// decides whether to degrade).
    fn load(&self) -> Result<Option<LedgerState>, AdaptraderError>;

    /// Write the full document. Must leave the previous document intact
    /// when the write fails partway.
    fn save(&self, state: &LedgerState) -> Result<(), AdaptraderError>;
}
