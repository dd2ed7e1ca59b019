//! In-memory ledger store for demos and tests.

use std::cell::RefCell;

use crate::domain::error::AdaptraderError;
use crate::domain::ledger::LedgerState;
use crate::ports::ledger_store::LedgerStore;

#[derive(Default)]
pub struct MemoryStoreAdapter {
    state: RefCell<Option<LedgerState>>,
}

impl MemoryStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LedgerState) -> Self {
        MemoryStoreAdapter {
            state: RefCell::new(Some(state)),
        }
    }
}

impl LedgerStore for MemoryStoreAdapter {
    fn load(&self) -> Result<Option<LedgerState>, AdaptraderError> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &LedgerState) -> Result<(), AdaptraderError> {
        *self.state.borrow_mut() = Some(state.clone());
        Ok(())
    }
}
