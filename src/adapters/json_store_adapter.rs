//! JSON file ledger store.
//!
//! The whole ledger state lives in one JSON document. Saves go through a
//! temp file, fsync, and rename, so a crash mid-write leaves the previous
//! document readable.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::error::AdaptraderError;
use crate::domain::ledger::LedgerState;
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_store::LedgerStore;

pub struct JsonStoreAdapter {
    path: PathBuf,
}

impl JsonStoreAdapter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JsonStoreAdapter { path: path.into() }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, AdaptraderError> {
        let path = config
            .get_string("ledger", "path")
            .ok_or_else(|| AdaptraderError::ConfigMissing {
                section: "ledger".into(),
                key: "path".into(),
            })?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStore for JsonStoreAdapter {
    fn load(&self) -> Result<Option<LedgerState>, AdaptraderError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = fs::File::open(&self.path).map_err(|e| AdaptraderError::Persistence {
            reason: format!("failed to open {}: {}", self.path.display(), e),
        })?;
        let reader = std::io::BufReader::new(file);
        let state =
            serde_json::from_reader(reader).map_err(|e| AdaptraderError::Persistence {
                reason: format!("failed to parse {}: {}", self.path.display(), e),
            })?;
        Ok(Some(state))
    }

    fn save(&self, state: &LedgerState) -> Result<(), AdaptraderError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AdaptraderError::Persistence {
                    reason: format!("failed to create {}: {}", parent.display(), e),
                })?;
            }
        }

        let json =
            serde_json::to_string_pretty(state).map_err(|e| AdaptraderError::Persistence {
                reason: format!("failed to serialize ledger state: {e}"),
            })?;

        let temp_path = self.path.with_extension("tmp");
        let mut temp_file =
            fs::File::create(&temp_path).map_err(|e| AdaptraderError::Persistence {
                reason: format!("failed to create {}: {}", temp_path.display(), e),
            })?;
        temp_file
            .write_all(json.as_bytes())
            .and_then(|()| temp_file.sync_all())
            .map_err(|e| AdaptraderError::Persistence {
                reason: format!("failed to write {}: {}", temp_path.display(), e),
            })?;

        fs::rename(&temp_path, &self.path).map_err(|e| AdaptraderError::Persistence {
            reason: format!("failed to replace {}: {}", self.path.display(), e),
        })?;

        Ok(())
    }
}
