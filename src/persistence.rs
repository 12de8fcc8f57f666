//! Snapshot persistence.
//!
//! The in-memory ledger is always the source of truth for a session. After
//! each successful mutation the ledger hands a snapshot to its attached
//! store; a failed save is logged and swallowed, never surfaced as a command
//! failure. There is no schema versioning: the JSON shape is the state shape.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::account::Account;
use crate::order::LimitOrder;
use crate::position::Position;
use crate::trade::Trade;
use crate::types::{AccountId, OrderId, PositionId};
use crate::waitlist::WaitlistEntry;

// Everything needed to restore a ledger session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerState {
    pub accounts: HashMap<AccountId, Account>,
    pub positions: HashMap<PositionId, Position>,
    pub limit_orders: HashMap<OrderId, LimitOrder>,
    // Most-recent-first, capped by the ledger
    pub trade_history: Vec<Trade>,
    pub waitlist: Vec<WaitlistEntry>,
    pub next_account_id: u64,
    pub next_position_id: u64,
    pub next_order_id: u64,
    pub next_trade_id: u64,
    pub next_waitlist_id: u64,
}

pub trait SnapshotStore {
    fn save(&self, state: &LedgerState) -> Result<(), PersistenceError>;
    fn load(&self) -> Result<Option<LedgerState>, PersistenceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

// JSON file store, one file per ledger
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, state: &LedgerState) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(state)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<LedgerState>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

// Fire-and-forget save. the caller's mutation already succeeded.
pub fn save_best_effort(store: &dyn SnapshotStore, state: &LedgerState) {
    if let Err(err) = store.save(state) {
        warn!(error = %err, "failed to persist ledger snapshot");
    }
}
