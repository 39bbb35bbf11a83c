// ./src/store/mod.rs
//! Read-only ledger store consumed by the approval engine.

pub mod memory;
pub mod model;
pub mod sled_store;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use memory::MemoryStore;
pub use model::{Snapshot, SnapshotPaths};
pub use sled_store::SledStore;

use crate::error::StoreError;
use crate::network::NetworkConfig;
use crate::types::{Account, AccountId, Asset, Proof, StateRoot};

/// Lookup interface over one snapshot.
///
/// Implementations are immutable after construction and shared between
/// request workers.
pub trait LedgerStore: Send + Sync {
    fn get_account_by_address(&self, address: &AccountId) -> Result<Account, StoreError>;

    /// Proof for the leaf of `address` holding `denom` at balance position `index`.
    fn get_account_asset_proof(
        &self,
        address: &AccountId,
        denom: &str,
        index: u32,
    ) -> Result<Proof, StoreError>;

    fn get_asset_by_symbol(&self, denom: &str) -> Result<Asset, StoreError>;

    fn get_state_root(&self) -> Result<StateRoot, StoreError>;

    /// Every account of the snapshot, for offline checks.
    fn accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Every proof of the snapshot, for offline checks.
    fn proofs(&self) -> Result<Vec<Proof>, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreDriver {
    #[default]
    Memory,
    Sled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SledStoreConfig {
    pub path: String,
}

impl Default for SledStoreConfig {
    fn default() -> Self { Self { path: "./data/ledger.sled".to_string() } }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub driver: StoreDriver,
    pub memory_store: SnapshotPaths,
    pub sled_store: SledStoreConfig,
}

/// Opens the configured store backend.
pub fn open(config: &StoreConfig, network: &NetworkConfig) -> Result<Arc<dyn LedgerStore>, StoreError> {
    match config.driver {
        StoreDriver::Memory => {
            info!(accounts = %config.memory_store.accounts, "opening memory store");
            Ok(Arc::new(MemoryStore::load(&config.memory_store, network)?))
        }
        StoreDriver::Sled => {
            info!(path = %config.sled_store.path, "opening sled store");
            Ok(Arc::new(SledStore::open(&config.sled_store.path)?))
        }
    }
}
