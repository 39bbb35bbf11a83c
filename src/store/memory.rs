// ./src/store/memory.rs

use std::collections::HashMap;

use super::model::{Snapshot, SnapshotPaths};
use super::LedgerStore;
use crate::error::StoreError;
use crate::network::NetworkConfig;
use crate::types::{Account, AccountId, Asset, Proof, StateRoot};

type ProofKey = (AccountId, u32, String);

/// Ledger store holding a whole snapshot in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state_root: StateRoot,
    accounts: HashMap<AccountId, Account>,
    assets: HashMap<String, Asset>,
    proofs: HashMap<ProofKey, Proof>,
}

impl MemoryStore {
    /// Loads the JSON snapshot documents.
    pub fn load(paths: &SnapshotPaths, network: &NetworkConfig) -> Result<Self, StoreError> {
        Self::from_snapshot(Snapshot::load(paths, network)?)
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self, StoreError> {
        snapshot.check_unique()?;
        let accounts = snapshot.accounts.into_iter().map(|a| (a.address, a)).collect();
        let assets = snapshot.assets.into_iter().map(|a| (a.denom.clone(), a)).collect();
        let proofs = snapshot
            .proofs
            .into_iter()
            .map(|p| ((p.address, p.index, p.coin.denom.clone()), p))
            .collect();
        Ok(Self { state_root: snapshot.state_root, accounts, assets, proofs })
    }
}

impl LedgerStore for MemoryStore {
    fn get_account_by_address(&self, address: &AccountId) -> Result<Account, StoreError> {
        self.accounts.get(address).cloned().ok_or(StoreError::AccountNotFound)
    }

    fn get_account_asset_proof(
        &self,
        address: &AccountId,
        denom: &str,
        index: u32,
    ) -> Result<Proof, StoreError> {
        self.proofs
            .get(&(*address, index, denom.to_string()))
            .cloned()
            .ok_or(StoreError::ProofNotFound)
    }

    fn get_asset_by_symbol(&self, denom: &str) -> Result<Asset, StoreError> {
        self.assets.get(denom).cloned().ok_or(StoreError::AssetNotFound)
    }

    fn get_state_root(&self) -> Result<StateRoot, StoreError> { Ok(self.state_root) }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<_> = self.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| a.address);
        Ok(accounts)
    }

    fn proofs(&self) -> Result<Vec<Proof>, StoreError> {
        let mut proofs: Vec<_> = self.proofs.values().cloned().collect();
        proofs.sort_by(|a, b| (a.address, a.index).cmp(&(b.address, b.index)));
        Ok(proofs)
    }
}
