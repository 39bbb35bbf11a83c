// ./src/store/sled_store.rs
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::{Batch, Db};
use tracing::info;

use super::model::Snapshot;
use super::LedgerStore;
use crate::error::StoreError;
use crate::types::{Account, AccountId, Asset, Proof, StateRoot};

const ACCOUNT_PREFIX: &str = "account/";
const PROOF_PREFIX: &str = "proof/";
const ASSET_PREFIX: &str = "asset/";
const STATE_ROOT_KEY: &str = "state_root";

/// Ledger store backed by an embedded sled database.
///
/// Values are JSON records under the keys `account/<hex id>`,
/// `proof/<hex id>/<index>/<denom>`, `asset/<denom>` and `state_root`.
/// The index is zero-padded so prefix scans return proofs in index order.
pub struct SledStore {
    db: Db,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self { db: sled::open(path)? })
    }

    /// Scratch database removed on drop.
    pub fn temporary() -> Result<Self, StoreError> {
        Ok(Self { db: sled::Config::new().temporary(true).open()? })
    }

    /// Replaces the database contents with `snapshot` in one atomic batch.
    ///
    /// Records of a previously imported snapshot that `snapshot` no longer
    /// carries are removed.
    pub fn import(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        snapshot.check_unique()?;
        let mut batch = Batch::default();
        let mut stale = 0usize;
        for key in self.db.iter().keys() {
            batch.remove(key?);
            stale += 1;
        }
        put(&mut batch, STATE_ROOT_KEY, &snapshot.state_root)?;
        for account in &snapshot.accounts {
            put(&mut batch, &account_key(&account.address), account)?;
        }
        for asset in &snapshot.assets {
            put(&mut batch, &format!("{ASSET_PREFIX}{}", asset.denom), asset)?;
        }
        for proof in &snapshot.proofs {
            put(&mut batch, &proof_key(&proof.address, &proof.coin.denom, proof.index), proof)?;
        }
        self.db.apply_batch(batch)?;
        self.db.flush()?;
        info!(
            replaced = stale,
            accounts = snapshot.accounts.len(),
            proofs = snapshot.proofs.len(),
            assets = snapshot.assets.len(),
            "imported snapshot into sled"
        );
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.db.get(key.as_bytes())? {
            Some(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, StoreError> {
        self.db
            .scan_prefix(prefix.as_bytes())
            .map(|item| -> Result<T, StoreError> {
                let (_, raw) = item?;
                Ok(serde_json::from_slice(&raw)?)
            })
            .collect()
    }
}

fn put<T: Serialize>(batch: &mut Batch, key: &str, value: &T) -> Result<(), StoreError> {
    batch.insert(key.as_bytes(), serde_json::to_vec(value)?);
    Ok(())
}

fn account_key(address: &AccountId) -> String {
    format!("{ACCOUNT_PREFIX}{}", hex::encode(address.as_bytes()))
}

fn proof_key(address: &AccountId, denom: &str, index: u32) -> String {
    format!("{PROOF_PREFIX}{}/{index:010}/{denom}", hex::encode(address.as_bytes()))
}

impl LedgerStore for SledStore {
    fn get_account_by_address(&self, address: &AccountId) -> Result<Account, StoreError> {
        self.get(&account_key(address))?.ok_or(StoreError::AccountNotFound)
    }

    fn get_account_asset_proof(
        &self,
        address: &AccountId,
        denom: &str,
        index: u32,
    ) -> Result<Proof, StoreError> {
        self.get(&proof_key(address, denom, index))?.ok_or(StoreError::ProofNotFound)
    }

    fn get_asset_by_symbol(&self, denom: &str) -> Result<Asset, StoreError> {
        self.get(&format!("{ASSET_PREFIX}{denom}"))?.ok_or(StoreError::AssetNotFound)
    }

    fn get_state_root(&self) -> Result<StateRoot, StoreError> {
        self.get(STATE_ROOT_KEY)?.ok_or(StoreError::StateRootNotFound)
    }

    fn accounts(&self) -> Result<Vec<Account>, StoreError> { self.scan(ACCOUNT_PREFIX) }

    fn proofs(&self) -> Result<Vec<Proof>, StoreError> { self.scan(PROOF_PREFIX) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coin;

    fn snapshot() -> Snapshot {
        let address = AccountId([3u8; 20]);
        Snapshot {
            state_root: StateRoot([9u8; 32]),
            accounts: vec![Account {
                address,
                account_number: 4,
                balances: vec![Coin::new("BNB", 12)],
            }],
            assets: vec![Asset { owner: address, denom: "BNB".into(), amount: 12 }],
            proofs: vec![Proof {
                address,
                index: 0,
                coin: Coin::new("BNB", 12),
                siblings: vec![[1u8; 32]],
            }],
        }
    }

    #[test]
    fn test_empty_database_reports_not_found() {
        let store = SledStore::temporary().unwrap();
        assert!(matches!(store.get_state_root(), Err(StoreError::StateRootNotFound)));
        assert!(matches!(
            store.get_account_by_address(&AccountId([3u8; 20])),
            Err(StoreError::AccountNotFound)
        ));
        assert!(store.accounts().unwrap().is_empty());
    }

    #[test]
    fn test_import_then_lookup() {
        let store = SledStore::temporary().unwrap();
        let snapshot = snapshot();
        store.import(&snapshot).unwrap();

        assert_eq!(store.get_state_root().unwrap(), snapshot.state_root);
        let address = AccountId([3u8; 20]);
        assert_eq!(store.get_account_by_address(&address).unwrap(), snapshot.accounts[0]);
        assert_eq!(store.get_account_asset_proof(&address, "BNB", 0).unwrap(), snapshot.proofs[0]);
        assert!(matches!(
            store.get_account_asset_proof(&address, "BNB", 1),
            Err(StoreError::ProofNotFound)
        ));
        assert_eq!(store.get_asset_by_symbol("BNB").unwrap().amount, 12);
        assert_eq!(store.proofs().unwrap().len(), 1);
    }

    #[test]
    fn test_reimport_drops_records_of_the_previous_snapshot() {
        let store = SledStore::temporary().unwrap();
        let first = snapshot();
        store.import(&first).unwrap();

        let kept = AccountId([5u8; 20]);
        let second = Snapshot {
            state_root: StateRoot([2u8; 32]),
            accounts: vec![Account { address: kept, account_number: 7, balances: vec![Coin::new("XRP-BF2", 3)] }],
            assets: vec![],
            proofs: vec![Proof { address: kept, index: 0, coin: Coin::new("XRP-BF2", 3), siblings: vec![] }],
        };
        store.import(&second).unwrap();

        let removed = AccountId([3u8; 20]);
        assert_eq!(store.get_state_root().unwrap(), StateRoot([2u8; 32]));
        assert!(matches!(store.get_account_by_address(&removed), Err(StoreError::AccountNotFound)));
        assert!(matches!(
            store.get_account_asset_proof(&removed, "BNB", 0),
            Err(StoreError::ProofNotFound)
        ));
        assert!(matches!(store.get_asset_by_symbol("BNB"), Err(StoreError::AssetNotFound)));
        assert_eq!(store.accounts().unwrap(), second.accounts);
        assert_eq!(store.proofs().unwrap(), second.proofs);
    }

    #[test]
    fn test_proofs_scan_in_numeric_index_order() {
        let store = SledStore::temporary().unwrap();
        let address = AccountId([3u8; 20]);
        let balances: Vec<Coin> = (0..12).map(|i| Coin::new(format!("T{i}"), 1)).collect();
        let proofs: Vec<Proof> = balances
            .iter()
            .enumerate()
            .map(|(i, coin)| Proof { address, index: i as u32, coin: coin.clone(), siblings: vec![] })
            .collect();
        store
            .import(&Snapshot {
                state_root: StateRoot([9u8; 32]),
                accounts: vec![Account { address, account_number: 1, balances }],
                assets: vec![],
                proofs,
            })
            .unwrap();

        let indices: Vec<u32> = store.proofs().unwrap().iter().map(|p| p.index).collect();
        assert_eq!(indices, (0..12).collect::<Vec<u32>>());
        assert_eq!(store.get_account_asset_proof(&address, "T10", 10).unwrap().coin.denom, "T10");
    }
}
