// ./src/store/model.rs
//! JSON snapshot documents and their conversion into ledger records.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::network::NetworkConfig;
use crate::types::{decode_bytes32, Account, AccountId, Asset, Coin, Proof, StateRoot};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StateRootDocument {
    pub state_root: String,
}

/// Account entry of `accounts.json`.
///
/// Only `summary_coins` is committed; the other coin lists snapshot exports
/// carry are ignored.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AccountDocument {
    pub address: String,
    #[serde(default)]
    pub account_number: i64,
    #[serde(default)]
    pub summary_coins: Vec<Coin>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssetDocument {
    pub owner: String,
    pub amount: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProofDocument {
    pub address: String,
    pub index: u32,
    pub coin: Coin,
    pub proof: Vec<String>,
}

/// Paths of the four snapshot documents. An empty `assets` path means the
/// snapshot has no registrable assets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SnapshotPaths {
    pub state_root: String,
    pub assets: String,
    pub accounts: String,
    pub merkle_proofs: String,
}

impl Default for SnapshotPaths {
    fn default() -> Self {
        Self {
            state_root: "./fixtures/store/state_root.json".to_string(),
            assets: "./fixtures/store/assets.json".to_string(),
            accounts: "./fixtures/store/accounts.json".to_string(),
            merkle_proofs: "./fixtures/store/merkle_proofs.json".to_string(),
        }
    }
}

/// A decoded ledger snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub state_root: StateRoot,
    pub accounts: Vec<Account>,
    pub assets: Vec<Asset>,
    pub proofs: Vec<Proof>,
}

impl Snapshot {
    /// Reads and validates the snapshot documents.
    pub fn load(paths: &SnapshotPaths, network: &NetworkConfig) -> Result<Self, StoreError> {
        let state_root: StateRootDocument = read_json(&paths.state_root)?;
        let accounts: Vec<AccountDocument> = read_json(&paths.accounts)?;
        let proofs: Vec<ProofDocument> = read_json(&paths.merkle_proofs)?;
        let assets: BTreeMap<String, AssetDocument> = if paths.assets.is_empty() {
            BTreeMap::new()
        } else {
            read_json(&paths.assets)?
        };
        let snapshot = Self::from_documents(state_root, accounts, assets, proofs, network)?;
        debug!(
            accounts = snapshot.accounts.len(),
            proofs = snapshot.proofs.len(),
            assets = snapshot.assets.len(),
            "loaded snapshot documents"
        );
        Ok(snapshot)
    }

    pub fn from_documents(
        state_root: StateRootDocument,
        accounts: Vec<AccountDocument>,
        assets: BTreeMap<String, AssetDocument>,
        proofs: Vec<ProofDocument>,
        network: &NetworkConfig,
    ) -> Result<Self, StoreError> {
        let state_root = state_root
            .state_root
            .parse::<StateRoot>()
            .map_err(|e| StoreError::Decode(format!("state root: {e}")))?;

        let accounts = accounts
            .into_iter()
            .map(|doc| {
                let address = parse_address(network, &doc.address)?;
                for coin in &doc.summary_coins {
                    check_amount(&doc.address, coin)?;
                }
                Ok(Account {
                    address,
                    account_number: doc.account_number,
                    balances: doc.summary_coins,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let assets = assets
            .into_iter()
            .map(|(denom, doc)| {
                if doc.amount < 0 {
                    return Err(StoreError::Decode(format!("asset {denom} has a negative amount")));
                }
                Ok(Asset { owner: parse_address(network, &doc.owner)?, denom, amount: doc.amount })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let proofs = proofs
            .into_iter()
            .map(|doc| {
                check_amount(&doc.address, &doc.coin)?;
                let siblings = doc
                    .proof
                    .iter()
                    .map(|node| {
                        decode_bytes32(node)
                            .map_err(|e| StoreError::Decode(format!("proof of {}: {e}", doc.address)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Proof {
                    address: parse_address(network, &doc.address)?,
                    index: doc.index,
                    coin: doc.coin,
                    siblings,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        let snapshot = Self { state_root, accounts, assets, proofs };
        snapshot.check_unique()?;
        Ok(snapshot)
    }

    /// One account per identifier and one proof per `(account, index, denom)`.
    pub fn check_unique(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::new();
        for account in &self.accounts {
            if !seen.insert(account.address) {
                return Err(StoreError::Duplicate(format!("account {}", account.address)));
            }
        }
        let mut seen = HashSet::new();
        for proof in &self.proofs {
            if !seen.insert((proof.address, proof.index, proof.coin.denom.as_str())) {
                return Err(StoreError::Duplicate(format!(
                    "proof {}/{}/{}",
                    proof.address, proof.index, proof.coin.denom
                )));
            }
        }
        Ok(())
    }
}

fn parse_address(network: &NetworkConfig, text: &str) -> Result<AccountId, StoreError> {
    network.parse_account(text).map_err(|e| StoreError::Decode(e.to_string()))
}

fn check_amount(owner: &str, coin: &Coin) -> Result<(), StoreError> {
    if coin.amount < 0 {
        return Err(StoreError::Decode(format!(
            "{owner} holds a negative amount of {}",
            coin.denom
        )));
    }
    Ok(())
}

pub(crate) fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, StoreError> {
    let raw = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::AddressStyle;

    fn network() -> NetworkConfig {
        NetworkConfig::for_chain("Binance-Chain-Ganges", AddressStyle::Bech32).unwrap()
    }

    fn root() -> StateRootDocument {
        StateRootDocument {
            state_root: "0xc27675ece817fc3a7119566ce036de47d6c0754617bd58b1d94bd0bfa1025706".into(),
        }
    }

    fn account(address: &str, amount: i64) -> AccountDocument {
        AccountDocument {
            address: address.into(),
            account_number: 1,
            summary_coins: vec![Coin::new("BNB", amount)],
        }
    }

    const ALICE: &str = "tbnb1vu8vu6jxqtwy5cc3kc6wj2fljsm5k0qqpwt3sn";

    #[test]
    fn test_account_document_ignores_other_coin_lists() {
        let doc: AccountDocument = serde_json::from_str(
            r#"{"address":"tbnb1vu8vu6jxqtwy5cc3kc6wj2fljsm5k0qqpwt3sn","account_number":3,
                "coins":[{"denom":"BNB","amount":1}],"frozen_coins":[],"locked_coins":[],
                "summary_coins":[{"denom":"BNB","amount":2}]}"#,
        )
        .unwrap();
        assert_eq!(doc.summary_coins, vec![Coin::new("BNB", 2)]);
    }

    #[test]
    fn test_duplicate_accounts_are_rejected() {
        let err = Snapshot::from_documents(
            root(),
            vec![account(ALICE, 1), account(ALICE, 2)],
            BTreeMap::new(),
            vec![],
            &network(),
        )
        .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let err =
            Snapshot::from_documents(root(), vec![account(ALICE, -5)], BTreeMap::new(), vec![], &network())
                .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_foreign_prefix_is_rejected() {
        let mainnet =
            NetworkConfig::for_chain(crate::network::MAINNET_CHAIN_ID, AddressStyle::Bech32).unwrap();
        let err = Snapshot::from_documents(root(), vec![account(ALICE, 1)], BTreeMap::new(), vec![], &mainnet)
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_load_fixture_documents() {
        let snapshot = Snapshot::load(&SnapshotPaths::default(), &network()).unwrap();
        assert_eq!(snapshot.accounts.len(), 2);
        assert_eq!(snapshot.proofs.len(), 4);
        assert_eq!(snapshot.assets.len(), 2);
        assert_eq!(
            snapshot.state_root.to_string(),
            "0xc27675ece817fc3a7119566ce036de47d6c0754617bd58b1d94bd0bfa1025706"
        );
    }
}
