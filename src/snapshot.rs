// ./src/snapshot.rs
//! Offline consistency check of a ledger snapshot against its state root.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::leaf::LeafEncoder;
use crate::merkle::compute_root;
use crate::store::LedgerStore;
use crate::types::{encode_hex, AccountId, Bytes32};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MismatchReason {
    /// No account record for the proof's address
    AccountMissing,
    /// The account holds a different denom or amount at the proof's index
    EntryMismatch,
    /// The leaf cannot be encoded
    Unencodable(String),
    /// The proof folds to another root
    RootMismatch { computed: Bytes32 },
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::AccountMissing => write!(f, "account missing"),
            MismatchReason::EntryMismatch => write!(f, "balance entry differs from proof coin"),
            MismatchReason::Unencodable(reason) => write!(f, "leaf cannot be encoded: {reason}"),
            MismatchReason::RootMismatch { computed } => {
                write!(f, "proof folds to {}", encode_hex(computed))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofMismatch {
    pub address: AccountId,
    pub index: u32,
    pub denom: String,
    pub reason: MismatchReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub accounts: usize,
    pub proofs: usize,
    pub mismatches: Vec<ProofMismatch>,
}

impl SnapshotReport {
    pub fn is_consistent(&self) -> bool { self.mismatches.is_empty() }
}

/// Re-derives every proof's leaf and checks it folds to the state root.
pub fn verify_snapshot(
    store: &dyn LedgerStore,
    encoder: LeafEncoder,
) -> Result<SnapshotReport, StoreError> {
    let root = store.get_state_root()?;
    let accounts: HashMap<_, _> =
        store.accounts()?.into_iter().map(|account| (account.address, account)).collect();
    let proofs = store.proofs()?;

    let mut report =
        SnapshotReport { accounts: accounts.len(), proofs: proofs.len(), mismatches: Vec::new() };

    for proof in proofs {
        let reason = match accounts.get(&proof.address) {
            None => Some(MismatchReason::AccountMissing),
            Some(account) => match account.balances.get(proof.index as usize) {
                Some(coin) if *coin == proof.coin => {
                    match encoder.encode_at(account, proof.index as usize) {
                        Ok(leaf) => {
                            let computed = compute_root(leaf.hash(), &proof.siblings);
                            (computed != root.0).then_some(MismatchReason::RootMismatch { computed })
                        }
                        Err(e) => Some(MismatchReason::Unencodable(e.to_string())),
                    }
                }
                _ => Some(MismatchReason::EntryMismatch),
            },
        };
        match reason {
            Some(reason) => {
                warn!(
                    address = %proof.address,
                    index = proof.index,
                    denom = %proof.coin.denom,
                    %reason,
                    "snapshot proof mismatch"
                );
                report.mismatches.push(ProofMismatch {
                    address: proof.address,
                    index: proof.index,
                    denom: proof.coin.denom,
                    reason,
                });
            }
            None => debug!(address = %proof.address, denom = %proof.coin.denom, "proof ok"),
        }
    }
    Ok(report)
}
