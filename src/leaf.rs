// ./src/leaf.rs
//! Byte layout of the Merkle leaves committed in a snapshot.
//!
//! A balance entry is either `pad32(denom) ‖ be256(amount)` ([`EntryLayout::Symbol`])
//! or `be256(index) ‖ pad32(denom) ‖ be256(amount)` ([`EntryLayout::Indexed`]).
//! A per-denom leaf is `address ‖ entry(selected)`; a full-account leaf is
//! `address ‖ be256(account_number) ‖ entry(0) ‖ … ‖ entry(n-1)`.
//! The leaf hash is `Keccak256(leaf bytes)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::keccak256;
use crate::types::{Account, Bytes32};

pub const WORD_LENGTH: usize = 32;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LeafError {
    #[error("denom {0:?} is longer than 32 bytes")]
    DenomTooLong(String),
    #[error("amount {amount} of {denom} is negative")]
    NegativeAmount { denom: String, amount: i64 },
    #[error("token {0} amount is zero")]
    ZeroBalance(String),
    #[error("token index {index} does not select {denom}")]
    IndexMismatch { index: u32, denom: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafVersion {
    /// One leaf per `(account, denom)`
    #[default]
    PerDenom,
    /// One leaf per account covering its whole balance list
    FullAccount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryLayout {
    #[default]
    Symbol,
    Indexed,
}

/// Encoded leaf of one account and selected denom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    /// Hash preimage
    pub bytes: Vec<u8>,
    /// Index of the selected entry in the account's balance list
    pub index: usize,
    /// Bytes before and after the selected entry, full-account leaves only
    pub split: Option<(Vec<u8>, Vec<u8>)>,
}

impl Leaf {
    pub fn hash(&self) -> Bytes32 { keccak256(&self.bytes) }
}

/// Deterministic leaf serializer for one deployment's leaf version and entry layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeafEncoder {
    pub version: LeafVersion,
    pub layout: EntryLayout,
}

impl LeafEncoder {
    pub fn new(version: LeafVersion, layout: EntryLayout) -> Self { Self { version, layout } }

    /// Encodes the leaf selecting `denom` from `account`.
    ///
    /// When `token_index` is given it must be the position of `denom` in the
    /// balance list. The selected balance must be non-zero.
    pub fn encode(
        &self,
        account: &Account,
        denom: &str,
        token_index: Option<u32>,
    ) -> Result<Leaf, LeafError> {
        let index = self.select(account, denom, token_index)?;
        self.encode_at(account, index)
    }

    /// Looks up the position of `denom` and checks its balance is spendable.
    pub fn select(
        &self,
        account: &Account,
        denom: &str,
        token_index: Option<u32>,
    ) -> Result<usize, LeafError> {
        let index = account
            .position_of(denom)
            .ok_or_else(|| LeafError::ZeroBalance(denom.to_string()))?;
        if let Some(requested) = token_index {
            if requested as usize != index {
                return Err(LeafError::IndexMismatch { index: requested, denom: denom.to_string() });
            }
        }
        let amount = account.balances[index].amount;
        if amount < 0 {
            return Err(LeafError::NegativeAmount { denom: denom.to_string(), amount });
        }
        if amount == 0 {
            return Err(LeafError::ZeroBalance(denom.to_string()));
        }
        Ok(index)
    }

    /// Encodes the leaf for the entry at `index`, without balance checks.
    pub fn encode_at(&self, account: &Account, index: usize) -> Result<Leaf, LeafError> {
        let mut bytes = account.address.as_ref().to_vec();
        match self.version {
            LeafVersion::PerDenom => {
                let coin = &account.balances[index];
                self.write_entry(&mut bytes, index, &coin.denom, coin.amount)?;
                Ok(Leaf { bytes, index, split: None })
            }
            LeafVersion::FullAccount => {
                bytes.extend_from_slice(&encode_amount(
                    "account_number",
                    account.account_number,
                )?);
                let mut selected = (0, 0);
                for (i, coin) in account.balances.iter().enumerate() {
                    let start = bytes.len();
                    self.write_entry(&mut bytes, i, &coin.denom, coin.amount)?;
                    if i == index {
                        selected = (start, bytes.len());
                    }
                }
                let split = (bytes[..selected.0].to_vec(), bytes[selected.1..].to_vec());
                Ok(Leaf { bytes, index, split: Some(split) })
            }
        }
    }

    fn write_entry(
        &self,
        out: &mut Vec<u8>,
        index: usize,
        denom: &str,
        amount: i64,
    ) -> Result<(), LeafError> {
        if self.layout == EntryLayout::Indexed {
            out.extend_from_slice(&encode_word(index as u64));
        }
        out.extend_from_slice(&pad_denom(denom)?);
        out.extend_from_slice(&encode_amount(denom, amount)?);
        Ok(())
    }
}

/// Right-pads `denom` with zeros to 32 bytes.
pub fn pad_denom(denom: &str) -> Result<[u8; WORD_LENGTH], LeafError> {
    let raw = denom.as_bytes();
    if raw.len() > WORD_LENGTH {
        return Err(LeafError::DenomTooLong(denom.to_string()));
    }
    let mut out = [0u8; WORD_LENGTH];
    out[..raw.len()].copy_from_slice(raw);
    Ok(out)
}

/// 32-byte big-endian encoding of a non-negative amount.
pub fn encode_amount(denom: &str, amount: i64) -> Result<[u8; WORD_LENGTH], LeafError> {
    u64::try_from(amount)
        .map(encode_word)
        .map_err(|_| LeafError::NegativeAmount { denom: denom.to_string(), amount })
}

fn encode_word(value: u64) -> [u8; WORD_LENGTH] {
    let mut out = [0u8; WORD_LENGTH];
    out[WORD_LENGTH - 8..].copy_from_slice(&value.to_be_bytes());
    out
}
