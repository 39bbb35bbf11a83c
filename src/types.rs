// ./src/types.rs
//! Core type definitions for the approver
//!
//! This module defines the ledger snapshot records shared by the store
//! backends, the leaf encoder and the approval engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Type alias for 32-byte arrays used across cryptographic operations
pub type Bytes32 = [u8; 32];

/// Length in bytes of an account identifier and of an EVM address.
pub const ADDRESS_LENGTH: usize = 20;

/// Decodes a hex string with or without a `0x` prefix.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let trimmed = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")).unwrap_or(input);
    hex::decode(trimmed)
}

/// Encodes bytes as `0x`-prefixed lowercase hex.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes a `0x` hex string that must hold exactly 32 bytes.
pub fn decode_bytes32(input: &str) -> Result<Bytes32, String> {
    let bytes = decode_hex(input).map_err(|e| e.to_string())?;
    <Bytes32>::try_from(bytes.as_slice())
        .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))
}

/// Account identifier derived from a public key.
///
/// The textual form depends on the network (bech32 with the account prefix,
/// or `0x` hex); see [`crate::network::NetworkConfig`]. `Display` and serde
/// always use `0x` hex so the value is meaningful without a network.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; ADDRESS_LENGTH]);

impl AccountId {
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; ADDRESS_LENGTH]>::try_from(bytes).ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] { &self.0 }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] { &self.0 }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({self})")
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s).map_err(|e| e.to_string())?;
        Self::from_slice(&bytes).ok_or_else(|| format!("expected 20 bytes, got {}", bytes.len()))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Destination address on the EVM side of a claim.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct EvmAddress(pub [u8; ADDRESS_LENGTH]);

impl EvmAddress {
    pub fn is_zero(&self) -> bool { self.0 == [0u8; ADDRESS_LENGTH] }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] { &self.0 }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvmAddress({self})")
    }
}

impl FromStr for EvmAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s).map_err(|e| e.to_string())?;
        <[u8; ADDRESS_LENGTH]>::try_from(bytes.as_slice())
            .map(Self)
            .map_err(|_| format!("expected 20 bytes, got {}", bytes.len()))
    }
}

/// A single balance entry of an account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: i64,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: i64) -> Self {
        Self { denom: denom.into(), amount }
    }
}

/// An account of the snapshot ledger.
///
/// `balances` keeps the order used when the Merkle commitment was built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub address: AccountId,
    pub account_number: i64,
    pub balances: Vec<Coin>,
}

impl Account {
    /// Position of `denom` in the ordered balance list.
    pub fn position_of(&self, denom: &str) -> Option<usize> {
        self.balances.iter().position(|coin| coin.denom == denom)
    }
}

/// A token registered in the snapshot, used by register-token approvals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub owner: AccountId,
    pub denom: String,
    pub amount: i64,
}

/// Merkle membership proof for one `(account, index, denom)` leaf.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    pub address: AccountId,
    pub index: u32,
    pub coin: Coin,
    #[serde(with = "hex_bytes32_vec")]
    pub siblings: Vec<Bytes32>,
}

/// Root hash of the snapshot commitment.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct StateRoot(pub Bytes32);

impl StateRoot {
    pub fn as_bytes(&self) -> &Bytes32 { &self.0 }
}

impl fmt::Display for StateRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for StateRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateRoot({self})")
    }
}

impl FromStr for StateRoot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> { decode_bytes32(s).map(Self) }
}

impl Serialize for StateRoot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StateRoot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde helpers for lists of 32-byte hashes written as `0x` hex strings.
pub mod hex_bytes32_vec {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{decode_bytes32, encode_hex, Bytes32};

    pub fn serialize<S: Serializer>(hashes: &[Bytes32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(hashes.iter().map(encode_hex))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Bytes32>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter().map(|s| decode_bytes32(s).map_err(serde::de::Error::custom)).collect()
    }
}
