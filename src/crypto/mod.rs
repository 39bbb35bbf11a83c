// ./src/crypto/mod.rs
//! Hash primitives, identity schemes and ownership signature checks.

pub mod identity;
pub mod signature;

use bitcoin::hashes::{hash160, Hash};
use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::types::Bytes32;

pub use identity::{CosmosScheme, EthereumScheme, IdentityScheme, SchemeKind};
pub use signature::verify_signature;

const ETH_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

pub fn keccak256(data: &[u8]) -> Bytes32 {
    Keccak256::digest(data).into()
}

pub fn sha256(data: &[u8]) -> Bytes32 {
    Sha256::digest(data).into()
}

/// `RIPEMD160(SHA256(data))`
pub fn hash160(data: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(data).to_byte_array()
}

/// Keccak256 of `message` behind the `personal_sign` prefix and its decimal length.
pub fn eth_signed_message_hash(message: &[u8]) -> Bytes32 {
    let mut hasher = Keccak256::new();
    hasher.update(ETH_MESSAGE_PREFIX);
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize().into()
}
