// ./src/crypto/identity.rs
//! Identity schemes: how a public key becomes an account identifier and how
//! an ownership message is hashed before verification.

use std::sync::Arc;

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};

use super::{eth_signed_message_hash, hash160, keccak256, sha256, verify_signature};
use crate::error::CryptoError;
use crate::types::{AccountId, Bytes32};

pub const COMPRESSED_KEY_LENGTH: usize = 33;
pub const UNCOMPRESSED_KEY_LENGTH: usize = 65;

/// Identity derivation and message hashing for one key scheme.
pub trait IdentityScheme: Send + Sync {
    /// Parses `public_key` and derives the account it controls.
    fn recover_identity(&self, public_key: &[u8]) -> Result<(AccountId, PublicKey), CryptoError>;

    /// Hash of an ownership message as signed by a wallet of this scheme.
    fn message_hash(&self, message: &[u8]) -> Bytes32;

    fn verify_signature(
        &self,
        public_key: &PublicKey,
        signature: &[u8],
        message: &[u8],
    ) -> Result<(), CryptoError> {
        verify_signature(public_key, signature, &self.message_hash(message))
    }
}

/// `RIPEMD160(SHA256(compressed key))`, messages hashed with SHA-256.
#[derive(Debug, Default, Clone, Copy)]
pub struct CosmosScheme;

impl IdentityScheme for CosmosScheme {
    fn recover_identity(&self, public_key: &[u8]) -> Result<(AccountId, PublicKey), CryptoError> {
        if public_key.len() != COMPRESSED_KEY_LENGTH {
            return Err(CryptoError::InvalidPublicKey(format!(
                "expected {COMPRESSED_KEY_LENGTH} bytes, got {}",
                public_key.len()
            )));
        }
        let key = parse_key(public_key)?;
        Ok((AccountId(hash160(&key.serialize())), key))
    }

    fn message_hash(&self, message: &[u8]) -> Bytes32 { sha256(message) }
}

/// Last 20 bytes of `Keccak256(uncompressed key without the 0x04 tag)`,
/// messages hashed the `personal_sign` way.
#[derive(Debug, Default, Clone, Copy)]
pub struct EthereumScheme;

impl EthereumScheme {
    pub fn address_of(key: &PublicKey) -> AccountId {
        let uncompressed = key.serialize_uncompressed();
        let digest = keccak256(&uncompressed[1..]);
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[12..]);
        AccountId(out)
    }
}

impl IdentityScheme for EthereumScheme {
    fn recover_identity(&self, public_key: &[u8]) -> Result<(AccountId, PublicKey), CryptoError> {
        if public_key.len() != COMPRESSED_KEY_LENGTH && public_key.len() != UNCOMPRESSED_KEY_LENGTH {
            return Err(CryptoError::InvalidPublicKey(format!(
                "expected {COMPRESSED_KEY_LENGTH} or {UNCOMPRESSED_KEY_LENGTH} bytes, got {}",
                public_key.len()
            )));
        }
        let key = parse_key(public_key)?;
        Ok((Self::address_of(&key), key))
    }

    fn message_hash(&self, message: &[u8]) -> Bytes32 { eth_signed_message_hash(message) }
}

fn parse_key(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    PublicKey::from_slice(bytes).map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
}

/// Scheme selector used in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    #[default]
    Cosmos,
    Ethereum,
}

impl SchemeKind {
    pub fn build(self) -> Arc<dyn IdentityScheme> {
        match self {
            SchemeKind::Cosmos => Arc::new(CosmosScheme),
            SchemeKind::Ethereum => Arc::new(EthereumScheme),
        }
    }
}
