// ./src/signer/local.rs
use std::fmt;

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, SecretKey, SECP256K1};

use super::{SigningAuthority, APPROVAL_SIGNATURE_LENGTH};
use crate::crypto::EthereumScheme;
use crate::error::{CryptoError, SignerError};
use crate::types::{decode_hex, AccountId, Bytes32};

/// Signing authority holding a secp256k1 key in process memory.
pub struct LocalKeyManager {
    secret: SecretKey,
    public: PublicKey,
}

impl LocalKeyManager {
    pub fn new(secret: SecretKey) -> Self {
        let public = PublicKey::from_secret_key(SECP256K1, &secret);
        Self { secret, public }
    }

    /// Parses a hex private key, `0x` optional.
    pub fn from_hex(private_key: &str) -> Result<Self, SignerError> {
        let trimmed = private_key.trim();
        if trimmed.is_empty() {
            return Err(SignerError::MissingKey);
        }
        let raw = decode_hex(trimmed).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        let secret =
            SecretKey::from_slice(&raw).map_err(|e| SignerError::InvalidKey(e.to_string()))?;
        Ok(Self::new(secret))
    }

    /// Ethereum-style address of the approval key.
    pub fn address(&self) -> AccountId { EthereumScheme::address_of(&self.public) }
}

impl fmt::Debug for LocalKeyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeyManager").field("address", &self.address()).finish_non_exhaustive()
    }
}

impl SigningAuthority for LocalKeyManager {
    fn sign(&self, digest: &Bytes32) -> Result<[u8; APPROVAL_SIGNATURE_LENGTH], SignerError> {
        let message =
            Message::from_slice(digest).map_err(|e| SignerError::Signing(e.to_string()))?;
        let (recovery_id, compact) =
            SECP256K1.sign_ecdsa_recoverable(&message, &self.secret).serialize_compact();
        let mut out = [0u8; APPROVAL_SIGNATURE_LENGTH];
        out[..64].copy_from_slice(&compact);
        out[64] = recovery_id.to_i32() as u8;
        Ok(out)
    }

    fn public_key(&self) -> PublicKey { self.public }
}

/// Recovers the key behind a 65-byte `r ‖ s ‖ v` approval signature.
pub fn recover_public_key(digest: &Bytes32, signature: &[u8]) -> Result<PublicKey, CryptoError> {
    if signature.len() != APPROVAL_SIGNATURE_LENGTH {
        return Err(CryptoError::InvalidSignatureEncoding(format!(
            "expected {APPROVAL_SIGNATURE_LENGTH} bytes, got {}",
            signature.len()
        )));
    }
    let recovery_id = RecoveryId::from_i32(i32::from(signature[64]))
        .map_err(|e| CryptoError::InvalidSignatureEncoding(e.to_string()))?;
    let recoverable = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(|e| CryptoError::InvalidSignatureEncoding(e.to_string()))?;
    let message = Message::from_slice(digest)
        .map_err(|e| CryptoError::InvalidSignatureEncoding(e.to_string()))?;
    SECP256K1.recover_ecdsa(&message, &recoverable).map_err(|_| CryptoError::InvalidSignature)
}
