// ./src/crypto/signature.rs

use secp256k1::{ecdsa::Signature, Message, PublicKey, SECP256K1};

use crate::error::CryptoError;
use crate::types::Bytes32;

/// Length of a compact `r ‖ s` ownership signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// Verifies a compact secp256k1 ECDSA signature over a 32-byte message hash.
///
/// Only lower-half `s` values are accepted: the complementary `n - s` form of
/// an otherwise valid signature fails with [`CryptoError::MalleableSignature`].
pub fn verify_signature(
    public_key: &PublicKey,
    signature: &[u8],
    hash: &Bytes32,
) -> Result<(), CryptoError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(CryptoError::InvalidSignatureEncoding(format!(
            "expected {SIGNATURE_LENGTH} bytes, got {}",
            signature.len()
        )));
    }
    let sig = Signature::from_compact(signature)
        .map_err(|e| CryptoError::InvalidSignatureEncoding(e.to_string()))?;

    let mut normalized = sig;
    normalized.normalize_s();
    if normalized.serialize_compact() != sig.serialize_compact() {
        return Err(CryptoError::MalleableSignature);
    }

    let message = Message::from_slice(hash)
        .map_err(|e| CryptoError::InvalidSignatureEncoding(e.to_string()))?;
    SECP256K1
        .verify_ecdsa(&message, &sig, public_key)
        .map_err(|_| CryptoError::InvalidSignature)
}
