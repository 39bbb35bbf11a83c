// ./src/error.rs
//! Error types for the approver
//!
//! Each concern (crypto, store, signer) has its own error enum. The approval
//! engine folds them into [`ApprovalError`], whose variants are the request
//! level failure kinds reported to clients.

use thiserror::Error;

/// Errors raised while parsing keys and verifying ownership signatures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CryptoError {
    /// Wrong length or not a point on secp256k1
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Signature bytes do not decode into an (r, s) pair
    #[error("invalid signature encoding: {0}")]
    InvalidSignatureEncoding(String),

    /// `s` lies in the upper half of the curve order
    #[error("malleable signature: s is not in the lower half of the curve order")]
    MalleableSignature,

    /// ECDSA verification failed
    #[error("invalid signature")]
    InvalidSignature,
}

/// Errors raised by ledger store backends.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    #[error("account not found")]
    AccountNotFound,

    #[error("proof not found")]
    ProofNotFound,

    #[error("asset not found")]
    AssetNotFound,

    #[error("state root not found")]
    StateRootNotFound,

    /// A snapshot record could not be decoded
    #[error("invalid snapshot record: {0}")]
    Decode(String),

    /// Two snapshot records share the same key
    #[error("duplicate snapshot record: {0}")]
    Duplicate(String),

    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("key-value backend error: {0}")]
    Backend(#[from] sled::Error),
}

/// Errors raised while loading the signing key or producing a signature.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SignerError {
    #[error("signing key is not configured")]
    MissingKey,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    #[error("failed to read signing key: {0}")]
    Io(#[from] std::io::Error),

    #[error("signing failed: {0}")]
    Signing(String),
}

/// Request level failure kinds of the approval engine.
///
/// Every variant is terminal for the request that produced it.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ApprovalError {
    /// Malformed or undecodable input
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malleable signature")]
    MalleableSignature,

    #[error("address {0} is not in white list")]
    NotWhitelisted(String),

    #[error("account not found")]
    AccountNotFound,

    #[error("proof not found")]
    ProofNotFound,

    #[error("asset not found")]
    AssetNotFound,

    #[error("requester is not the owner of asset {0}")]
    NotAssetOwner(String),

    #[error("token {0} amount is zero")]
    ZeroBalance(String),

    #[error("signing failed: {0}")]
    SigningFailed(#[from] SignerError),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApprovalError {
    /// Stable name of the failure kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ApprovalError::BadRequest(_) => "bad_request",
            ApprovalError::InvalidPublicKey(_) => "invalid_public_key",
            ApprovalError::InvalidSignature => "invalid_signature",
            ApprovalError::MalleableSignature => "malleable_signature",
            ApprovalError::NotWhitelisted(_) => "not_whitelisted",
            ApprovalError::AccountNotFound => "account_not_found",
            ApprovalError::ProofNotFound => "proof_not_found",
            ApprovalError::AssetNotFound => "asset_not_found",
            ApprovalError::NotAssetOwner(_) => "not_asset_owner",
            ApprovalError::ZeroBalance(_) => "zero_balance",
            ApprovalError::SigningFailed(_) => "signing_failed",
            ApprovalError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl From<CryptoError> for ApprovalError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidPublicKey(reason) => ApprovalError::InvalidPublicKey(reason),
            CryptoError::InvalidSignatureEncoding(_) | CryptoError::InvalidSignature => {
                ApprovalError::InvalidSignature
            }
            CryptoError::MalleableSignature => ApprovalError::MalleableSignature,
        }
    }
}

impl From<StoreError> for ApprovalError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AccountNotFound => ApprovalError::AccountNotFound,
            StoreError::ProofNotFound => ApprovalError::ProofNotFound,
            StoreError::AssetNotFound => ApprovalError::AssetNotFound,
            other => ApprovalError::StoreUnavailable(other.to_string()),
        }
    }
}

/// Result type alias for the approval engine
pub type Result<T> = std::result::Result<T, ApprovalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_errors_map_to_request_kinds() {
        let err: ApprovalError = CryptoError::InvalidSignatureEncoding("r overflow".into()).into();
        assert!(matches!(err, ApprovalError::InvalidSignature));

        let err: ApprovalError = CryptoError::MalleableSignature.into();
        assert_eq!(err.kind(), "malleable_signature");

        let err: ApprovalError = CryptoError::InvalidPublicKey("33 bytes".into()).into();
        assert!(matches!(err, ApprovalError::InvalidPublicKey(_)));
    }

    #[test]
    fn test_store_errors_keep_not_found_kinds_distinct() {
        assert!(matches!(ApprovalError::from(StoreError::AccountNotFound), ApprovalError::AccountNotFound));
        assert!(matches!(ApprovalError::from(StoreError::ProofNotFound), ApprovalError::ProofNotFound));
        let err = ApprovalError::from(StoreError::StateRootNotFound);
        assert!(matches!(err, ApprovalError::StoreUnavailable(_)));
        assert_eq!(err.kind(), "store_unavailable");
    }
}
