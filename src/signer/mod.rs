// ./src/signer/mod.rs
//! Signing authority producing approval signatures, and loading of its key.

pub mod local;

use std::fmt;
use std::fs;
use std::sync::Arc;

use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use local::{recover_public_key, LocalKeyManager};

use crate::error::SignerError;
use crate::types::Bytes32;

/// Length of an `r ‖ s ‖ v` approval signature.
pub const APPROVAL_SIGNATURE_LENGTH: usize = 65;

pub const DEFAULT_SIGNING_KEY_VAR: &str = "APPROVER_SIGNING_KEY";

/// Holder of the service key.
pub trait SigningAuthority: Send + Sync {
    /// Signs a 32-byte digest, returning a low-S `r ‖ s ‖ v` signature with `v ∈ {0, 1}`.
    fn sign(&self, digest: &Bytes32) -> Result<[u8; APPROVAL_SIGNATURE_LENGTH], SignerError>;

    fn public_key(&self) -> PublicKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretType {
    #[default]
    Local,
    File,
    Env,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSecret {
    pub private_key: String,
}

impl fmt::Debug for LocalSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.private_key.is_empty() { "<empty>" } else { "<redacted>" };
        f.debug_struct("LocalSecret").field("private_key", &shown).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSecret {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSecret {
    pub var: String,
}

impl Default for EnvSecret {
    fn default() -> Self { Self { var: DEFAULT_SIGNING_KEY_VAR.to_string() } }
}

/// Where the approval key comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretConfig {
    #[serde(rename = "type")]
    pub kind: SecretType,
    pub local_secret: LocalSecret,
    pub file_secret: FileSecret,
    pub env_secret: EnvSecret,
}

impl SecretConfig {
    /// Resolves the hex private key from the configured source.
    pub fn private_key(&self) -> Result<String, SignerError> {
        let key = match self.kind {
            SecretType::Local => self.local_secret.private_key.clone(),
            SecretType::File => {
                if self.file_secret.path.is_empty() {
                    return Err(SignerError::MissingKey);
                }
                fs::read_to_string(&self.file_secret.path)?
            }
            SecretType::Env => std::env::var(&self.env_secret.var)
                .map_err(|_| SignerError::MissingEnv(self.env_secret.var.clone()))?,
        };
        let key = key.trim().to_string();
        if key.is_empty() {
            return Err(SignerError::MissingKey);
        }
        Ok(key)
    }
}

/// Builds the signing authority described by `config`.
pub fn from_config(config: &SecretConfig) -> Result<Arc<dyn SigningAuthority>, SignerError> {
    let km = LocalKeyManager::from_hex(&config.private_key()?)?;
    info!(source = ?config.kind, signer = %km.address(), "loaded approval key");
    Ok(Arc::new(km))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const APPROVAL_KEY: &str = "afc2986f283cf5f9d17e04c6a12ccf8fa46149fc37d48e11abef15a46ae34eb7";

    #[test]
    fn test_local_secret() {
        let config = SecretConfig {
            local_secret: LocalSecret { private_key: format!("0x{APPROVAL_KEY}") },
            ..Default::default()
        };
        let signer = from_config(&config).unwrap();
        assert_eq!(
            hex::encode(signer.public_key().serialize()),
            "02a29d6cb9cac62ddc2a001404685d173195938867d891ac73463c29b7ba6ffb17"
        );
        assert!(!format!("{config:?}").contains(APPROVAL_KEY));
    }

    #[test]
    fn test_file_secret() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{APPROVAL_KEY}").unwrap();
        let config = SecretConfig {
            kind: SecretType::File,
            file_secret: FileSecret { path: file.path().to_string_lossy().into_owned() },
            ..Default::default()
        };
        assert_eq!(config.private_key().unwrap(), APPROVAL_KEY);
    }

    #[test]
    fn test_env_secret_missing() {
        let config = SecretConfig {
            kind: SecretType::Env,
            env_secret: EnvSecret { var: "APPROVER_TEST_UNSET_SIGNING_KEY".into() },
            ..Default::default()
        };
        assert!(matches!(config.private_key(), Err(SignerError::MissingEnv(_))));
    }

    #[test]
    fn test_empty_local_secret() {
        assert!(matches!(SecretConfig::default().private_key(), Err(SignerError::MissingKey)));
    }
}
