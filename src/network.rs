// ./src/network.rs
//! Network parameters threaded through identity formatting and store loading.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AccountId;

/// Chain id of the production network, whose accounts use the `bnb` prefix.
pub const MAINNET_CHAIN_ID: &str = "Binance-Chain-Tigris";
pub const MAINNET_ACCOUNT_PREFIX: &str = "bnb";
pub const TESTNET_ACCOUNT_PREFIX: &str = "tbnb";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid account prefix {0:?}")]
    InvalidPrefix(String),
    #[error("account {address:?} does not use prefix {expected:?}")]
    WrongPrefix { address: String, expected: String },
    #[error("invalid account encoding: {0}")]
    Encoding(String),
    #[error("account must be 20 bytes, got {0}")]
    Length(usize),
}

/// Textual form of account identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressStyle {
    /// bech32 with the network's account prefix
    Bech32,
    /// `0x` hex
    Hex,
}

/// Network identity of a deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    chain_id: String,
    account_prefix: Hrp,
    style: AddressStyle,
}

impl NetworkConfig {
    pub fn new(
        chain_id: impl Into<String>,
        account_prefix: &str,
        style: AddressStyle,
    ) -> Result<Self, AddressError> {
        let account_prefix = Hrp::parse(account_prefix)
            .map_err(|_| AddressError::InvalidPrefix(account_prefix.to_string()))?;
        Ok(Self { chain_id: chain_id.into(), account_prefix, style })
    }

    /// Picks the account prefix from the chain id: mainnet uses `bnb`, every
    /// other chain `tbnb`.
    pub fn for_chain(chain_id: &str, style: AddressStyle) -> Result<Self, AddressError> {
        Self::new(chain_id, default_prefix(chain_id), style)
    }

    pub fn chain_id(&self) -> &str { &self.chain_id }

    pub fn account_prefix(&self) -> &str { self.account_prefix.as_str() }

    pub fn style(&self) -> AddressStyle { self.style }

    /// Formats an account in the network's textual form.
    pub fn format_account(&self, account: &AccountId) -> String {
        match self.style {
            AddressStyle::Hex => account.to_string(),
            AddressStyle::Bech32 => bech32::encode::<Bech32>(self.account_prefix, account.as_ref())
                .unwrap_or_else(|_| account.to_string()),
        }
    }

    /// Parses an account from the network's textual form.
    pub fn parse_account(&self, input: &str) -> Result<AccountId, AddressError> {
        let bytes = match self.style {
            AddressStyle::Hex => crate::types::decode_hex(input)
                .map_err(|e| AddressError::Encoding(e.to_string()))?,
            AddressStyle::Bech32 => {
                let (hrp, data) =
                    bech32::decode(input).map_err(|e| AddressError::Encoding(e.to_string()))?;
                if !hrp.as_str().eq_ignore_ascii_case(self.account_prefix.as_str()) {
                    return Err(AddressError::WrongPrefix {
                        address: input.to_string(),
                        expected: self.account_prefix.to_string(),
                    });
                }
                data
            }
        };
        AccountId::from_slice(&bytes).ok_or(AddressError::Length(bytes.len()))
    }
}

pub fn default_prefix(chain_id: &str) -> &'static str {
    if chain_id == MAINNET_CHAIN_ID {
        MAINNET_ACCOUNT_PREFIX
    } else {
        TESTNET_ACCOUNT_PREFIX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        "0x670ece6a4602dc4a6311b634e9293f94374b3c00".parse().unwrap()
    }

    #[test]
    fn test_prefix_follows_chain_id() {
        let testnet = NetworkConfig::for_chain("Binance-Chain-Ganges", AddressStyle::Bech32).unwrap();
        assert_eq!(testnet.account_prefix(), "tbnb");
        let mainnet = NetworkConfig::for_chain(MAINNET_CHAIN_ID, AddressStyle::Bech32).unwrap();
        assert_eq!(mainnet.account_prefix(), "bnb");
    }

    #[test]
    fn test_bech32_format_and_parse() {
        let network = NetworkConfig::for_chain("Binance-Chain-Ganges", AddressStyle::Bech32).unwrap();
        let text = network.format_account(&alice());
        assert_eq!(text, "tbnb1vu8vu6jxqtwy5cc3kc6wj2fljsm5k0qqpwt3sn");
        assert_eq!(network.parse_account(&text).unwrap(), alice());
    }

    #[test]
    fn test_parse_rejects_foreign_prefix() {
        let mainnet = NetworkConfig::for_chain(MAINNET_CHAIN_ID, AddressStyle::Bech32).unwrap();
        let err = mainnet.parse_account("tbnb1vu8vu6jxqtwy5cc3kc6wj2fljsm5k0qqpwt3sn").unwrap_err();
        assert!(matches!(err, AddressError::WrongPrefix { .. }));
    }

    #[test]
    fn test_hex_style() {
        let network = NetworkConfig::for_chain("Binance-Chain-Ganges", AddressStyle::Hex).unwrap();
        let text = network.format_account(&alice());
        assert_eq!(text, "0x670ece6a4602dc4a6311b634e9293f94374b3c00");
        assert_eq!(network.parse_account(&text).unwrap(), alice());
        assert!(matches!(network.parse_account("0x0102"), Err(AddressError::Length(2))));
    }
}
