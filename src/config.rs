// ./src/config.rs
//! Service configuration loaded from TOML, `.env` and `APPROVER_*` variables.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::approval::{ApprovalSettings, PayloadFormat};
use crate::crypto::SchemeKind;
use crate::leaf::{EntryLayout, LeafEncoder, LeafVersion};
use crate::network::{default_prefix, AddressStyle, NetworkConfig};
use crate::signer::SecretConfig;
use crate::store::StoreConfig;
use crate::whitelist::Whitelist;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.config.toml";
pub const ENV_PREFIX: &str = "APPROVER_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self { Self { level: "info".to_string(), format: LogFormat::Console } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub addr: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self { Self { addr: "0.0.0.0".to_string(), port: 8080 } }
}

impl HttpConfig {
    pub fn bind_address(&self) -> String { format!("{}:{}", self.addr, self.port) }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub chain_id: String,
    /// Overrides the prefix derived from `chain_id`.
    pub account_prefix: Option<String>,
    /// Defaults to bech32 for the cosmos scheme and hex for ethereum.
    pub address_style: Option<AddressStyle>,
    pub identity_scheme: SchemeKind,
    pub leaf_version: LeafVersion,
    pub entry_layout: EntryLayout,
    pub payload_format: PayloadFormat,
    pub account_whitelist: Vec<String>,
    pub logger: LoggerConfig,
    pub http: HttpConfig,
    pub secret: SecretConfig,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: "Binance-Chain-Ganges".to_string(),
            account_prefix: None,
            address_style: None,
            identity_scheme: SchemeKind::default(),
            leaf_version: LeafVersion::default(),
            entry_layout: EntryLayout::default(),
            payload_format: PayloadFormat::default(),
            account_whitelist: Vec::new(),
            logger: LoggerConfig::default(),
            http: HttpConfig::default(),
            secret: SecretConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Reads `path`, then applies `.env` and process environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        dotenv::dotenv().ok();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> { Ok(toml::from_str(contents)?) }

    /// Applies `APPROVER_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        if let Some(v) = var("CHAIN_ID") {
            self.chain_id = v;
        }
        if let Some(v) = var("HTTP_ADDR") {
            self.http.addr = v;
        }
        if let Some(v) = var("HTTP_PORT") {
            self.http.port = v.parse().with_context(|| format!("invalid {ENV_PREFIX}HTTP_PORT {v:?}"))?;
        }
        if let Some(v) = var("LOGGER_LEVEL") {
            self.logger.level = v;
        }
        if let Some(v) = var("LOGGER_FORMAT") {
            self.logger.format = parse_variant(&v).context("invalid APPROVER_LOGGER_FORMAT")?;
        }
        if let Some(v) = var("SECRET_PRIVATE_KEY") {
            self.secret.local_secret.private_key = v;
        }
        if let Some(v) = var("STORE_DRIVER") {
            self.store.driver = parse_variant(&v).context("invalid APPROVER_STORE_DRIVER")?;
        }
        Ok(())
    }

    /// Checks the values that can be checked without touching the store or key.
    pub fn validate(&self) -> Result<()> {
        let network = self.network()?;
        Whitelist::from_config(&network, &self.account_whitelist)
            .context("invalid account_whitelist entry")?;
        Ok(())
    }

    pub fn address_style(&self) -> AddressStyle {
        self.address_style.unwrap_or(match self.identity_scheme {
            SchemeKind::Cosmos => AddressStyle::Bech32,
            SchemeKind::Ethereum => AddressStyle::Hex,
        })
    }

    pub fn network(&self) -> Result<NetworkConfig> {
        let prefix =
            self.account_prefix.clone().unwrap_or_else(|| default_prefix(&self.chain_id).to_string());
        Ok(NetworkConfig::new(self.chain_id.clone(), &prefix, self.address_style())?)
    }

    pub fn leaf_encoder(&self) -> LeafEncoder { LeafEncoder::new(self.leaf_version, self.entry_layout) }

    pub fn approval_settings(&self) -> Result<ApprovalSettings> {
        let network = self.network()?;
        let whitelist = Whitelist::from_config(&network, &self.account_whitelist)
            .context("invalid account_whitelist entry")?;
        Ok(ApprovalSettings {
            network,
            scheme: self.identity_scheme,
            encoder: self.leaf_encoder(),
            payload_format: self.payload_format,
            whitelist,
        })
    }
}

fn parse_variant<T: DeserializeOwned>(value: &str) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::String(value.trim().to_lowercase()))?)
}
