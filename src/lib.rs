// ./src/lib.rs

pub mod app;
pub mod approval;
pub mod config;
pub mod crypto;
pub mod error;
pub mod http;
pub mod leaf;
pub mod logging;
pub mod merkle;
pub mod network;
pub mod signer;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod whitelist;

pub use approval::{ApprovalService, ApprovalSettings, ClaimApprovalRequest, ClaimApprovalResponse};
pub use config::Config;
pub use error::{ApprovalError, Result};
pub use leaf::LeafEncoder;
pub use network::NetworkConfig;
pub use types::{AccountId, Bytes32, EvmAddress};
