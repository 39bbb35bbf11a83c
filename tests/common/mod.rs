#![allow(dead_code)]

use std::sync::Arc;

use token_recover_approver::approval::{ApprovalService, ApprovalSettings};
use token_recover_approver::network::{AddressStyle, NetworkConfig};
use token_recover_approver::signer::LocalKeyManager;
use token_recover_approver::store::{LedgerStore, MemoryStore, Snapshot, SnapshotPaths};

pub const CHAIN_ID: &str = "Binance-Chain-Ganges";
pub const APPROVAL_KEY: &str = "0xafc2986f283cf5f9d17e04c6a12ccf8fa46149fc37d48e11abef15a46ae34eb7";
pub const DESTINATION: &str = "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4";

pub const ALICE_PK: &str = "0x025eed5fa3a67696c334762bb4823e585e2ee579aba3558d9955296d6c04541b42";
pub const BOB_PK: &str = "0x02347746ccb908e583927285fa4bd202f08e2f82f09c920233d89c47c79e48f937";

/// Alice's cosmos signature over the BNB claim of 1000000000 to `DESTINATION`.
pub const ALICE_CLAIM_BNB_SIG: &str = "0xa8b16dd6e5ee27e0f8586137849d9ba37cb33f424100374cdd7f2998f31e3ddb6b474e632852e546580dcf5f78dc1bd11d056e80af91cf6d6d8d38f11eef5cbf";
/// Alice's `personal_sign` signature over the same claim.
pub const ALICE_CLAIM_BNB_ETH_SIG: &str = "0x53b211961ddef633fa870b3a5d60a67ed0de0549241a1bdfdfed52136ba5f6734e6f4d8d95d1e18a9ea1d7358dbb034f786c0125dcbba0fae91e834b37041a94";
/// Alice's signature over a BTCB-1DE claim of 0.
pub const ALICE_CLAIM_ZERO_SIG: &str = "0xf8953e83a0adf8e16b1c956aae23f126ccfd1a40d1f89915ecbf219476998f452b0009dba282a33a360efec5b470c224b4eb6690c5c106598d975e8936e0318a";
/// Bob's signature over the BUSD-BD1 claim of 250000000.
pub const BOB_CLAIM_BUSD_SIG: &str = "0x04ba149dcb0341360bc298deb706cc620effed763d8fdf84c62c6591f04772154b1e8fb255b5448c85a25372efd35b1a1bc3f381260de88d50ed61ea06f4e3a4";
/// Bob's signature registering BUSD-BD1 (250000000000) to `DESTINATION`.
pub const BOB_REGISTER_BUSD_SIG: &str = "0x3b37d446a903971c34f3f9714b850e484170f219d5126a6ec9185c173e15144d1df231c1be59e8db62b7fbf59a9107af567d5a55df4753174416b103a76d328f";

pub const FIXTURE_ALICE_BNB_APPROVAL: &str = "0x3a15ae83088ae56619d9ae63f2c5a977f0e80208cc22ef3a713893057789443952580275d4f043e84e8be778d2dea63364af56726b822681ca43b4d1ce08a86200";
pub const FIXTURE_BOB_REGISTER_APPROVAL: &str = "0x13102aa1b583df27dd217cd8853b237a27e302e7bb218f0338ed4752ecc4a7237a7fb57e5414363150bc6193bb16a4c35b19d8486cfb22ceb51fba47aac7c03901";

pub fn network() -> NetworkConfig {
    NetworkConfig::for_chain(CHAIN_ID, AddressStyle::Bech32).unwrap()
}

pub fn fixture_paths() -> SnapshotPaths {
    let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/store");
    SnapshotPaths {
        state_root: format!("{dir}/state_root.json"),
        assets: format!("{dir}/assets.json"),
        accounts: format!("{dir}/accounts.json"),
        merkle_proofs: format!("{dir}/merkle_proofs.json"),
    }
}

pub fn fixture_snapshot() -> Snapshot { Snapshot::load(&fixture_paths(), &network()).unwrap() }

pub fn fixture_store() -> MemoryStore { MemoryStore::from_snapshot(fixture_snapshot()).unwrap() }

pub fn signer() -> LocalKeyManager { LocalKeyManager::from_hex(APPROVAL_KEY).unwrap() }

pub fn service_with(
    store: Arc<dyn LedgerStore>,
    configure: impl FnOnce(&mut ApprovalSettings),
) -> ApprovalService {
    let mut settings = ApprovalSettings::new(network());
    configure(&mut settings);
    ApprovalService::new(settings, store, Arc::new(signer()))
}

pub fn fixture_service() -> ApprovalService { service_with(Arc::new(fixture_store()), |_| {}) }
