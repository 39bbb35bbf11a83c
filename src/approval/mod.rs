// ./src/approval/mod.rs
//! Claim approval engine.
//!
//! Verifies that a requester controls a snapshot account, re-derives the
//! account's committed leaf and counter-signs a payload binding the chain,
//! the destination address, the ownership signature, the leaf and its
//! Merkle proof. The engine holds no mutable state; one instance serves all
//! requests concurrently.

pub mod payload;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use payload::{ClaimPayload, PayloadFormat, RegisterPayload, RequestType, SignDoc};
pub use types::{
    ClaimApprovalRequest, ClaimApprovalResponse, RegisterTokenApprovalRequest,
    RegisterTokenApprovalResponse, ValidatedRequest,
};

use crate::crypto::{IdentityScheme, SchemeKind};
use crate::error::{ApprovalError, Result};
use crate::leaf::{pad_denom, LeafEncoder, LeafError};
use crate::merkle;
use crate::network::NetworkConfig;
use crate::signer::SigningAuthority;
use crate::store::LedgerStore;
use crate::types::{encode_hex, AccountId};
use crate::whitelist::Whitelist;

/// Deployment parameters of the engine.
#[derive(Debug, Clone)]
pub struct ApprovalSettings {
    pub network: NetworkConfig,
    pub scheme: SchemeKind,
    pub encoder: LeafEncoder,
    pub payload_format: PayloadFormat,
    pub whitelist: Whitelist,
}

impl ApprovalSettings {
    /// Cosmos identities, per-denom symbol leaves and standard payloads.
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            scheme: SchemeKind::default(),
            encoder: LeafEncoder::default(),
            payload_format: PayloadFormat::default(),
            whitelist: Whitelist::default(),
        }
    }
}

pub struct ApprovalService {
    network: NetworkConfig,
    scheme: Arc<dyn IdentityScheme>,
    encoder: LeafEncoder,
    payload_format: PayloadFormat,
    whitelist: Whitelist,
    store: Arc<dyn LedgerStore>,
    signer: Arc<dyn SigningAuthority>,
}

impl ApprovalService {
    pub fn new(
        settings: ApprovalSettings,
        store: Arc<dyn LedgerStore>,
        signer: Arc<dyn SigningAuthority>,
    ) -> Self {
        Self {
            scheme: settings.scheme.build(),
            network: settings.network,
            encoder: settings.encoder,
            payload_format: settings.payload_format,
            whitelist: settings.whitelist,
            store,
            signer,
        }
    }

    pub fn network(&self) -> &NetworkConfig { &self.network }

    /// Produces the approval for claiming the requester's balance of one token.
    pub fn get_claim_approval(&self, req: &ClaimApprovalRequest) -> Result<ClaimApprovalResponse> {
        let request = req.validate()?;
        let denom = request.token_symbol.as_str();
        let (account_id, public_key) = self.scheme.recover_identity(&request.public_key)?;
        let account_text = self.network.format_account(&account_id);
        debug!(account = %account_text, denom, "claim approval requested");

        self.check_whitelist(&account_id, &account_text)?;

        let account = self.store.get_account_by_address(&account_id)?;
        // a denom missing from the balance list has no committed leaf
        let position = account.position_of(denom).ok_or(ApprovalError::ProofNotFound)?;
        let proof = self.store.get_account_asset_proof(&account_id, denom, position as u32)?;
        let state_root = self.store.get_state_root()?;

        let index =
            self.encoder.select(&account, denom, request.token_index).map_err(leaf_error)?;
        let amount = account.balances[index].amount;

        let doc = SignDoc::new(
            RequestType::Claim,
            amount,
            self.network.chain_id(),
            &request.destination,
            denom,
        );
        let message = doc.to_bytes().map_err(|e| ApprovalError::BadRequest(e.to_string()))?;
        self.scheme.verify_signature(&public_key, &request.signature, &message)?;

        let leaf = self.encoder.encode_at(&account, index).map_err(leaf_error)?;
        if !merkle::verify_proof(leaf.hash(), &proof.siblings, state_root.as_bytes()) {
            warn!(
                account = %account_text,
                denom,
                leaf = %encode_hex(leaf.hash()),
                "stored proof does not reach the state root"
            );
        }

        let digest = ClaimPayload {
            chain_id: self.network.chain_id(),
            denom,
            destination: &request.destination,
            owner_signature: &request.signature,
            leaf: &leaf.bytes,
            state_root: &state_root,
            proof: &proof.siblings,
        }
        .digest(self.payload_format)
        .map_err(leaf_error)?;
        debug!(account = %account_text, denom, digest = %encode_hex(digest), "signing claim payload");

        let signature = self.signer.sign(&digest)?;
        info!(account = %account_text, denom, amount, "claim approved");

        let (prefix_node, suffix_node) = match leaf.split {
            Some((prefix, suffix)) => (Some(prefix), Some(suffix)),
            None => (None, None),
        };
        Ok(ClaimApprovalResponse {
            amount,
            proofs: proof.siblings,
            approval_signature: signature.to_vec(),
            prefix_node,
            suffix_node,
        })
    }

    /// Produces the approval for registering a snapshot token on the EVM side.
    pub fn get_register_token_approval(
        &self,
        req: &RegisterTokenApprovalRequest,
    ) -> Result<RegisterTokenApprovalResponse> {
        let request = req.validate()?;
        let denom = request.token_symbol.as_str();
        let (account_id, public_key) = self.scheme.recover_identity(&request.public_key)?;
        let account_text = self.network.format_account(&account_id);
        debug!(account = %account_text, denom, "register token approval requested");

        self.check_whitelist(&account_id, &account_text)?;

        let asset = self.store.get_asset_by_symbol(denom)?;
        if asset.owner != account_id {
            info!(account = %account_text, denom, "requester does not own asset");
            return Err(ApprovalError::NotAssetOwner(denom.to_string()));
        }
        if asset.amount == 0 {
            return Err(ApprovalError::ZeroBalance(denom.to_string()));
        }
        pad_denom(denom).map_err(leaf_error)?;

        let doc = SignDoc::new(
            RequestType::RegisterToken,
            asset.amount,
            self.network.chain_id(),
            &request.destination,
            denom,
        );
        let message = doc.to_bytes().map_err(|e| ApprovalError::BadRequest(e.to_string()))?;
        self.scheme.verify_signature(&public_key, &request.signature, &message)?;

        let state_root = self.store.get_state_root()?;
        let digest = RegisterPayload {
            chain_id: self.network.chain_id(),
            denom,
            amount: asset.amount,
            destination: &request.destination,
            owner_signature: &request.signature,
            state_root: &state_root,
        }
        .digest(self.payload_format)
        .map_err(leaf_error)?;
        debug!(account = %account_text, denom, digest = %encode_hex(digest), "signing register payload");

        let signature = self.signer.sign(&digest)?;
        info!(account = %account_text, denom, amount = asset.amount, "token registration approved");

        Ok(RegisterTokenApprovalResponse {
            amount: asset.amount,
            approval_signature: signature.to_vec(),
        })
    }

    fn check_whitelist(&self, account: &AccountId, account_text: &str) -> Result<()> {
        if self.whitelist.allows(account) {
            return Ok(());
        }
        info!(account = %account_text, "account is not whitelisted");
        Err(ApprovalError::NotWhitelisted(account_text.to_string()))
    }
}

fn leaf_error(err: LeafError) -> ApprovalError {
    match err {
        LeafError::ZeroBalance(denom) => ApprovalError::ZeroBalance(denom),
        other => ApprovalError::BadRequest(other.to_string()),
    }
}
