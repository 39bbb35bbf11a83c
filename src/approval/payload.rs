// ./src/approval/payload.rs
//! Ownership sign documents and approval signing payloads.

use serde::{Deserialize, Serialize};

use crate::crypto::{eth_signed_message_hash, keccak256};
use crate::leaf::{encode_amount, pad_denom, LeafError};
use crate::types::{Bytes32, EvmAddress, StateRoot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Claim,
    RegisterToken,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Claim => "claim",
            RequestType::RegisterToken => "register_token",
        }
    }
}

/// Message a claimant signs to prove ownership of an account.
///
/// Serializes as compact JSON with keys in lexicographic order, which is the
/// field order below.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SignDoc<'a> {
    amount: String,
    chain_id: &'a str,
    recipient: String,
    token_symbol: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl<'a> SignDoc<'a> {
    pub fn new(
        kind: RequestType,
        amount: i64,
        chain_id: &'a str,
        recipient: &EvmAddress,
        token_symbol: &'a str,
    ) -> Self {
        Self {
            amount: amount.to_string(),
            chain_id,
            recipient: recipient.to_string(),
            token_symbol,
            kind: kind.as_str(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> { serde_json::to_vec(self) }
}

/// Byte layout of the approval payload, one per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    /// `chain ‖ destination ‖ signature ‖ leaf ‖ state root ‖ proof…`
    #[default]
    Standard,
    /// `chain ‖ pad32(denom) ‖ destination ‖ signature ‖ leaf`
    Legacy,
    /// Standard payload hash behind the `personal_sign` prefix
    EthSignedMessage,
}

impl PayloadFormat {
    /// Digest handed to the signing authority for an encoded payload.
    pub fn digest(&self, payload: &[u8]) -> Bytes32 {
        let hash = keccak256(payload);
        match self {
            PayloadFormat::EthSignedMessage => eth_signed_message_hash(&hash),
            PayloadFormat::Standard | PayloadFormat::Legacy => hash,
        }
    }
}

/// Inputs bound by a claim approval.
#[derive(Debug, Clone, Copy)]
pub struct ClaimPayload<'a> {
    pub chain_id: &'a str,
    pub denom: &'a str,
    pub destination: &'a EvmAddress,
    pub owner_signature: &'a [u8],
    pub leaf: &'a [u8],
    pub state_root: &'a StateRoot,
    pub proof: &'a [Bytes32],
}

impl ClaimPayload<'_> {
    pub fn encode(&self, format: PayloadFormat) -> Result<Vec<u8>, LeafError> {
        let mut out = Vec::with_capacity(
            self.chain_id.len()
                + 32
                + 20
                + self.owner_signature.len()
                + self.leaf.len()
                + 32 * (1 + self.proof.len()),
        );
        out.extend_from_slice(self.chain_id.as_bytes());
        match format {
            PayloadFormat::Legacy => {
                out.extend_from_slice(&pad_denom(self.denom)?);
                out.extend_from_slice(self.destination.as_bytes());
                out.extend_from_slice(self.owner_signature);
                out.extend_from_slice(self.leaf);
            }
            PayloadFormat::Standard | PayloadFormat::EthSignedMessage => {
                out.extend_from_slice(self.destination.as_bytes());
                out.extend_from_slice(self.owner_signature);
                out.extend_from_slice(self.leaf);
                out.extend_from_slice(self.state_root.as_bytes());
                for node in self.proof {
                    out.extend_from_slice(node);
                }
            }
        }
        Ok(out)
    }

    pub fn digest(&self, format: PayloadFormat) -> Result<Bytes32, LeafError> {
        Ok(format.digest(&self.encode(format)?))
    }
}

/// Inputs bound by a register-token approval.
#[derive(Debug, Clone, Copy)]
pub struct RegisterPayload<'a> {
    pub chain_id: &'a str,
    pub denom: &'a str,
    pub amount: i64,
    pub destination: &'a EvmAddress,
    pub owner_signature: &'a [u8],
    pub state_root: &'a StateRoot,
}

impl RegisterPayload<'_> {
    /// `chain ‖ destination ‖ signature ‖ pad32(denom) ‖ be256(amount) ‖ state root`,
    /// whatever the payload format.
    pub fn encode(&self) -> Result<Vec<u8>, LeafError> {
        let mut out = Vec::with_capacity(self.chain_id.len() + 20 + self.owner_signature.len() + 96);
        out.extend_from_slice(self.chain_id.as_bytes());
        out.extend_from_slice(self.destination.as_bytes());
        out.extend_from_slice(self.owner_signature);
        out.extend_from_slice(&pad_denom(self.denom)?);
        out.extend_from_slice(&encode_amount(self.denom, self.amount)?);
        out.extend_from_slice(self.state_root.as_bytes());
        Ok(out)
    }

    pub fn digest(&self, format: PayloadFormat) -> Result<Bytes32, LeafError> {
        Ok(format.digest(&self.encode()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination() -> EvmAddress { "0x5B38Da6a701c568545dCfcB03FcB875f56beddC4".parse().unwrap() }

    #[test]
    fn test_sign_doc_is_canonical() {
        let doc = SignDoc::new(RequestType::Claim, 1_000_000_000, "Binance-Chain-Ganges", &destination(), "BNB");
        assert_eq!(
            String::from_utf8(doc.to_bytes().unwrap()).unwrap(),
            r#"{"amount":"1000000000","chain_id":"Binance-Chain-Ganges","recipient":"0x5b38da6a701c568545dcfcb03fcb875f56beddc4","token_symbol":"BNB","type":"claim"}"#
        );
        let doc = SignDoc::new(
            RequestType::RegisterToken,
            250_000_000_000,
            "Binance-Chain-Ganges",
            &destination(),
            "BUSD-BD1",
        );
        assert!(String::from_utf8(doc.to_bytes().unwrap()).unwrap().ends_with(r#""type":"register_token"}"#));
    }

    #[test]
    fn test_sign_doc_escapes_symbol_text() -> Result<(), serde_json::Error> {
        let doc = SignDoc::new(RequestType::Claim, 1, "chain", &destination(), "A\"B");
        let text = String::from_utf8_lossy(&doc.to_bytes()?).into_owned();
        assert!(text.contains(r#""token_symbol":"A\"B""#));
        Ok(())
    }

    #[test]
    fn test_standard_layout() {
        let root = StateRoot([0x22; 32]);
        let proof = [[0x33; 32], [0x44; 32]];
        let payload = ClaimPayload {
            chain_id: "chain",
            denom: "BNB",
            destination: &destination(),
            owner_signature: &[0x55; 64],
            leaf: &[0x66; 84],
            state_root: &root,
            proof: &proof,
        };
        let bytes = payload.encode(PayloadFormat::Standard).unwrap();
        assert_eq!(bytes.len(), 5 + 20 + 64 + 84 + 32 + 64);
        assert_eq!(&bytes[..5], b"chain");
        assert_eq!(&bytes[5..25], destination().as_bytes());
        assert_eq!(&bytes[173..205], &[0x22; 32]);
        assert_eq!(&bytes[bytes.len() - 32..], &[0x44; 32]);

        // the wrapped format signs over the same bytes
        assert_eq!(payload.encode(PayloadFormat::EthSignedMessage).unwrap(), bytes);
        assert_eq!(
            payload.digest(PayloadFormat::EthSignedMessage).unwrap(),
            eth_signed_message_hash(&keccak256(&bytes))
        );
    }

    #[test]
    fn test_legacy_layout() {
        let root = StateRoot([0x22; 32]);
        let payload = ClaimPayload {
            chain_id: "chain",
            denom: "BNB",
            destination: &destination(),
            owner_signature: &[0x55; 64],
            leaf: &[0x66; 84],
            state_root: &root,
            proof: &[[0x33; 32]],
        };
        let bytes = payload.encode(PayloadFormat::Legacy).unwrap();
        assert_eq!(bytes.len(), 5 + 32 + 20 + 64 + 84);
        assert_eq!(&bytes[5..8], b"BNB");
        assert_eq!(&bytes[8..37], &[0u8; 29]);
    }

    #[test]
    fn test_register_layout() {
        let root = StateRoot([0x22; 32]);
        let payload = RegisterPayload {
            chain_id: "chain",
            denom: "BUSD-BD1",
            amount: 1,
            destination: &destination(),
            owner_signature: &[0x55; 64],
            state_root: &root,
        };
        let bytes = payload.encode().unwrap();
        assert_eq!(bytes.len(), 5 + 20 + 64 + 96);
        assert_eq!(bytes[5 + 20 + 64 + 63], 1);
    }
}
