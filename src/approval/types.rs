// ./src/approval/types.rs
//! Wire types of the approval endpoints.

use serde::{Deserialize, Serialize};

use crate::crypto::identity::COMPRESSED_KEY_LENGTH;
use crate::crypto::signature::SIGNATURE_LENGTH;
use crate::error::{ApprovalError, Result};
use crate::types::{decode_hex, hex_bytes32_vec, Bytes32, EvmAddress};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaimApprovalRequest {
    pub token_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_index: Option<u32>,
    pub owner_pub_key: String,
    pub owner_signature: String,
    pub claim_address: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterTokenApprovalRequest {
    pub token_symbol: String,
    pub owner_pub_key: String,
    pub owner_signature: String,
    pub register_address: String,
}

/// Decoded and length-checked request fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub token_symbol: String,
    pub token_index: Option<u32>,
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub destination: EvmAddress,
}

impl ClaimApprovalRequest {
    pub fn validate(&self) -> Result<ValidatedRequest> {
        let mut validated = validate_fields(
            &self.token_symbol,
            &self.owner_pub_key,
            &self.owner_signature,
            &self.claim_address,
        )?;
        validated.token_index = self.token_index;
        Ok(validated)
    }
}

impl RegisterTokenApprovalRequest {
    pub fn validate(&self) -> Result<ValidatedRequest> {
        validate_fields(
            &self.token_symbol,
            &self.owner_pub_key,
            &self.owner_signature,
            &self.register_address,
        )
    }
}

fn validate_fields(
    token_symbol: &str,
    public_key: &str,
    signature: &str,
    destination: &str,
) -> Result<ValidatedRequest> {
    if token_symbol.is_empty() {
        return Err(ApprovalError::BadRequest("token_symbol is empty".to_string()));
    }
    let public_key = decode_field("owner_pub_key", public_key)?;
    if public_key.len() != COMPRESSED_KEY_LENGTH {
        return Err(ApprovalError::BadRequest(format!(
            "owner_pub_key must be {COMPRESSED_KEY_LENGTH} bytes, got {}",
            public_key.len()
        )));
    }
    let signature = decode_field("owner_signature", signature)?;
    if signature.len() != SIGNATURE_LENGTH {
        return Err(ApprovalError::BadRequest(format!(
            "owner_signature must be {SIGNATURE_LENGTH} bytes, got {}",
            signature.len()
        )));
    }
    let destination = destination
        .parse::<EvmAddress>()
        .map_err(|e| ApprovalError::BadRequest(format!("invalid destination address: {e}")))?;
    if destination.is_zero() {
        return Err(ApprovalError::BadRequest("destination address is zero".to_string()));
    }
    Ok(ValidatedRequest {
        token_symbol: token_symbol.to_string(),
        token_index: None,
        public_key,
        signature,
        destination,
    })
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    decode_hex(value).map_err(|e| ApprovalError::BadRequest(format!("invalid {name}: {e}")))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClaimApprovalResponse {
    pub amount: i64,
    #[serde(with = "hex_bytes32_vec")]
    pub proofs: Vec<Bytes32>,
    #[serde(with = "hex_bytes")]
    pub approval_signature: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hex_bytes_opt")]
    pub prefix_node: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hex_bytes_opt")]
    pub suffix_node: Option<Vec<u8>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterTokenApprovalResponse {
    pub amount: i64,
    #[serde(with = "hex_bytes")]
    pub approval_signature: Vec<u8>,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::{decode_hex, encode_hex};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_hex(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_hex(&s).map_err(serde::de::Error::custom)
    }
}

mod hex_bytes_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::{decode_hex, encode_hex};

    pub fn serialize<S: Serializer>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&encode_hex(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| decode_hex(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
