// ./src/merkle.rs
//! # Snapshot Merkle Tree
//!
//! Binary Keccak256 tree over snapshot leaf hashes. Each parent is
//! `keccak256(min(a, b) ‖ max(a, b))`, so a proof is just the list of sibling
//! hashes and needs no left/right flags. A level with an odd number of nodes
//! pairs its last node with itself.
//!
//! The approval engine never builds trees; it forwards the proofs held by the
//! ledger store. These functions check stored proofs against the state root.

use crate::crypto::keccak256;
use crate::types::Bytes32;

/// Hashes two sibling nodes in ascending byte order.
pub fn hash_pair(a: Bytes32, b: Bytes32) -> Bytes32 {
    let mut buf = [0u8; 64];
    if a <= b {
        buf[..32].copy_from_slice(&a);
        buf[32..].copy_from_slice(&b);
    } else {
        buf[..32].copy_from_slice(&b);
        buf[32..].copy_from_slice(&a);
    }
    keccak256(&buf)
}

/// Folds `proof` onto `leaf` and returns the resulting root.
pub fn compute_root(leaf: Bytes32, proof: &[Bytes32]) -> Bytes32 {
    proof.iter().fold(leaf, |node, sibling| hash_pair(node, *sibling))
}

pub fn verify_proof(leaf: Bytes32, proof: &[Bytes32], root: &Bytes32) -> bool {
    compute_root(leaf, proof) == *root
}
