//! Merkle hash tree construction and proof verification
//!
//! This crate builds domain-separated Merkle trees over ordered data
//! blocks and produces logarithmic-size inclusion and consistency proofs
//! for them. Hashing is delegated to a pluggable
//! [`HashProvider`](mktree_types::HashProvider); the crate only defines
//! how digests are combined:
//!
//! - leaf digests are `H(0x00 || data)`, internal nodes
//!   `H(0x01 || left || right)` (second-preimage defense),
//! - an unpaired digest at an odd-length level is promoted unchanged,
//!   never duplicated (equivocation defense).
//!
//! Trees are immutable once built; verification works from a proof and a
//! trusted root alone and reports failures as typed errors, never as a
//! bare boolean.

pub mod error;
pub mod proof;
pub mod tree;
pub mod verify;

pub use mktree_types as types;

pub use error::{Error, Result};
pub use proof::{ConsistencyProof, InclusionProof, ProofEntry, Side};
pub use tree::{hash_children, hash_leaf, MerkleTree, LEAF_HASH_PREFIX, NODE_HASH_PREFIX};
pub use verify::{verify_consistency, verify_inclusion};
