//! Error types for mktree
//!
//! Verification failures (tampering detected) are always distinguishable
//! from caller misuse (bad indexes, nonsensical sizes, structurally
//! invalid proofs). No operation ever reports failure as a bare boolean.

use thiserror::Error;

/// Errors that can occur in Merkle tree operations
#[derive(Error, Debug)]
pub enum Error {
    /// A tree was requested over an empty leaf sequence
    #[error("cannot build a tree with no leaves")]
    EmptyTree,

    /// A proof was requested for a nonexistent leaf
    #[error("leaf index {index} out of range for tree with {leaf_count} leaves")]
    IndexOutOfRange {
        /// The requested leaf index
        index: u64,
        /// The number of leaves in the tree
        leaf_count: u64,
    },

    /// Nonsensical prior/total leaf counts for a consistency proof
    #[error("invalid tree size: {0}")]
    InvalidSize(String),

    /// Proof structure inconsistent with the claimed leaf index and count
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The recomputed digest disagrees with the expected root
    #[error("root mismatch: expected {expected}, computed {computed}")]
    RootMismatch {
        /// The trusted root, hex-encoded
        expected: String,
        /// The root recomputed from the proof, hex-encoded
        computed: String,
    },

    /// A digest's length disagrees with the hash provider's output size
    #[error("digest length mismatch: provider produces {expected} bytes, got {actual}")]
    DigestLength {
        /// The provider's output size
        expected: usize,
        /// The offending digest's length
        actual: usize,
    },
}

/// Result type for Merkle tree operations
pub type Result<T> = std::result::Result<T, Error>;
