//! Hash provider trait and default algorithms
//!
//! The tree core never computes a cryptographic hash itself; it delegates
//! to a [`HashProvider`] passed in at the call site. [`HashAlgorithm`]
//! supplies `sha2`-backed providers for the common SHA-2 family.

use crate::digest::Digest;
use serde::{Deserialize, Serialize};
use sha2::Digest as _;

/// A pluggable cryptographic hash function
///
/// Implementations must be deterministic, collision-resistant, and
/// thread-safe. The output length must be constant for a given provider;
/// it becomes a tree-wide invariant for every tree built with it.
pub trait HashProvider: Send + Sync {
    /// Hash a byte sequence
    fn digest(&self, data: &[u8]) -> Digest;

    /// Output size in bytes
    fn digest_size(&self) -> usize;
}

/// Supported built-in hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA2-256
    #[serde(rename = "SHA2_256")]
    Sha2256,
    /// SHA2-384
    #[serde(rename = "SHA2_384")]
    Sha2384,
    /// SHA2-512
    #[serde(rename = "SHA2_512")]
    Sha2512,
}

impl HashAlgorithm {
    /// Get the digest size in bytes for this algorithm
    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha2256 => 32,
            HashAlgorithm::Sha2384 => 48,
            HashAlgorithm::Sha2512 => 64,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha2256 => write!(f, "SHA2_256"),
            HashAlgorithm::Sha2384 => write!(f, "SHA2_384"),
            HashAlgorithm::Sha2512 => write!(f, "SHA2_512"),
        }
    }
}

impl HashProvider for HashAlgorithm {
    fn digest(&self, data: &[u8]) -> Digest {
        match self {
            HashAlgorithm::Sha2256 => Digest::from_bytes(sha2::Sha256::digest(data).to_vec()),
            HashAlgorithm::Sha2384 => Digest::from_bytes(sha2::Sha384::digest(data).to_vec()),
            HashAlgorithm::Sha2512 => Digest::from_bytes(sha2::Sha512::digest(data).to_vec()),
        }
    }

    fn digest_size(&self) -> usize {
        HashAlgorithm::digest_size(self)
    }
}
