//! The digest value type
//!
//! A [`Digest`] is a fixed-length, immutable byte sequence produced by a
//! hash provider. The length is not fixed at the type level because the
//! provider is pluggable; tree construction and verification enforce the
//! tree-wide digest-length invariant at their boundaries.

use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An immutable hash digest
///
/// Equality is byte-exact. Digests are never mutated after creation; all
/// combining operations produce new digests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Create a digest from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Digest(bytes)
    }

    /// Parse from a hex-encoded string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes =
            hex::decode(s).map_err(|e| Error::InvalidEncoding(format!("invalid hex: {}", e)))?;
        Ok(Digest(bytes))
    }

    /// Parse from a base64-encoded string (standard alphabet)
    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(|e| Error::InvalidEncoding(format!("invalid base64: {}", e)))?;
        Ok(Digest(bytes))
    }

    /// Encode as a hex string (lowercase)
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Encode as a base64 string
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.0)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Digest length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the digest is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Digest(bytes)
    }
}

impl From<&[u8]> for Digest {
    fn from(bytes: &[u8]) -> Self {
        Digest(bytes.to_vec())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

// Digests serialize as base64 strings so proofs stay lossless and
// order-preserving across wire formats.
impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Digest::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let hash_hex = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        let digest = Digest::from_hex(hash_hex).unwrap();
        assert_eq!(digest.to_hex(), hash_hex);
        assert_eq!(digest.len(), 32);
    }

    #[test]
    fn test_base64_roundtrip() {
        let digest = Digest::from_bytes(vec![0xab; 48]);
        let encoded = digest.to_base64();
        let decoded = Digest::from_base64(&encoded).unwrap();
        assert_eq!(digest, decoded);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(Digest::from_hex("not hex").is_err());
    }

    #[test]
    fn test_equality_is_byte_exact() {
        let a = Digest::from_bytes(vec![1, 2, 3]);
        let b = Digest::from_bytes(vec![1, 2, 3]);
        let c = Digest::from_bytes(vec![1, 2, 4]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
