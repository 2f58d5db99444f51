//! Merkle tree construction
//!
//! Implements domain-separated tree hashing with:
//! - prefix `0x00` for leaf digests, `0x01` for internal nodes
//! - bottom-up level construction where an unpaired last digest is
//!   promoted unchanged to the next level
//!
//! The promotion rule fixes the tree shape as a pure function of the leaf
//! count and closes the duplicate-last-leaf equivocation attack: padding an
//! odd level by repeating its last digest would let two different leaf
//! sequences share a root.

use crate::error::{Error, Result};
use mktree_types::{Digest, HashProvider};

/// Prefix byte for leaf digests
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// Prefix byte for internal node digests
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Hash a data block into its leaf digest
///
/// Returns: `H(0x00 || data)`
pub fn hash_leaf<H: HashProvider + ?Sized>(hasher: &H, data: &[u8]) -> Digest {
    let mut buf = Vec::with_capacity(1 + data.len());
    buf.push(LEAF_HASH_PREFIX);
    buf.extend_from_slice(data);
    hasher.digest(&buf)
}

/// Combine two child digests into their parent digest
///
/// Returns: `H(0x01 || left || right)`
pub fn hash_children<H: HashProvider + ?Sized>(
    hasher: &H,
    left: &Digest,
    right: &Digest,
) -> Digest {
    let mut buf = Vec::with_capacity(1 + left.len() + right.len());
    buf.push(NODE_HASH_PREFIX);
    buf.extend_from_slice(left.as_bytes());
    buf.extend_from_slice(right.as_bytes());
    hasher.digest(&buf)
}

/// Position of the most significant set bit
pub(crate) fn bit_length(n: u64) -> u32 {
    if n == 0 {
        0
    } else {
        64 - n.leading_zeros()
    }
}

/// A fully built Merkle tree over an ordered leaf sequence
///
/// The structure is stored as an array of levels: level 0 holds the leaf
/// digests in input order, each higher level the pairwise combinations,
/// and the last level the single root digest. Trees are immutable once
/// built; when the leaf sequence changes the caller rebuilds.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
    digest_size: usize,
}

impl MerkleTree {
    /// Build a tree over raw data blocks
    ///
    /// Each block is hashed with [`hash_leaf`] and the tree is built over
    /// the resulting digests in input order.
    ///
    /// # Errors
    /// Returns [`Error::EmptyTree`] if `blocks` is empty.
    pub fn build<H, B>(hasher: &H, blocks: &[B]) -> Result<Self>
    where
        H: HashProvider + ?Sized,
        B: AsRef<[u8]>,
    {
        let leaf_hashes = blocks
            .iter()
            .map(|block| hash_leaf(hasher, block.as_ref()))
            .collect();
        Self::from_leaf_hashes(hasher, leaf_hashes)
    }

    /// Build a tree over pre-computed leaf digests
    ///
    /// # Errors
    /// Returns [`Error::EmptyTree`] if `leaf_hashes` is empty, or
    /// [`Error::DigestLength`] if any digest's length disagrees with the
    /// provider's output size.
    pub fn from_leaf_hashes<H: HashProvider + ?Sized>(
        hasher: &H,
        leaf_hashes: Vec<Digest>,
    ) -> Result<Self> {
        if leaf_hashes.is_empty() {
            return Err(Error::EmptyTree);
        }

        let digest_size = hasher.digest_size();
        for leaf in &leaf_hashes {
            if leaf.len() != digest_size {
                return Err(Error::DigestLength {
                    expected: digest_size,
                    actual: leaf.len(),
                });
            }
        }

        let mut levels = Vec::new();
        let mut current = leaf_hashes;
        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            let mut pairs = current.chunks_exact(2);
            for pair in &mut pairs {
                next.push(hash_children(hasher, &pair[0], &pair[1]));
            }
            // An unpaired last digest is promoted unchanged, never
            // combined with a copy of itself.
            if let [unpaired] = pairs.remainder() {
                next.push(unpaired.clone());
            }
            levels.push(std::mem::replace(&mut current, next));
        }
        levels.push(current);

        tracing::debug!(
            "Built Merkle tree with {} leaves ({} levels)",
            levels[0].len(),
            levels.len()
        );

        Ok(MerkleTree {
            levels,
            digest_size,
        })
    }

    /// The root digest
    ///
    /// For a single-leaf tree this is the leaf digest itself.
    pub fn root(&self) -> &Digest {
        &self.levels[self.levels.len() - 1][0]
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> u64 {
        self.levels[0].len() as u64
    }

    /// Number of levels, including the leaf level and the root level
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    /// Digest length in bytes for every node in this tree
    pub fn digest_size(&self) -> usize {
        self.digest_size
    }

    /// The leaf digest at `index`, if it exists
    pub fn leaf_hash(&self, index: u64) -> Option<&Digest> {
        self.levels[0].get(index as usize)
    }

    /// The digest at position `index` of level `level` (level 0 = leaves)
    pub fn node(&self, level: usize, index: usize) -> Option<&Digest> {
        self.levels.get(level)?.get(index)
    }

    pub(crate) fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }
}
