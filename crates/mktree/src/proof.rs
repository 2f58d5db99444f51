//! Proof types and generation
//!
//! Inclusion proofs carry the ordered sibling path from a leaf to the
//! root, each entry annotated with the side the sibling is consumed on.
//! Consistency proofs carry the ordered node digests needed to link a
//! prior tree state to a later one; the verifier derives the combining
//! sides from the two tree sizes.

use crate::error::{Error, Result};
use crate::tree::MerkleTree;
use mktree_types::Digest;
use serde::{Deserialize, Serialize};

/// Which side of the current digest a proof sibling is consumed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The sibling is the left input: `H(0x01 || sibling || current)`
    Left,
    /// The sibling is the right input: `H(0x01 || current || sibling)`
    Right,
}

/// One step of an inclusion proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEntry {
    /// The sibling digest consumed at this level
    pub sibling: Digest,
    /// The side the sibling is combined on
    pub side: Side,
}

/// An inclusion proof for a single leaf
///
/// Entries are ordered from the leaf level upward. Levels where the
/// current node is promoted unpaired contribute no entry, so the length
/// is at most `ceil(log2(leaf_count))`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Sibling digests with their sides, leaf to root
    pub entries: Vec<ProofEntry>,
}

impl InclusionProof {
    /// Number of proof entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the proof carries no entries (single-leaf tree)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A consistency proof between two tree states
///
/// Proves that the tree of `old_size` leaves is a genuine left-prefix of
/// the tree of `new_size` leaves. Empty when the sizes are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyProof {
    /// Node digests ordered per the subproof decomposition
    pub hashes: Vec<Digest>,
}

impl ConsistencyProof {
    /// Number of proof hashes
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Whether the proof carries no hashes (equal-size trees)
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl MerkleTree {
    /// Generate an inclusion proof for the leaf at `leaf_index`
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfRange`] if `leaf_index >= leaf_count`.
    pub fn inclusion_proof(&self, leaf_index: u64) -> Result<InclusionProof> {
        if leaf_index >= self.leaf_count() {
            return Err(Error::IndexOutOfRange {
                index: leaf_index,
                leaf_count: self.leaf_count(),
            });
        }

        let levels = self.levels();
        let mut entries = Vec::new();
        let mut pos = leaf_index as usize;
        for level in &levels[..levels.len() - 1] {
            let sibling = pos ^ 1;
            // The last node of an odd-length level has no sibling; it is
            // promoted and this level contributes no entry.
            if sibling < level.len() {
                let side = if pos % 2 == 1 { Side::Left } else { Side::Right };
                entries.push(ProofEntry {
                    sibling: level[sibling].clone(),
                    side,
                });
            }
            pos /= 2;
        }

        Ok(InclusionProof { entries })
    }

    /// Generate a consistency proof linking a prior tree state to this one
    ///
    /// The prior state is the tree over the first `prior_leaf_count`
    /// leaves of this tree's leaf sequence.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSize`] if `prior_leaf_count` is 0 or
    /// exceeds this tree's leaf count.
    pub fn consistency_proof(&self, prior_leaf_count: u64) -> Result<ConsistencyProof> {
        let leaf_count = self.leaf_count();
        if prior_leaf_count == 0 || prior_leaf_count > leaf_count {
            return Err(Error::InvalidSize(format!(
                "prior leaf count {} not in 1..={}",
                prior_leaf_count, leaf_count
            )));
        }
        if prior_leaf_count == leaf_count {
            return Ok(ConsistencyProof { hashes: Vec::new() });
        }

        // The proof is anchored at the node covering the last prior leaf
        // at level `shift`, the largest level at which the prior tree's
        // rightmost path is a complete subtree of this tree.
        let shift = prior_leaf_count.trailing_zeros() as usize;
        let levels = self.levels();
        let mut level = shift;
        let mut pos = ((prior_leaf_count - 1) >> shift) as usize;

        let mut hashes = Vec::new();
        // When the prior count is an exact power of two, the anchor node
        // is the prior root itself and the verifier already holds it.
        if prior_leaf_count != 1 << shift {
            hashes.push(levels[level][pos].clone());
        }
        while level + 1 < levels.len() {
            let sibling = pos ^ 1;
            if sibling < levels[level].len() {
                hashes.push(levels[level][sibling].clone());
            }
            pos /= 2;
            level += 1;
        }

        Ok(ConsistencyProof { hashes })
    }
}
