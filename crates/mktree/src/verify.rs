//! Proof verification
//!
//! Verification never touches a full tree, only the proof path, so its
//! cost is logarithmic in the leaf count. The verifier derives the
//! expected proof structure from the claimed index and sizes alone and
//! never trusts the proof's own length or side annotations.

use crate::error::{Error, Result};
use crate::proof::{ConsistencyProof, InclusionProof, Side};
use crate::tree::{bit_length, hash_children, hash_leaf};
use mktree_types::{Digest, HashProvider};

/// Verify an inclusion proof for a data block
///
/// Recomputes the leaf digest from `leaf_data`, folds the proof entries
/// leaf-to-root, and compares the result against `expected_root`.
///
/// # Errors
/// * [`Error::InvalidSize`] if `leaf_count` is zero
/// * [`Error::IndexOutOfRange`] if `leaf_index >= leaf_count`
/// * [`Error::MalformedProof`] if the proof's length or any entry's side
///   disagrees with the structure derived from the index and count
/// * [`Error::RootMismatch`] if the recomputed root differs
pub fn verify_inclusion<H: HashProvider + ?Sized>(
    hasher: &H,
    leaf_data: &[u8],
    leaf_index: u64,
    leaf_count: u64,
    proof: &InclusionProof,
    expected_root: &Digest,
) -> Result<()> {
    if leaf_count == 0 {
        return Err(Error::InvalidSize("leaf count cannot be zero".to_string()));
    }
    if leaf_index >= leaf_count {
        return Err(Error::IndexOutOfRange {
            index: leaf_index,
            leaf_count,
        });
    }

    let digest_size = hasher.digest_size();
    if expected_root.len() != digest_size {
        return Err(Error::DigestLength {
            expected: digest_size,
            actual: expected_root.len(),
        });
    }

    let expected_len = expected_inclusion_proof_len(leaf_index, leaf_count);
    if proof.entries.len() != expected_len {
        return Err(Error::MalformedProof(format!(
            "expected {} entries for leaf {} in tree of {} leaves, got {}",
            expected_len,
            leaf_index,
            leaf_count,
            proof.entries.len()
        )));
    }

    let mut current = hash_leaf(hasher, leaf_data);
    let mut index = leaf_index;
    let mut last_node = leaf_count - 1;

    for (depth, entry) in proof.entries.iter().enumerate() {
        if entry.sibling.len() != digest_size {
            return Err(Error::MalformedProof(format!(
                "entry {} carries a {}-byte sibling, provider produces {} bytes",
                depth,
                entry.sibling.len(),
                digest_size
            )));
        }

        // A right child, or the rightmost node of an incomplete subtree,
        // consumes its sibling on the left. Promoted levels consume no
        // entry; repeated halving lands on the level where the node
        // finally pairs.
        let expected_side = if index % 2 == 1 || index == last_node {
            Side::Left
        } else {
            Side::Right
        };
        if entry.side != expected_side {
            return Err(Error::MalformedProof(format!(
                "entry {} declares side {:?}, expected {:?} for index {} of {}",
                depth, entry.side, expected_side, leaf_index, leaf_count
            )));
        }

        current = match entry.side {
            Side::Left => hash_children(hasher, &entry.sibling, &current),
            Side::Right => hash_children(hasher, &current, &entry.sibling),
        };
        index /= 2;
        last_node /= 2;
    }

    if &current != expected_root {
        return Err(Error::RootMismatch {
            expected: expected_root.to_hex(),
            computed: current.to_hex(),
        });
    }

    tracing::debug!(
        "Verified inclusion of leaf {} in tree of {} leaves",
        leaf_index,
        leaf_count
    );
    Ok(())
}

/// Verify a consistency proof between two tree states
///
/// Proves that the `old_size`-leaf tree with root `old_root` is a genuine
/// left-prefix of the `new_size`-leaf tree with root `new_root`. The
/// proof must reduce to both roots through the same node sequence.
///
/// # Errors
/// * [`Error::InvalidSize`] if `old_size` is zero or exceeds `new_size`
/// * [`Error::MalformedProof`] if the proof's length disagrees with the
///   structure derived from the two sizes
/// * [`Error::RootMismatch`] if either recomputed root differs
pub fn verify_consistency<H: HashProvider + ?Sized>(
    hasher: &H,
    old_size: u64,
    new_size: u64,
    proof: &ConsistencyProof,
    old_root: &Digest,
    new_root: &Digest,
) -> Result<()> {
    if old_size == 0 || old_size > new_size {
        return Err(Error::InvalidSize(format!(
            "prior size {} not in 1..={}",
            old_size, new_size
        )));
    }

    let digest_size = hasher.digest_size();
    for root in [old_root, new_root] {
        if root.len() != digest_size {
            return Err(Error::DigestLength {
                expected: digest_size,
                actual: root.len(),
            });
        }
    }
    for (i, hash) in proof.hashes.iter().enumerate() {
        if hash.len() != digest_size {
            return Err(Error::MalformedProof(format!(
                "hash {} is {} bytes, provider produces {} bytes",
                i,
                hash.len(),
                digest_size
            )));
        }
    }

    if old_size == new_size {
        if !proof.hashes.is_empty() {
            return Err(Error::MalformedProof(
                "proof must be empty for equal tree sizes".to_string(),
            ));
        }
        if old_root != new_root {
            return Err(Error::RootMismatch {
                expected: old_root.to_hex(),
                computed: new_root.to_hex(),
            });
        }
        return Ok(());
    }

    // Decompose the path of the last prior leaf in the new tree. The low
    // `shift` levels lie inside a complete subtree of the prior tree and
    // appear in neither root computation.
    let shift = old_size.trailing_zeros() as usize;
    let inner = inner_proof_size(old_size - 1, new_size).saturating_sub(shift);
    let mask = (old_size - 1) >> shift;
    // Each set bit of the promoted position above the inner segment is a
    // left-sibling step on the right border.
    let border = mask.checked_shr(inner as u32).unwrap_or(0).count_ones() as usize;

    // The anchor node covering the last prior leaf opens the proof,
    // except when the prior size is a power of two: then that node is the
    // prior root and the verifier already holds it.
    let (seed, rest) = if old_size == 1 << shift {
        (old_root, &proof.hashes[..])
    } else {
        match proof.hashes.split_first() {
            Some((seed, rest)) => (seed, rest),
            None => {
                return Err(Error::MalformedProof(
                    "proof cannot be empty for different tree sizes".to_string(),
                ))
            }
        }
    };

    if rest.len() != inner + border {
        return Err(Error::MalformedProof(format!(
            "expected {} hashes for sizes {} -> {}, got {}",
            inner + border + (proof.hashes.len() - rest.len()),
            old_size,
            new_size,
            proof.hashes.len()
        )));
    }

    // The prior root only sees siblings on its right edge.
    let computed_old = chain_border_right(
        hasher,
        chain_inner_right(hasher, seed, &rest[..inner], mask),
        &rest[inner..],
    );
    if &computed_old != old_root {
        return Err(Error::RootMismatch {
            expected: old_root.to_hex(),
            computed: computed_old.to_hex(),
        });
    }

    let computed_new = chain_border_right(
        hasher,
        chain_inner(hasher, seed, &rest[..inner], mask),
        &rest[inner..],
    );
    if &computed_new != new_root {
        return Err(Error::RootMismatch {
            expected: new_root.to_hex(),
            computed: computed_new.to_hex(),
        });
    }

    tracing::debug!(
        "Verified consistency of tree sizes {} -> {}",
        old_size,
        new_size
    );
    Ok(())
}

/// Derive the inclusion proof length for a leaf position
///
/// Mirrors the builder's promotion rule: the rightmost node of an
/// odd-length level is promoted and contributes no proof entry.
fn expected_inclusion_proof_len(leaf_index: u64, leaf_count: u64) -> usize {
    let mut count = 0;
    let mut index = leaf_index;
    let mut size = leaf_count;
    while size > 1 {
        if !(size % 2 == 1 && index == size - 1) {
            count += 1;
        }
        index /= 2;
        size = size.div_ceil(2);
    }
    count
}

/// Levels below the point where the paths of `index` and the last leaf
/// of a `size`-leaf tree converge
fn inner_proof_size(index: u64, size: u64) -> usize {
    bit_length(index ^ (size - 1)) as usize
}

/// Fold inner-path siblings on the side given by the mask bits
fn chain_inner<H: HashProvider + ?Sized>(
    hasher: &H,
    seed: &Digest,
    proof: &[Digest],
    mask: u64,
) -> Digest {
    let mut current = seed.clone();
    for (i, sibling) in proof.iter().enumerate() {
        current = if (mask >> i) & 1 == 0 {
            hash_children(hasher, &current, sibling)
        } else {
            hash_children(hasher, sibling, &current)
        };
    }
    current
}

/// Fold only the inner-path siblings that sit left of the prior tree's
/// right edge; the rest lie outside the prior tree
fn chain_inner_right<H: HashProvider + ?Sized>(
    hasher: &H,
    seed: &Digest,
    proof: &[Digest],
    mask: u64,
) -> Digest {
    let mut current = seed.clone();
    for (i, sibling) in proof.iter().enumerate() {
        if (mask >> i) & 1 == 1 {
            current = hash_children(hasher, sibling, &current);
        }
    }
    current
}

/// Fold border siblings, which are always consumed on the left
fn chain_border_right<H: HashProvider + ?Sized>(
    hasher: &H,
    seed: Digest,
    proof: &[Digest],
) -> Digest {
    let mut current = seed;
    for sibling in proof {
        current = hash_children(hasher, sibling, &current);
    }
    current
}
