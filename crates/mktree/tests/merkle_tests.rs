//! End-to-end Merkle tree test suite
//!
//! Exercises the build / prove / verify pipeline across tree shapes,
//! including the unbalanced-tree promotion rule, tamper detection, and
//! consistency between append-only tree states.

use mktree::types::{Digest, HashAlgorithm, HashProvider};
use mktree::{
    hash_children, hash_leaf, verify_consistency, verify_inclusion, Error, MerkleTree, Side,
};
use proptest::prelude::*;
use rstest::rstest;

const SHA256: HashAlgorithm = HashAlgorithm::Sha2256;

fn blocks(n: u64) -> Vec<Vec<u8>> {
    (0..n).map(|i| format!("block {}", i).into_bytes()).collect()
}

// ==== Inclusion round-trips ====

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
#[case(6)]
#[case(7)]
#[case(8)]
#[case(9)]
#[case(11)]
#[case(13)]
#[case(16)]
#[case(33)]
fn test_every_leaf_proves_inclusion(#[case] leaf_count: u64) {
    let data = blocks(leaf_count);
    let tree = MerkleTree::build(&SHA256, &data).unwrap();

    for index in 0..leaf_count {
        let proof = tree.inclusion_proof(index).unwrap();
        verify_inclusion(
            &SHA256,
            &data[index as usize],
            index,
            leaf_count,
            &proof,
            tree.root(),
        )
        .unwrap_or_else(|e| {
            panic!(
                "proof for leaf {} of {} should verify: {}",
                index, leaf_count, e
            )
        });
    }
}

#[test]
fn test_three_leaf_reference_scenario() {
    // Leaves ["a", "b", "c"]: level 1 = [H(0x01, L0, L1), L2] with L2
    // promoted; the proof for index 2 is the single left sibling
    // H(0x01, L0, L1).
    let data: Vec<&[u8]> = vec![b"a", b"b", b"c"];
    let tree = MerkleTree::build(&SHA256, &data).unwrap();

    let l0 = hash_leaf(&SHA256, b"a");
    let l1 = hash_leaf(&SHA256, b"b");
    let l2 = hash_leaf(&SHA256, b"c");
    let h01 = hash_children(&SHA256, &l0, &l1);
    let root = hash_children(&SHA256, &h01, &l2);
    assert_eq!(tree.root(), &root);

    let proof = tree.inclusion_proof(2).unwrap();
    assert_eq!(proof.len(), 1);
    assert_eq!(proof.entries[0].sibling, h01);
    assert_eq!(proof.entries[0].side, Side::Left);

    verify_inclusion(&SHA256, b"c", 2, 3, &proof, &root).unwrap();
}

// ==== Tamper detection ====

#[test]
fn test_mutated_leaf_data_rejected() {
    let data = blocks(5);
    let tree = MerkleTree::build(&SHA256, &data).unwrap();
    let proof = tree.inclusion_proof(3).unwrap();

    let mut tampered = data[3].clone();
    tampered[0] ^= 0x01;
    assert!(matches!(
        verify_inclusion(&SHA256, &tampered, 3, 5, &proof, tree.root()),
        Err(Error::RootMismatch { .. })
    ));
}

#[test]
fn test_mutated_proof_entry_rejected() {
    let data = blocks(6);
    let tree = MerkleTree::build(&SHA256, &data).unwrap();

    for index in 0..6 {
        let reference = tree.inclusion_proof(index).unwrap();
        for entry in 0..reference.len() {
            let mut proof = reference.clone();
            let mut bytes = proof.entries[entry].sibling.as_bytes().to_vec();
            bytes[7] ^= 0x80;
            proof.entries[entry].sibling = Digest::from_bytes(bytes);
            assert!(
                matches!(
                    verify_inclusion(&SHA256, &data[index as usize], index, 6, &proof, tree.root()),
                    Err(Error::RootMismatch { .. })
                ),
                "corrupted entry {} of proof for leaf {} must be rejected",
                entry,
                index
            );
        }
    }
}

#[test]
fn test_flipped_side_rejected() {
    let data = blocks(6);
    let tree = MerkleTree::build(&SHA256, &data).unwrap();

    for index in 0..6 {
        let reference = tree.inclusion_proof(index).unwrap();
        for entry in 0..reference.len() {
            let mut proof = reference.clone();
            proof.entries[entry].side = match proof.entries[entry].side {
                Side::Left => Side::Right,
                Side::Right => Side::Left,
            };
            assert!(
                matches!(
                    verify_inclusion(&SHA256, &data[index as usize], index, 6, &proof, tree.root()),
                    Err(Error::MalformedProof(_))
                ),
                "flipped side {} of proof for leaf {} must be rejected",
                entry,
                index
            );
        }
    }
}

#[test]
fn test_proof_rejected_under_wrong_index() {
    let data = blocks(4);
    let tree = MerkleTree::build(&SHA256, &data).unwrap();
    let proof = tree.inclusion_proof(0).unwrap();
    // Same data, same proof, wrong claimed position.
    let result = verify_inclusion(&SHA256, &data[0], 2, 4, &proof, tree.root());
    assert!(result.is_err());
}

// ==== Attack regressions ====

#[test]
fn test_duplicate_last_leaf_equivocation() {
    let odd = MerkleTree::build(&SHA256, &blocks(5)).unwrap();
    let mut padded_blocks = blocks(5);
    padded_blocks.push(padded_blocks[4].clone());
    let padded = MerkleTree::build(&SHA256, &padded_blocks).unwrap();
    assert_ne!(odd.root(), padded.root());
}

#[test]
fn test_leaf_digest_never_matches_internal_node() {
    // A leaf crafted to contain an internal node's preimage (minus the
    // prefix) still hashes under the leaf prefix, so no collision.
    let l0 = hash_leaf(&SHA256, b"left block");
    let l1 = hash_leaf(&SHA256, b"right block");
    let internal = hash_children(&SHA256, &l0, &l1);

    let mut forged = Vec::new();
    forged.extend_from_slice(l0.as_bytes());
    forged.extend_from_slice(l1.as_bytes());
    assert_ne!(hash_leaf(&SHA256, &forged), internal);

    let mut forged_with_prefix = vec![0x01];
    forged_with_prefix.extend_from_slice(&forged);
    assert_ne!(hash_leaf(&SHA256, &forged_with_prefix), internal);
}

// ==== Consistency between tree states ====

#[rstest]
#[case(1, 2)]
#[case(1, 7)]
#[case(2, 3)]
#[case(2, 4)]
#[case(3, 4)]
#[case(3, 7)]
#[case(4, 8)]
#[case(5, 9)]
#[case(6, 12)]
#[case(7, 8)]
#[case(8, 13)]
#[case(9, 12)]
#[case(12, 33)]
fn test_consistency_roundtrip(#[case] old_size: u64, #[case] new_size: u64) {
    let data = blocks(new_size);
    let old_tree = MerkleTree::build(&SHA256, &data[..old_size as usize]).unwrap();
    let new_tree = MerkleTree::build(&SHA256, &data).unwrap();

    let proof = new_tree.consistency_proof(old_size).unwrap();
    verify_consistency(
        &SHA256,
        old_size,
        new_size,
        &proof,
        old_tree.root(),
        new_tree.root(),
    )
    .unwrap_or_else(|e| panic!("consistency {} -> {} should verify: {}", old_size, new_size, e));
}

#[test]
fn test_consistency_rejects_non_prefix_history() {
    // A "prior" tree whose leaves differ from the current tree's prefix
    // must not verify.
    let new_tree = MerkleTree::build(&SHA256, &blocks(7)).unwrap();
    let forged: Vec<&[u8]> = vec![b"not", b"the", b"prefix"];
    let forged_tree = MerkleTree::build(&SHA256, &forged).unwrap();

    let proof = new_tree.consistency_proof(3).unwrap();
    assert!(matches!(
        verify_consistency(&SHA256, 3, 7, &proof, forged_tree.root(), new_tree.root()),
        Err(Error::RootMismatch { .. })
    ));
}

#[test]
fn test_append_relocates_promoted_leaf() {
    // In the 3-leaf tree, "c" is promoted and its proof has one entry.
    // Appending "d" pairs "c" with "d", so the stale proof no longer
    // matches the structure derived for the 4-leaf tree.
    let three: Vec<&[u8]> = vec![b"a", b"b", b"c"];
    let four: Vec<&[u8]> = vec![b"a", b"b", b"c", b"d"];
    let old_tree = MerkleTree::build(&SHA256, &three).unwrap();
    let new_tree = MerkleTree::build(&SHA256, &four).unwrap();

    let stale = old_tree.inclusion_proof(2).unwrap();
    assert_eq!(stale.len(), 1);
    assert!(matches!(
        verify_inclusion(&SHA256, b"c", 2, 4, &stale, new_tree.root()),
        Err(Error::MalformedProof(_))
    ));

    // Proofs issued against the old root stay valid for the old state.
    verify_inclusion(&SHA256, b"c", 2, 3, &stale, old_tree.root()).unwrap();

    // A regenerated proof fits the new structure.
    let fresh = new_tree.inclusion_proof(2).unwrap();
    assert_eq!(fresh.len(), 2);
    verify_inclusion(&SHA256, b"c", 2, 4, &fresh, new_tree.root()).unwrap();
}

// ==== Algorithm agility ====

/// A caller-supplied provider: SHA-256 over a keyed prefix
struct TaggedSha256;

impl HashProvider for TaggedSha256 {
    fn digest(&self, data: &[u8]) -> Digest {
        let mut tagged = b"mktree-test-tag:".to_vec();
        tagged.extend_from_slice(data);
        HashAlgorithm::Sha2256.digest(&tagged)
    }

    fn digest_size(&self) -> usize {
        32
    }
}

#[rstest]
#[case(HashAlgorithm::Sha2256)]
#[case(HashAlgorithm::Sha2384)]
#[case(HashAlgorithm::Sha2512)]
fn test_sha2_family_agility(#[case] hasher: HashAlgorithm) {
    let data = blocks(6);
    let tree = MerkleTree::build(&hasher, &data).unwrap();
    assert_eq!(tree.root().len(), hasher.digest_size());

    for index in 0..6 {
        let proof = tree.inclusion_proof(index).unwrap();
        verify_inclusion(&hasher, &data[index as usize], index, 6, &proof, tree.root()).unwrap();
    }
}

#[test]
fn test_custom_provider() {
    let data = blocks(5);
    let tree = MerkleTree::build(&TaggedSha256, &data).unwrap();
    let standard = MerkleTree::build(&SHA256, &data).unwrap();
    assert_ne!(tree.root(), standard.root());

    let proof = tree.inclusion_proof(4).unwrap();
    verify_inclusion(&TaggedSha256, &data[4], 4, 5, &proof, tree.root()).unwrap();
}

#[test]
fn test_roots_differ_across_providers_only_by_algorithm() {
    let data = blocks(4);
    let sha256_tree = MerkleTree::build(&HashAlgorithm::Sha2256, &data).unwrap();
    let sha512_tree = MerkleTree::build(&HashAlgorithm::Sha2512, &data).unwrap();
    assert_eq!(sha256_tree.root().len(), 32);
    assert_eq!(sha512_tree.root().len(), 64);
}

// ==== Wire format ====

#[test]
fn test_proof_json_is_base64_with_sides() {
    let data: Vec<&[u8]> = vec![b"a", b"b", b"c"];
    let tree = MerkleTree::build(&SHA256, &data).unwrap();
    let proof = tree.inclusion_proof(2).unwrap();

    let json = serde_json::to_string(&proof).unwrap();
    assert!(json.contains("\"left\""));
    assert!(json.contains(&proof.entries[0].sibling.to_base64()));

    let decoded: mktree::InclusionProof = serde_json::from_str(&json).unwrap();
    assert_eq!(proof, decoded);
    verify_inclusion(&SHA256, b"c", 2, 3, &decoded, tree.root()).unwrap();
}

#[test]
fn test_consistency_proof_serde_roundtrip() {
    let tree = MerkleTree::build(&SHA256, &blocks(9)).unwrap();
    let proof = tree.consistency_proof(5).unwrap();
    let json = serde_json::to_string(&proof).unwrap();
    let decoded: mktree::ConsistencyProof = serde_json::from_str(&json).unwrap();
    assert_eq!(proof, decoded);
}

// ==== Randomized structural properties ====

proptest! {
    #[test]
    fn prop_inclusion_roundtrip(
        data in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..32), 1..48),
        index in any::<prop::sample::Index>(),
    ) {
        let tree = MerkleTree::build(&SHA256, &data).unwrap();
        let leaf_count = data.len() as u64;
        let leaf_index = index.index(data.len()) as u64;

        let proof = tree.inclusion_proof(leaf_index).unwrap();
        prop_assert!(verify_inclusion(
            &SHA256,
            &data[leaf_index as usize],
            leaf_index,
            leaf_count,
            &proof,
            tree.root(),
        )
        .is_ok());
    }

    #[test]
    fn prop_consistency_roundtrip(
        data in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..16), 2..40),
        split in any::<prop::sample::Index>(),
    ) {
        let old_size = 1 + split.index(data.len() - 1);
        let old_tree = MerkleTree::build(&SHA256, &data[..old_size]).unwrap();
        let new_tree = MerkleTree::build(&SHA256, &data).unwrap();

        let proof = new_tree.consistency_proof(old_size as u64).unwrap();
        prop_assert!(verify_consistency(
            &SHA256,
            old_size as u64,
            data.len() as u64,
            &proof,
            old_tree.root(),
            new_tree.root(),
        )
        .is_ok());
    }

    #[test]
    fn prop_determinism(
        data in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..16), 1..32),
    ) {
        let a = MerkleTree::build(&SHA256, &data).unwrap();
        let b = MerkleTree::build(&SHA256, &data).unwrap();
        prop_assert_eq!(a.root(), b.root());
    }
}
