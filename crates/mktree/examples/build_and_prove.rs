//! Example: Build a Merkle tree, prove membership, and link states
//!
//! Demonstrates the rebuild-based append flow: build a tree over a few
//! data blocks, verify an inclusion proof, append a block by rebuilding,
//! and verify a consistency proof between the two states.
//!
//! Usage:
//!   cargo run --example build_and_prove

use mktree::types::HashAlgorithm;
use mktree::{verify_consistency, verify_inclusion, MerkleTree};
use std::process;

fn main() {
    let hasher = HashAlgorithm::Sha2256;

    let blocks: Vec<&[u8]> = vec![b"Java", b"Python", b"Go-Lang", b"Typescript", b"C++"];
    let tree = match MerkleTree::build(&hasher, &blocks) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error building tree: {}", e);
            process::exit(1);
        }
    };

    println!("Tree with {} leaves:", tree.leaf_count());
    for level in (0..tree.height()).rev() {
        let mut row = Vec::new();
        let mut index = 0;
        while let Some(node) = tree.node(level, index) {
            row.push(node.to_hex()[..8].to_string());
            index += 1;
        }
        println!("  level {}: {}", level, row.join(" "));
    }

    // Prove that "C++" (index 4) is in the tree.
    let proof = match tree.inclusion_proof(4) {
        Ok(proof) => proof,
        Err(e) => {
            eprintln!("Error generating proof: {}", e);
            process::exit(1);
        }
    };
    println!("Proof for index 4 has {} entries", proof.len());

    match verify_inclusion(&hasher, b"C++", 4, tree.leaf_count(), &proof, tree.root()) {
        Ok(()) => println!("Inclusion proof verified"),
        Err(e) => {
            eprintln!("Inclusion proof rejected: {}", e);
            process::exit(1);
        }
    }

    // Append a block. Trees are immutable, so appending means rebuilding
    // over the extended sequence.
    let mut extended = blocks.clone();
    extended.push(b"Rust");
    let new_tree = match MerkleTree::build(&hasher, &extended) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error rebuilding tree: {}", e);
            process::exit(1);
        }
    };
    println!("Root before append: {}", tree.root());
    println!("Root after append:  {}", new_tree.root());

    // Link the two states: the old tree is a left-prefix of the new one.
    let consistency = match new_tree.consistency_proof(tree.leaf_count()) {
        Ok(proof) => proof,
        Err(e) => {
            eprintln!("Error generating consistency proof: {}", e);
            process::exit(1);
        }
    };
    match verify_consistency(
        &hasher,
        tree.leaf_count(),
        new_tree.leaf_count(),
        &consistency,
        tree.root(),
        new_tree.root(),
    ) {
        Ok(()) => println!("Consistency proof verified"),
        Err(e) => {
            eprintln!("Consistency proof rejected: {}", e);
            process::exit(1);
        }
    }
}
