//! Core types for the mktree Merkle tree library
//!
//! This crate provides the fundamental value types shared by the tree
//! construction and verification code: the [`Digest`] byte-sequence type,
//! the [`HashProvider`] capability trait, and `sha2`-backed default
//! providers via [`HashAlgorithm`].

pub mod digest;
pub mod error;
pub mod hash;

pub use digest::Digest;
pub use error::{Error, Result};
pub use hash::{HashAlgorithm, HashProvider};
