//! Error types for mktree-types

use thiserror::Error;

/// Errors that can occur in mktree-types
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid hex or base64 encoding
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),
}

/// Result type for mktree-types operations
pub type Result<T> = std::result::Result<T, Error>;
