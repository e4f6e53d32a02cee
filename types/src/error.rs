//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for Agora boundary parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgoraError {
    #[error("invalid principal: {0}")]
    InvalidPrincipal(String),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },
}
