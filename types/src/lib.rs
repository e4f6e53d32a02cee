//! Fundamental types for Agora.
//!
//! This crate defines the identifiers shared across every other crate in the
//! workspace: proposal ids, actor principals, and the common error type.

pub mod error;
pub mod id;
pub mod principal;

pub use error::AgoraError;
pub use id::ProposalId;
pub use principal::Principal;
