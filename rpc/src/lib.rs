//! JSON RPC server for Agora.
//!
//! Provides endpoints for:
//! - Listing and reading proposals
//! - Creating and editing proposals
//! - Voting (Approve, Reject, Pass)
//! - Ending proposals
//!
//! The acting identity arrives in the `x-agora-principal` header.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod server;

pub use error::RpcError;
pub use identity::{Caller, PRINCIPAL_HEADER};
pub use server::{router, AppState, RpcServer};
