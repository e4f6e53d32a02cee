//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Never touch the filesystem or network
//! - Can be controlled programmatically (e.g. made to fail on demand)
//!
//! Usage: swap real implementations for nullables in tests.

pub mod store;

pub use store::NullProposalStore;
