//! LMDB storage backend for Agora.
//!
//! Implements the storage traits from `agora-store` using the `heed` LMDB
//! bindings. Each logical store maps to one LMDB database within a single
//! environment.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod proposal;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use proposal::LmdbProposalStore;
