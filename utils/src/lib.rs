//! Shared utilities for Agora.

pub mod logging;

pub use logging::{init_logging, LogFormat};
