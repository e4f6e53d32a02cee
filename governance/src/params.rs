//! Tunable limits for the proposal engine.

use serde::{Deserialize, Serialize};

/// Default cap on a proposal description, in bytes.
pub const DEFAULT_MAX_DESCRIPTION_BYTES: usize = 4096;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Longest description accepted by create and edit.
    pub max_description_bytes: usize,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            max_description_bytes: DEFAULT_MAX_DESCRIPTION_BYTES,
        }
    }
}
