//! Proposal identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AgoraError;

/// Identifier of a proposal, unique and immutable for its lifetime.
///
/// Ordered numerically; the store iterates proposals in this order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProposalId(u64);

impl ProposalId {
    /// Width of the storage key encoding.
    pub const KEY_LEN: usize = 8;

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The id following this one, or `None` on overflow.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Big-endian key so byte-wise ordering matches numeric ordering.
    pub fn to_key(&self) -> [u8; Self::KEY_LEN] {
        self.0.to_be_bytes()
    }

    /// Decode a storage key produced by [`ProposalId::to_key`].
    pub fn from_key(key: &[u8]) -> Result<Self, AgoraError> {
        let arr: [u8; Self::KEY_LEN] =
            key.try_into().map_err(|_| AgoraError::InvalidKeyLength {
                expected: Self::KEY_LEN,
                actual: key.len(),
            })?;
        Ok(Self(u64::from_be_bytes(arr)))
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProposalId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
