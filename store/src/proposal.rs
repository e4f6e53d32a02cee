//! Proposal storage trait.

use crate::StoreError;
use agora_types::ProposalId;

/// Passive backing map for proposal records.
///
/// Records are opaque bytes; encoding and every lifecycle rule live in the
/// governance crate. Implementations must be safe to share across threads.
pub trait ProposalStore: Send + Sync {
    /// Insert a new record. Fails with [`StoreError::Duplicate`] if the id is
    /// taken; the existence check and the write happen as one atomic step.
    fn insert_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError>;

    /// Overwrite an existing record.
    fn put_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError>;

    /// Get a record by id, or [`StoreError::NotFound`].
    fn get_proposal(&self, id: ProposalId) -> Result<Vec<u8>, StoreError>;

    /// Whether a record exists for this id.
    fn exists(&self, id: ProposalId) -> Result<bool, StoreError>;

    /// All records in ascending id order.
    fn iter_proposals(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError>;

    /// Number of stored records.
    fn proposal_count(&self) -> Result<u64, StoreError>;

    /// Highest stored id, or `None` for an empty store.
    fn last_proposal_id(&self) -> Result<Option<ProposalId>, StoreError>;
}
