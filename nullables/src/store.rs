//! Nullable store: thread-safe in-memory proposal storage for testing.

use agora_store::{ProposalStore, StoreError};
use agora_types::ProposalId;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// An in-memory proposal store.
///
/// Thread-safe for use with tokio's multi-threaded runtime. Can be switched
/// to "unavailable", after which every call fails with
/// [`StoreError::Unavailable`] and nothing is read or written.
pub struct NullProposalStore {
    proposals: Mutex<BTreeMap<ProposalId, Vec<u8>>>,
    unavailable: AtomicBool,
    writes: AtomicU64,
}

impl NullProposalStore {
    pub fn new() -> Self {
        Self {
            proposals: Mutex::new(BTreeMap::new()),
            unavailable: AtomicBool::new(false),
            writes: AtomicU64::new(0),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Store raw bytes directly, bypassing every check. For seeding corrupt
    /// records in tests.
    pub fn put_raw(&self, id: ProposalId, data: Vec<u8>) {
        self.proposals.lock().unwrap().insert(id, data);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("null store switched off".into()));
        }
        Ok(())
    }
}

impl Default for NullProposalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalStore for NullProposalStore {
    fn insert_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        self.check_available()?;
        let mut proposals = self.proposals.lock().unwrap();
        if proposals.contains_key(&id) {
            return Err(StoreError::Duplicate(format!("proposal {id}")));
        }
        proposals.insert(id, data.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn put_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        self.check_available()?;
        self.proposals.lock().unwrap().insert(id, data.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Vec<u8>, StoreError> {
        self.check_available()?;
        self.proposals
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))
    }

    fn exists(&self, id: ProposalId) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.proposals.lock().unwrap().contains_key(&id))
    }

    fn iter_proposals(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError> {
        self.check_available()?;
        Ok(self
            .proposals
            .lock()
            .unwrap()
            .iter()
            .map(|(id, data)| (*id, data.clone()))
            .collect())
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        self.check_available()?;
        Ok(self.proposals.lock().unwrap().len() as u64)
    }

    fn last_proposal_id(&self) -> Result<Option<ProposalId>, StoreError> {
        self.check_available()?;
        Ok(self.proposals.lock().unwrap().keys().next_back().copied())
    }
}
