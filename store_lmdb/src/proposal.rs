//! LMDB implementation of ProposalStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use agora_store::{ProposalStore, StoreError};
use agora_types::ProposalId;

use crate::LmdbError;

pub struct LmdbProposalStore {
    pub(crate) env: Arc<Env>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
}

fn decode_key(key: &[u8]) -> Result<ProposalId, LmdbError> {
    ProposalId::from_key(key).map_err(|e| LmdbError::Serialization(e.to_string()))
}

impl ProposalStore for LmdbProposalStore {
    fn insert_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        // LMDB serializes write transactions, so check-then-put is atomic.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let key = id.to_key();
        if self
            .proposals_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(LmdbError::Duplicate(format!("proposal {id}")).into());
        }
        self.proposals_db
            .put(&mut wtxn, &key, data)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn put_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.proposals_db
            .put(&mut wtxn, &id.to_key(), data)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Vec<u8>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .proposals_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("proposal {id}")))?;
        Ok(val.to_vec())
    }

    fn exists(&self, id: ProposalId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .proposals_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?
            .is_some();
        Ok(found)
    }

    fn iter_proposals(&self) -> Result<Vec<(ProposalId, Vec<u8>)>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut proposals = Vec::new();
        let iter = self.proposals_db.iter(&rtxn).map_err(LmdbError::from)?;
        for result in iter {
            let (key, val) = result.map_err(LmdbError::from)?;
            proposals.push((decode_key(key)?, val.to_vec()));
        }
        Ok(proposals)
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.proposals_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }

    fn last_proposal_id(&self) -> Result<Option<ProposalId>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.proposals_db.last(&rtxn).map_err(LmdbError::from)? {
            Some((key, _)) => Ok(Some(decode_key(key)?)),
            None => Ok(None),
        }
    }
}
