//! Core governance engine: applies lifecycle transitions to a proposal store.
//!
//! Every mutating call is one atomic check-then-mutate unit per proposal:
//! the proposal's lock is held across load, decide and store, so two actors
//! voting at once can never both slip past the already-voted check.
//! Different proposals never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use agora_store::{ProposalStore, StoreError};
use agora_types::{Principal, ProposalId};
use tracing::{debug, info, warn};

use crate::error::GovernanceError;
use crate::lifecycle;
use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalDraft, VoteKind};
use crate::tally::Tally;

pub struct ProposalEngine {
    store: Arc<dyn ProposalStore>,
    params: GovernanceParams,
    /// One exclusive lock per proposal id that has been touched.
    locks: Mutex<HashMap<ProposalId, Arc<Mutex<()>>>>,
    /// Serializes id allocation in [`ProposalEngine::create_next`].
    allocation: Mutex<()>,
}

impl ProposalEngine {
    pub fn new(store: Arc<dyn ProposalStore>, params: GovernanceParams) -> Self {
        Self {
            store,
            params,
            locks: Mutex::new(HashMap::new()),
            allocation: Mutex::new(()),
        }
    }

    /// Run `f` while holding the exclusive lock for `id`.
    ///
    /// The registry entry is dropped again once no other caller holds or
    /// waits on it, so the registry only tracks ids with work in flight.
    fn with_lock<T>(&self, id: ProposalId, f: impl FnOnce() -> T) -> T {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id).or_default())
        };
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        drop(lock);
        if locks.get(&id).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(&id);
        }
        result
    }

    fn load(&self, id: ProposalId) -> Result<Proposal, GovernanceError> {
        match self.store.get_proposal(id) {
            Ok(bytes) => Proposal::decode(id, &bytes),
            Err(StoreError::NotFound(_)) => Err(GovernanceError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a new `Open` proposal owned by `owner` under a caller-chosen id.
    pub fn create_proposal(
        &self,
        id: ProposalId,
        owner: &Principal,
        draft: ProposalDraft,
    ) -> Result<Proposal, GovernanceError> {
        self.with_lock(id, || -> Result<Proposal, GovernanceError> {
            if self.store.exists(id)? {
                debug!(proposal = %id, actor = %owner, "create rejected: id taken");
                return Err(GovernanceError::DuplicateId(id));
            }
            let proposal = lifecycle::create(id, owner, draft, &self.params).inspect_err(|e| {
                debug!(proposal = %id, actor = %owner, error = %e, "create rejected")
            })?;
            let bytes = proposal.encode()?;
            match self.store.insert_proposal(id, &bytes) {
                Ok(()) => {}
                Err(StoreError::Duplicate(_)) => {
                    debug!(proposal = %id, actor = %owner, "create rejected: id taken");
                    return Err(GovernanceError::DuplicateId(id));
                }
                Err(e) => {
                    warn!(proposal = %id, error = %e, "store rejected new proposal");
                    return Err(e.into());
                }
            }
            info!(proposal = %id, owner = %owner, active = proposal.is_active, "proposal created");
            Ok(proposal)
        })
    }

    /// Create under the next free id (one past the highest stored id).
    pub fn create_next(
        &self,
        owner: &Principal,
        draft: ProposalDraft,
    ) -> Result<Proposal, GovernanceError> {
        let _alloc = self.allocation.lock().unwrap_or_else(PoisonError::into_inner);
        let id = self.next_proposal_id()?;
        self.create_proposal(id, owner, draft)
    }

    /// The id [`ProposalEngine::create_next`] would assign right now.
    pub fn next_proposal_id(&self) -> Result<ProposalId, GovernanceError> {
        match self.store.last_proposal_id()? {
            Some(last) => last.next().ok_or(GovernanceError::IdExhausted),
            None => Ok(ProposalId::new(0)),
        }
    }

    /// Load, decide and store one transition under the proposal's lock.
    fn transition<F>(
        &self,
        id: ProposalId,
        actor: &Principal,
        action: &'static str,
        decide: F,
    ) -> Result<Proposal, GovernanceError>
    where
        F: FnOnce(&Proposal) -> Result<Proposal, GovernanceError>,
    {
        self.with_lock(id, || -> Result<Proposal, GovernanceError> {
            let current = self.load(id).inspect_err(|e| {
                debug!(proposal = %id, actor = %actor, action, error = %e, "transition rejected")
            })?;
            let next = decide(&current).inspect_err(|e| {
                debug!(proposal = %id, actor = %actor, action, error = %e, "transition rejected")
            })?;

            let bytes = next.encode()?;
            self.store.put_proposal(id, &bytes).inspect_err(|e| {
                warn!(proposal = %id, action, error = %e, "failed to persist transition")
            })?;
            Ok(next)
        })
    }

    /// Replace description and active flag. Owner only, while `Open`.
    pub fn edit_proposal(
        &self,
        id: ProposalId,
        actor: &Principal,
        draft: ProposalDraft,
    ) -> Result<Proposal, GovernanceError> {
        let params = &self.params;
        let updated = self.transition(id, actor, "edit", |current| {
            lifecycle::edit(current, actor, draft, params)
        })?;
        info!(proposal = %id, actor = %actor, active = updated.is_active, "proposal edited");
        Ok(updated)
    }

    /// Cast `actor`'s single vote on an `Open` proposal.
    pub fn vote(
        &self,
        id: ProposalId,
        actor: &Principal,
        kind: VoteKind,
    ) -> Result<Proposal, GovernanceError> {
        let updated =
            self.transition(id, actor, "vote", |current| lifecycle::vote(current, actor, kind))?;
        info!(
            proposal = %id,
            actor = %actor,
            vote = %kind,
            voters = updated.voter_count(),
            "vote recorded"
        );
        Ok(updated)
    }

    /// End the proposal. Owner only; fails if it has already ended.
    pub fn end_proposal(
        &self,
        id: ProposalId,
        actor: &Principal,
    ) -> Result<Proposal, GovernanceError> {
        let updated =
            self.transition(id, actor, "end", |current| lifecycle::end(current, actor))?;
        let tally = updated.tally();
        info!(
            proposal = %id,
            actor = %actor,
            approve = tally.approve,
            reject = tally.reject,
            pass = tally.pass,
            "proposal ended"
        );
        Ok(updated)
    }

    pub fn get_proposal(&self, id: ProposalId) -> Result<Proposal, GovernanceError> {
        self.load(id)
    }

    pub fn tally(&self, id: ProposalId) -> Result<Tally, GovernanceError> {
        Ok(self.load(id)?.tally())
    }

    /// Number of stored proposals.
    pub fn proposal_count(&self) -> Result<u64, GovernanceError> {
        Ok(self.store.proposal_count()?)
    }

    /// Every proposal with its id, in ascending id order.
    pub fn get_all_proposals(&self) -> Result<Vec<(ProposalId, Proposal)>, GovernanceError> {
        self.store
            .iter_proposals()?
            .into_iter()
            .map(|(id, bytes)| Proposal::decode(id, &bytes).map(|p| (id, p)))
            .collect()
    }
}
