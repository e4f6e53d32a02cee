//! Transition rules for the proposal state machine.
//!
//! Every function here is pure: it takes the current record and returns
//! either the successor record or the reason the transition is illegal.
//! Nothing is mutated on failure, so callers can apply results all-or-nothing.
//!
//! Checks run in a fixed order: terminal state first, then ownership, then
//! the transition's own preconditions. An ended proposal therefore reports
//! `ProposalEnded` / `AlreadyEnded` to every caller.

use agora_types::{Principal, ProposalId};

use crate::error::GovernanceError;
use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalDraft, VoteKind};

fn check_description(
    draft: &ProposalDraft,
    params: &GovernanceParams,
) -> Result<(), GovernanceError> {
    let len = draft.description.len();
    if len > params.max_description_bytes {
        return Err(GovernanceError::DescriptionTooLong {
            len,
            max: params.max_description_bytes,
        });
    }
    Ok(())
}

/// Build a new `Open` proposal owned by `owner`.
pub fn create(
    id: ProposalId,
    owner: &Principal,
    draft: ProposalDraft,
    params: &GovernanceParams,
) -> Result<Proposal, GovernanceError> {
    check_description(&draft, params)?;
    Ok(Proposal::new(id, owner.clone(), draft))
}

/// Replace `description` and `is_active`. Owner only, `Open` only.
pub fn edit(
    current: &Proposal,
    actor: &Principal,
    draft: ProposalDraft,
    params: &GovernanceParams,
) -> Result<Proposal, GovernanceError> {
    if current.ended {
        return Err(GovernanceError::ProposalEnded(current.id));
    }
    if !current.is_owned_by(actor) {
        return Err(GovernanceError::NotOwner(current.id));
    }
    check_description(&draft, params)?;

    let mut next = current.clone();
    next.description = draft.description;
    next.is_active = draft.is_active;
    Ok(next)
}

/// Record one vote. `Open` only; each actor votes at most once, whatever the
/// kind of their earlier vote.
pub fn vote(
    current: &Proposal,
    actor: &Principal,
    kind: VoteKind,
) -> Result<Proposal, GovernanceError> {
    if current.ended {
        return Err(GovernanceError::ProposalEnded(current.id));
    }
    if current.has_voted(actor) {
        return Err(GovernanceError::AlreadyVoted {
            proposal: current.id,
            voter: actor.clone(),
        });
    }
    let tally = current
        .tally()
        .with_vote(kind)
        .ok_or(GovernanceError::TallyOverflow(current.id))?;

    let mut next = current.clone();
    next.approve = tally.approve;
    next.reject = tally.reject;
    next.pass = tally.pass;
    next.voted.insert(actor.clone());
    Ok(next)
}

/// Move to the terminal `Ended` state. Owner only; a second call fails.
pub fn end(current: &Proposal, actor: &Principal) -> Result<Proposal, GovernanceError> {
    if current.ended {
        return Err(GovernanceError::AlreadyEnded(current.id));
    }
    if !current.is_owned_by(actor) {
        return Err(GovernanceError::NotOwner(current.id));
    }
    let mut next = current.clone();
    next.ended = true;
    Ok(next)
}
