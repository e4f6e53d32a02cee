//! Proposals and the values that drive their lifecycle.

use agora_types::{Principal, ProposalId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::GovernanceError;
use crate::tally::Tally;

/// The three vote types. A vote is a single categorical choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteKind {
    Approve,
    Reject,
    Pass,
}

impl VoteKind {
    pub const ALL: [VoteKind; 3] = [VoteKind::Approve, VoteKind::Reject, VoteKind::Pass];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::Pass => "Pass",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| GovernanceError::InvalidVoteKind(s.to_string()))
    }
}

/// Lifecycle state. `Ended` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalState {
    Open,
    Ended,
}

/// Caller-supplied fields for create and edit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub description: String,
    pub is_active: bool,
}

impl ProposalDraft {
    pub fn new(description: impl Into<String>, is_active: bool) -> Self {
        Self {
            description: description.into(),
            is_active,
        }
    }
}

/// A governance proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub description: String,
    /// Author-set intent flag, independent of tallying and of `ended`.
    pub is_active: bool,
    pub owner: Principal,
    pub approve: u32,
    pub reject: u32,
    pub pass: u32,
    /// Everyone who has voted. Sole source of truth for "has voted".
    pub voted: BTreeSet<Principal>,
    pub ended: bool,
}

impl Proposal {
    /// A fresh `Open` proposal with zero tallies and no voters.
    pub fn new(id: ProposalId, owner: Principal, draft: ProposalDraft) -> Self {
        Self {
            id,
            description: draft.description,
            is_active: draft.is_active,
            owner,
            approve: 0,
            reject: 0,
            pass: 0,
            voted: BTreeSet::new(),
            ended: false,
        }
    }

    pub fn state(&self) -> ProposalState {
        if self.ended {
            ProposalState::Ended
        } else {
            ProposalState::Open
        }
    }

    pub fn is_owned_by(&self, actor: &Principal) -> bool {
        &self.owner == actor
    }

    pub fn has_voted(&self, actor: &Principal) -> bool {
        self.voted.contains(actor)
    }

    pub fn voter_count(&self) -> usize {
        self.voted.len()
    }

    pub fn tally(&self) -> Tally {
        Tally {
            approve: self.approve,
            reject: self.reject,
            pass: self.pass,
        }
    }

    /// `approve + reject + pass == |voted|`.
    pub fn is_consistent(&self) -> bool {
        self.tally().total() == self.voted.len() as u64
    }

    /// Encode for storage.
    pub fn encode(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Codec(e.to_string()))
    }

    /// Decode a stored record, rejecting any that break the tally invariant
    /// or whose embedded id disagrees with the key it was stored under.
    pub fn decode(expected_id: ProposalId, data: &[u8]) -> Result<Self, GovernanceError> {
        let proposal: Proposal =
            bincode::deserialize(data).map_err(|e| GovernanceError::Codec(e.to_string()))?;
        if proposal.id != expected_id {
            return Err(GovernanceError::Codec(format!(
                "record stored under {expected_id} claims id {}",
                proposal.id
            )));
        }
        if !proposal.is_consistent() {
            return Err(GovernanceError::Codec(format!(
                "proposal {expected_id} tally {} disagrees with {} voters",
                proposal.tally().total(),
                proposal.voted.len()
            )));
        }
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(name: &str) -> Principal {
        Principal::parse(name).unwrap()
    }

    #[test]
    fn vote_kind_parses_only_the_three_variants() {
        assert_eq!("Approve".parse::<VoteKind>().unwrap(), VoteKind::Approve);
        assert_eq!("Reject".parse::<VoteKind>().unwrap(), VoteKind::Reject);
        assert_eq!("Pass".parse::<VoteKind>().unwrap(), VoteKind::Pass);
        for bad in ["approve", "Abstain", "", "Approve "] {
            let err = bad.parse::<VoteKind>().unwrap_err();
            assert_eq!(err.kind(), "InvalidVoteKind");
        }
    }

    #[test]
    fn vote_kind_serde_rejects_unknown_variant() {
        let kind: VoteKind = serde_json::from_str("\"Pass\"").unwrap();
        assert_eq!(kind, VoteKind::Pass);
        assert!(serde_json::from_str::<VoteKind>("\"Veto\"").is_err());
    }

    #[test]
    fn new_proposal_is_open_and_empty() {
        let p = Proposal::new(
            ProposalId::new(0),
            principal("owner"),
            ProposalDraft::new("Adopt X", true),
        );
        assert_eq!(p.state(), ProposalState::Open);
        assert_eq!(p.tally().total(), 0);
        assert!(p.voted.is_empty());
        assert!(p.is_owned_by(&principal("owner")));
        assert!(p.is_consistent());
    }

    #[test]
    fn decode_rejects_id_mismatch() {
        let p = Proposal::new(
            ProposalId::new(4),
            principal("owner"),
            ProposalDraft::default(),
        );
        let bytes = p.encode().unwrap();
        assert_eq!(Proposal::decode(ProposalId::new(4), &bytes).unwrap(), p);
        let err = Proposal::decode(ProposalId::new(5), &bytes).unwrap_err();
        assert_eq!(err.kind(), "Codec");
    }

    #[test]
    fn decode_rejects_inconsistent_tally() {
        let mut p = Proposal::new(
            ProposalId::new(1),
            principal("owner"),
            ProposalDraft::default(),
        );
        p.approve = 2;
        p.voted.insert(principal("a"));
        let bytes = p.encode().unwrap();
        assert!(Proposal::decode(ProposalId::new(1), &bytes).is_err());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(Proposal::decode(ProposalId::new(0), &[0xff, 0x01]).is_err());
    }
}
