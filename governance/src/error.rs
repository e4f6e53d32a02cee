use agora_store::StoreError;
use agora_types::{Principal, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    NotFound(ProposalId),

    #[error("only the owner of proposal {0} may do this")]
    NotOwner(ProposalId),

    #[error("proposal {0} has ended and can no longer change")]
    ProposalEnded(ProposalId),

    #[error("proposal {0} has already ended")]
    AlreadyEnded(ProposalId),

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted {
        proposal: ProposalId,
        voter: Principal,
    },

    #[error("proposal {0} already exists")]
    DuplicateId(ProposalId),

    #[error("unknown vote type {0:?}: expected Approve, Reject or Pass")]
    InvalidVoteKind(String),

    #[error("description is {len} bytes, limit is {max}")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("proposal id space exhausted")]
    IdExhausted,

    #[error("vote counter overflow on proposal {0}")]
    TallyOverflow(ProposalId),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("corrupt proposal record: {0}")]
    Codec(String),
}

impl GovernanceError {
    /// Stable name of the error category, suitable for showing to end users.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::NotOwner(_) => "NotOwner",
            Self::ProposalEnded(_) => "ProposalEnded",
            Self::AlreadyEnded(_) => "AlreadyEnded",
            Self::AlreadyVoted { .. } => "AlreadyVoted",
            Self::DuplicateId(_) => "DuplicateId",
            Self::InvalidVoteKind(_) => "InvalidVoteKind",
            Self::DescriptionTooLong { .. } => "DescriptionTooLong",
            Self::IdExhausted => "IdExhausted",
            Self::TallyOverflow(_) => "TallyOverflow",
            Self::Store(_) => "Store",
            Self::Codec(_) => "Codec",
        }
    }

    /// Whether the error is a lifecycle rejection (as opposed to a storage
    /// or decoding failure).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::Codec(_))
    }
}
