//! Proposal lifecycle and voting for Agora.
//!
//! A proposal is `Open` until its owner ends it; `Ended` is terminal.
//! While open, the owner may edit its description and active flag, and
//! every actor may cast exactly one vote: Approve, Reject or Pass.
//!
//! Key invariant: `approve + reject + pass == |voted|` for every proposal.

pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod params;
pub mod proposal;
pub mod tally;

pub use engine::ProposalEngine;
pub use error::GovernanceError;
pub use params::GovernanceParams;
pub use proposal::{Proposal, ProposalDraft, ProposalState, VoteKind};
pub use tally::Tally;
