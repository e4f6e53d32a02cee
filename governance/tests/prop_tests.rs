//! Property tests: lifecycle invariants hold under arbitrary operation
//! sequences.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use agora_governance::{GovernanceParams, ProposalDraft, ProposalEngine, VoteKind};
use agora_nullables::NullProposalStore;
use agora_types::{Principal, ProposalId};

const ACTORS: [&str; 4] = ["owner", "alice", "bob", "carol"];

#[derive(Clone, Debug)]
enum Op {
    Create { id: u64, actor: usize, active: bool },
    Edit { id: u64, actor: usize, active: bool },
    Vote { id: u64, actor: usize, kind: usize },
    End { id: u64, actor: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let id = 0u64..3;
    let actor = 0usize..ACTORS.len();
    prop_oneof![
        (id.clone(), actor.clone(), any::<bool>())
            .prop_map(|(id, actor, active)| Op::Create { id, actor, active }),
        (id.clone(), actor.clone(), any::<bool>())
            .prop_map(|(id, actor, active)| Op::Edit { id, actor, active }),
        (id.clone(), actor.clone(), 0usize..3)
            .prop_map(|(id, actor, kind)| Op::Vote { id, actor, kind }),
        (id, actor).prop_map(|(id, actor)| Op::End { id, actor }),
    ]
}

fn principal(index: usize) -> Principal {
    Principal::parse(ACTORS[index]).unwrap()
}

proptest! {
    /// The tally invariant, the voted-once rule and the frozen terminal state
    /// all survive any sequence of operations, and a failed operation never
    /// changes the record it targeted.
    #[test]
    fn lifecycle_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let engine = ProposalEngine::new(
            Arc::new(NullProposalStore::new()),
            GovernanceParams::default(),
        );
        let mut successful_votes: HashSet<(u64, usize)> = HashSet::new();

        for op in ops {
            let target = match &op {
                Op::Create { id, .. }
                | Op::Edit { id, .. }
                | Op::Vote { id, .. }
                | Op::End { id, .. } => ProposalId::new(*id),
            };
            let before = engine.get_proposal(target).ok();

            let result = match op {
                Op::Create { id, actor, active } => engine.create_proposal(
                    ProposalId::new(id),
                    &principal(actor),
                    ProposalDraft::new(format!("p{id}"), active),
                ),
                Op::Edit { id, actor, active } => engine.edit_proposal(
                    ProposalId::new(id),
                    &principal(actor),
                    ProposalDraft::new(format!("edited by {actor}"), active),
                ),
                Op::Vote { id, actor, kind } => {
                    let result = engine.vote(
                        ProposalId::new(id),
                        &principal(actor),
                        VoteKind::ALL[kind],
                    );
                    if result.is_ok() {
                        // a second success for the same pair would be a double vote
                        prop_assert!(successful_votes.insert((id, actor)));
                    }
                    result
                }
                Op::End { id, actor } => {
                    engine.end_proposal(ProposalId::new(id), &principal(actor))
                }
            };

            let after = engine.get_proposal(target).ok();
            match result {
                Ok(updated) => {
                    prop_assert_eq!(after.as_ref(), Some(&updated));
                    if let Some(prev) = &before {
                        prop_assert!(!prev.ended, "an ended proposal changed");
                        prop_assert_eq!(&prev.owner, &updated.owner);
                    }
                }
                Err(_) => {
                    prop_assert_eq!(before, after);
                }
            }
        }

        for (_, p) in engine.get_all_proposals().unwrap() {
            prop_assert!(p.is_consistent());
            prop_assert_eq!(p.tally().total(), p.voted.len() as u64);
        }
    }

    /// Voting twice with the same actor always fails the second time and
    /// leaves the tallies as they were after the first vote.
    #[test]
    fn second_vote_never_counts(first in 0usize..3, second in 0usize..3) {
        let engine = ProposalEngine::new(
            Arc::new(NullProposalStore::new()),
            GovernanceParams::default(),
        );
        let id = ProposalId::new(0);
        engine
            .create_proposal(id, &principal(0), ProposalDraft::new("x", true))
            .unwrap();
        let after_first = engine.vote(id, &principal(1), VoteKind::ALL[first]).unwrap();
        let err = engine.vote(id, &principal(1), VoteKind::ALL[second]).unwrap_err();
        prop_assert_eq!(err.kind(), "AlreadyVoted");
        prop_assert_eq!(engine.get_proposal(id).unwrap(), after_first);
    }
}
