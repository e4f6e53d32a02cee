#![no_main]

use std::sync::Arc;

use agora_governance::{GovernanceParams, ProposalDraft, ProposalEngine, VoteKind};
use agora_nullables::NullProposalStore;
use agora_types::{Principal, ProposalId};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Create { id: u8, actor: u8, description: String, active: bool },
    Edit { id: u8, actor: u8, description: String, active: bool },
    Vote { id: u8, actor: u8, kind: u8 },
    End { id: u8, actor: u8 },
}

impl Op {
    fn target(&self) -> u8 {
        match self {
            Op::Create { id, .. } | Op::Edit { id, .. } => *id,
            Op::Vote { id, .. } | Op::End { id, .. } => *id,
        }
    }
}

fn actor(n: u8) -> Principal {
    Principal::parse(&format!("actor-{}", n % 4)).expect("fixed principals are valid")
}

fn pid(n: u8) -> ProposalId {
    ProposalId::new(u64::from(n % 4))
}

fuzz_target!(|ops: Vec<Op>| {
    let engine = ProposalEngine::new(
        Arc::new(NullProposalStore::new()),
        GovernanceParams { max_description_bytes: 64 },
    );

    for op in ops {
        let id = pid(op.target());
        let before = engine.get_proposal(id).ok();
        let result = match op {
            Op::Create { id, actor: a, description, active } => {
                engine.create_proposal(pid(id), &actor(a), ProposalDraft::new(description, active))
            }
            Op::Edit { id, actor: a, description, active } => {
                engine.edit_proposal(pid(id), &actor(a), ProposalDraft::new(description, active))
            }
            Op::Vote { id, actor: a, kind } => {
                let kind = VoteKind::ALL[usize::from(kind) % VoteKind::ALL.len()];
                engine.vote(pid(id), &actor(a), kind)
            }
            Op::End { id, actor: a } => engine.end_proposal(pid(id), &actor(a)),
        };
        let after = engine.get_proposal(id).ok();

        match result {
            Ok(updated) => {
                assert!(updated.is_consistent());
                assert_eq!(Some(&updated), after.as_ref());
                if let Some(prev) = before {
                    assert!(!prev.ended, "ended proposal changed");
                    assert_eq!(prev.owner, updated.owner);
                }
            }
            Err(_) => assert_eq!(before, after),
        }
    }

    for (_, p) in engine.get_all_proposals().expect("null store is available") {
        assert!(p.is_consistent());
    }
});
