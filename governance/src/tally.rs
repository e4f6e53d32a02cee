//! Vote tallies and the arithmetic over them.

use serde::{Deserialize, Serialize};

use crate::proposal::VoteKind;

/// Basis points in one whole.
pub const BPS_SCALE: u64 = 10_000;

/// Snapshot of a proposal's per-kind counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub approve: u32,
    pub reject: u32,
    pub pass: u32,
}

impl Tally {
    pub fn count(&self, kind: VoteKind) -> u32 {
        match kind {
            VoteKind::Approve => self.approve,
            VoteKind::Reject => self.reject,
            VoteKind::Pass => self.pass,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.approve) + u64::from(self.reject) + u64::from(self.pass)
    }

    /// Share of `kind` in basis points, rounded down. Zero when nobody voted.
    pub fn share_bps(&self, kind: VoteKind) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (u64::from(self.count(kind)) * BPS_SCALE / total) as u32
    }

    /// The kind with strictly the most votes; `None` on a tie for first or
    /// when nobody voted.
    pub fn leading(&self) -> Option<VoteKind> {
        let mut best: Option<(VoteKind, u32)> = None;
        let mut tied = false;
        for kind in VoteKind::ALL {
            let n = self.count(kind);
            match best {
                Some((_, top)) if n == top => tied = true,
                Some((_, top)) if n < top => {}
                _ => {
                    best = Some((kind, n));
                    tied = false;
                }
            }
        }
        match best {
            Some((kind, n)) if n > 0 && !tied => Some(kind),
            _ => None,
        }
    }

    /// The tally after one more vote of `kind`, or `None` on counter overflow.
    pub(crate) fn with_vote(self, kind: VoteKind) -> Option<Self> {
        let mut next = self;
        let slot = match kind {
            VoteKind::Approve => &mut next.approve,
            VoteKind::Reject => &mut next.reject,
            VoteKind::Pass => &mut next.pass,
        };
        *slot = slot.checked_add(1)?;
        Some(next)
    }
}
