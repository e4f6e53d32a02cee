#![no_main]

use agora_governance::Proposal;
use agora_types::{Principal, ProposalId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic, and anything it accepts
    // must satisfy the tally invariant.
    if data.len() >= ProposalId::KEY_LEN {
        if let Ok(id) = ProposalId::from_key(&data[..ProposalId::KEY_LEN]) {
            if let Ok(p) = Proposal::decode(id, &data[ProposalId::KEY_LEN..]) {
                assert!(p.is_consistent());
                assert_eq!(p.id, id);
            }
        }
    }

    let _ = bincode::deserialize::<Principal>(data);
    let _ = bincode::deserialize::<ProposalId>(data);
});
