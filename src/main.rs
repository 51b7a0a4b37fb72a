use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::One;
use quorum_sss::{
    apply_proposal, create_group, reconstruct, GovernanceParams, Group, MemberId, Outcome,
    ProposalKind, SharingError,
};
use rand::rngs::OsRng;

fn main() {
    match run() {
        Ok(secret) => {
            println!("Reconstructed secret: {}", secret);
        }
        Err(e) => {
            println!("Membership demo failed: {}", e);
        }
    }
}

fn run() -> Result<BigUint, SharingError> {
    // Starting members, threshold, replace / add thresholds and remove ratio
    let (members, threshold) = (5, 3);
    let params = GovernanceParams::new(3, 4, 0.5)?;
    let modulus = (BigUint::one() << 127u32) - 1u32;
    let secret = BigUint::from(42u32);

    let mut group = create_group(&secret, members, threshold, &modulus, &mut OsRng)?;
    println!(
        "Group created: {}-of-{} over 2^127 - 1, members {:?}",
        group.threshold(),
        group.size(),
        group.member_ids().collect::<Vec<_>>()
    );

    let rounds = [
        ("replace", ProposalKind::Replace { evict: None }, [1u8, 1, 1, 0, 0]),
        ("add", ProposalKind::Add, [1, 1, 1, 1, 0]),
        ("remove", ProposalKind::Remove { evict: None }, [1, 1, 0, 0, 0]),
    ];

    for (label, kind, votes) in rounds {
        let ballot_box = ballots(&group, &votes);
        let outcome = apply_proposal(&mut group, &kind, &ballot_box, &params)?;
        let tally = outcome.tally();
        match &outcome {
            Outcome::Accepted { change, .. } => println!(
                "{} vote: {} of {} required, accepted: {:?}",
                label, tally.yes, tally.required, change
            ),
            Outcome::Rejected { .. } => println!(
                "{} vote: {} of {} required, rejected",
                label, tally.yes, tally.required
            ),
        }
        println!("Members now {:?}", group.member_ids().collect::<Vec<_>>());
    }

    reconstruct(&group.shares()[..threshold], threshold, &modulus)
}

fn ballots(group: &Group, votes: &[u8]) -> BTreeMap<MemberId, bool> {
    group.member_ids().zip(votes.iter().map(|v| *v == 1)).collect()
}
