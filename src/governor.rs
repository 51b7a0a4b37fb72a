//! Quorum-gated membership changes.
//!
//! A proposal is tallied against the group's live members and, once
//! accepted, replaces, adds or removes exactly one share:
//!
//! 1. Count the yes votes cast by current members. Ballots from non-members
//!    are ignored and every member counts at most once.
//! 2. Compare against the threshold for the proposal kind (`r`, `p` or
//!    `ceil(m * n)`). Meeting the threshold exactly is enough.
//! 3. Apply the change in place. Every fallible step runs before the first
//!    mutation, so an error leaves the group untouched.
//!
//! [`Governor`] serializes proposals against one group behind a mutex.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::GovernanceParams;
use crate::error::{Result, SharingError};
use crate::group::Group;
use crate::sss::{MemberId, Share};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
}

impl From<bool> for Vote {
    fn from(approve: bool) -> Self {
        if approve {
            Vote::Yes
        } else {
            Vote::No
        }
    }
}

/// Source of one ballot per member for a single proposal.
pub trait BallotBox {
    fn vote_of(&self, member: MemberId) -> Option<Vote>;
}

impl<V, S> BallotBox for HashMap<MemberId, V, S>
where
    V: Copy + Into<Vote>,
    S: BuildHasher,
{
    fn vote_of(&self, member: MemberId) -> Option<Vote> {
        self.get(&member).map(|v| (*v).into())
    }
}

impl<V> BallotBox for BTreeMap<MemberId, V>
where
    V: Copy + Into<Vote>,
{
    fn vote_of(&self, member: MemberId) -> Option<Vote> {
        self.get(&member).map(|v| (*v).into())
    }
}

/// A structural change to the group. `evict: None` drops the member with
/// the smallest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalKind {
    Replace { evict: Option<MemberId> },
    Add,
    Remove { evict: Option<MemberId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: usize,
    pub required: usize,
    /// Members entitled to vote.
    pub eligible: usize,
}

impl Tally {
    pub fn count<B: BallotBox + ?Sized>(group: &Group, ballots: &B, required: usize) -> Self {
        let yes = group
            .member_ids()
            .filter(|member| ballots.vote_of(*member) == Some(Vote::Yes))
            .count();
        Tally {
            yes,
            required,
            eligible: group.size(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.yes >= self.required
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipChange {
    /// `admitted` must be delivered to the incoming member.
    Replaced { evicted: MemberId, admitted: Share },
    Added { admitted: Share },
    Removed { evicted: MemberId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Accepted { tally: Tally, change: MembershipChange },
    Rejected { tally: Tally },
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }

    pub fn tally(&self) -> &Tally {
        match self {
            Outcome::Accepted { tally, .. } | Outcome::Rejected { tally } => tally,
        }
    }
}

/// Tallies `ballots` for `kind` and applies the change to `group` if accepted.
///
/// A rejection leaves `group` unchanged and is not an error. On error
/// `group` is also unchanged.
pub fn apply_proposal<B: BallotBox + ?Sized>(
    group: &mut Group,
    kind: &ProposalKind,
    ballots: &B,
    params: &GovernanceParams,
) -> Result<Outcome> {
    if let ProposalKind::Replace { evict } | ProposalKind::Remove { evict } = kind {
        group.eviction_target(*evict)?;
    }

    let tally = Tally::count(group, ballots, params.threshold_for(kind, group.size()));
    if !tally.is_accepted() {
        return Ok(Outcome::Rejected { tally });
    }

    let change = match *kind {
        ProposalKind::Replace { evict } => {
            let evicted = group.eviction_target(evict)?;
            // minting is the only step that can fail, so it goes first
            let admitted = group.admit()?;
            group.evict(evicted)?;
            MembershipChange::Replaced { evicted, admitted }
        }
        ProposalKind::Add => MembershipChange::Added {
            admitted: group.admit()?,
        },
        ProposalKind::Remove { evict } => {
            let remaining = group.size() - 1;
            if remaining < group.threshold() {
                return Err(SharingError::MembershipInvariantViolated {
                    remaining,
                    threshold: group.threshold(),
                });
            }
            let evicted = group.eviction_target(evict)?;
            group.evict(evicted)?;
            MembershipChange::Removed { evicted }
        }
    };

    Ok(Outcome::Accepted { tally, change })
}

/// Single-writer owner of a group.
pub struct Governor {
    params: GovernanceParams,
    group: Mutex<Group>,
}

impl Governor {
    pub fn new(group: Group, params: GovernanceParams) -> Self {
        Governor {
            params,
            group: Mutex::new(group),
        }
    }

    /// Applies one proposal while holding the group lock.
    pub fn submit<B: BallotBox + ?Sized>(&self, kind: ProposalKind, ballots: &B) -> Result<Outcome> {
        let mut group = self.group.lock();
        apply_proposal(&mut group, &kind, ballots, &self.params)
    }

    /// Copies the group, polynomial included.
    pub fn snapshot(&self) -> Group {
        self.group.lock().clone()
    }

    pub fn shares(&self) -> Vec<Share> {
        self.group.lock().shares().to_vec()
    }

    pub fn member_ids(&self) -> Vec<MemberId> {
        self.group.lock().member_ids().collect()
    }

    pub fn size(&self) -> usize {
        self.group.lock().size()
    }

    pub fn threshold(&self) -> usize {
        self.group.lock().threshold()
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    pub fn into_group(self) -> Group {
        self.group.into_inner()
    }
}
