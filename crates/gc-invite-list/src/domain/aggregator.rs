//! Aggregator: derives the Members and Contacts candidate lists.
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | No identity in both lists | contacts skip every id in `member_ids` |
//! | No call participant in either list | both passes skip `participants` |
//! | `enabled == !invited.contains(id)` | `Candidate::member` / `Candidate::contact` |
//!
//! A peer repeated within one source keeps its first position only.

use super::candidate::{Candidate, CandidateLists};
use super::snapshot::SourceSnapshot;
use shared_types::PeerId;
use std::collections::HashSet;

/// Compute both candidate lists from one snapshot.
///
/// Pure: the same snapshot always yields the same lists in the same order.
///
/// 1. Members: recent members minus call participants minus bots, roster order.
/// 2. Contacts: contacts minus call participants minus step-1 members, source order.
pub fn aggregate(snapshot: &SourceSnapshot) -> CandidateLists {
    let invited = &snapshot.invited;
    let participants = &snapshot.participants;

    let mut member_ids: HashSet<PeerId> = HashSet::with_capacity(snapshot.recent_members.len());
    let members: Vec<Candidate> = snapshot
        .recent_members
        .iter()
        .filter(|m| !participants.contains(&m.peer.id) && !m.peer.is_bot)
        .filter(|m| member_ids.insert(m.peer.id))
        .map(|m| Candidate::member(m.peer.clone(), m.presence(), invited))
        .collect();

    let mut contact_ids: HashSet<PeerId> = HashSet::with_capacity(snapshot.contacts.peers.len());
    let contacts: Vec<Candidate> = snapshot
        .contacts
        .peers
        .iter()
        .filter(|p| !participants.contains(&p.id) && !member_ids.contains(&p.id))
        .filter(|p| contact_ids.insert(p.id))
        .map(|p| Candidate::contact(p.clone(), snapshot.contacts.presence(&p.id), invited))
        .collect();

    CandidateLists { members, contacts }
}
