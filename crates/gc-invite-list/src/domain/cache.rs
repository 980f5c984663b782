//! Contact Membership Cache.
//!
//! Index of the peers listed in the latest Contacts candidate list. The
//! Confirmation Gate consults it to decide whether a selected peer is a
//! contact that must be added to the group before it can be invited.
//!
//! Overwritten, never merged: after `overwrite` the cache holds exactly the
//! identities of the list it was given.

use super::candidate::Candidate;
use shared_types::{Peer, PeerId};
use std::collections::HashMap;

/// Peer identity → contact peer snapshot for the latest aggregation cycle.
#[derive(Debug, Clone, Default)]
pub struct ContactMembershipCache {
    contacts: HashMap<PeerId, Peer>,
}

impl ContactMembershipCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with the given contacts candidate list.
    pub fn overwrite(&mut self, contacts: &[Candidate]) {
        let mut next = HashMap::with_capacity(contacts.len());
        for candidate in contacts {
            next.insert(candidate.peer.id, candidate.peer.clone());
        }
        self.contacts = next;
    }

    /// Whether `peer_id` was in the latest contacts candidate list.
    pub fn is_contact(&self, peer_id: &PeerId) -> bool {
        self.contacts.contains_key(peer_id)
    }

    /// The cached contact snapshot.
    pub fn peer(&self, peer_id: &PeerId) -> Option<&Peer> {
        self.contacts.get(peer_id)
    }

    /// Number of cached contacts.
    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    /// Whether no contacts are cached.
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }
}
