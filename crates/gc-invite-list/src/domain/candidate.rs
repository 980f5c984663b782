//! Invite candidates.

use serde::Serialize;
use shared_types::{InvitedSet, Peer, PeerId, Presence};

/// A peer eligible to appear in the invite list.
///
/// Equality is structural over all four fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// The peer snapshot.
    pub peer: Peer,
    /// Presence delivered with the peer, if any.
    pub presence: Option<Presence>,
    /// Whether the candidate came from the viewer's contacts.
    pub is_contact: bool,
    /// `false` once the peer has already been invited.
    pub enabled: bool,
}

impl Candidate {
    /// A group member candidate.
    pub fn member(peer: Peer, presence: Option<Presence>, invited: &InvitedSet) -> Self {
        Self::tagged(peer, presence, false, invited)
    }

    /// A contact candidate.
    pub fn contact(peer: Peer, presence: Option<Presence>, invited: &InvitedSet) -> Self {
        Self::tagged(peer, presence, true, invited)
    }

    fn tagged(peer: Peer, presence: Option<Presence>, is_contact: bool, invited: &InvitedSet) -> Self {
        let enabled = !invited.contains(&peer.id);
        Self {
            peer,
            presence,
            is_contact,
            enabled,
        }
    }

    /// Candidate identity.
    pub fn id(&self) -> PeerId {
        self.peer.id
    }
}

/// The two ordered, de-duplicated candidate lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CandidateLists {
    /// Group members not in the call, in roster order.
    pub members: Vec<Candidate>,
    /// Contacts that are neither in the call nor listed as members.
    pub contacts: Vec<Candidate>,
}

impl CandidateLists {
    /// Whether both sections are empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty() && self.contacts.is_empty()
    }

    /// Total candidates across both sections.
    pub fn len(&self) -> usize {
        self.members.len() + self.contacts.len()
    }

    /// Find a candidate by identity in either section.
    pub fn find(&self, peer_id: &PeerId) -> Option<&Candidate> {
        self.members
            .iter()
            .chain(self.contacts.iter())
            .find(|c| c.peer.id == *peer_id)
    }
}
