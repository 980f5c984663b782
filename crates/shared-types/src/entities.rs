//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `PeerId`, `GroupId`, `Peer`
//! - **Status**: `Presence`, `PresenceByPeer`
//! - **Rosters**: `RenderedParticipant`, `ParticipantSet`, `ContactList`, `InvitedSet`
//! - **Group**: `GroupInfo`
//! - **Input**: `SearchQuery`

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Unique identifier of a user or chat entity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PeerId(pub i64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the group a call belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user or chat entity with its display metadata.
///
/// Immutable snapshot: a new `Peer` value is delivered on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// Identity used for all cross-source comparisons.
    pub id: PeerId,
    /// Name shown in rows and confirmation prompts.
    pub display_name: String,
    /// Bots are never offered as group-member candidates.
    #[serde(default)]
    pub is_bot: bool,
}

impl Peer {
    /// Create a regular (non-bot) peer.
    pub fn new(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            id: PeerId(id),
            display_name: display_name.into(),
            is_bot: false,
        }
    }

    /// Create a bot peer.
    pub fn bot(id: i64, display_name: impl Into<String>) -> Self {
        Self {
            is_bot: true,
            ..Self::new(id, display_name)
        }
    }
}

// =============================================================================
// CLUSTER B: STATUS
// =============================================================================

/// Last-seen / online status of a peer.
///
/// Absence of a presence is a valid state; callers hold `Option<Presence>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Presence {
    /// Online until the given unix timestamp.
    Online { until: u64 },
    /// Last seen at the given unix timestamp.
    LastSeen { at: u64 },
    /// Seen recently, exact time hidden.
    Recently,
    /// Seen within the last week.
    LastWeek,
    /// Seen within the last month.
    LastMonth,
    /// Not seen for a long time, or hidden.
    LongAgo,
}

/// Presence values keyed by peer identity.
pub type PresenceByPeer = HashMap<PeerId, Presence>;

// =============================================================================
// CLUSTER C: ROSTERS
// =============================================================================

/// A group member as rendered by the recent-members roster.
///
/// Carries the presence map delivered alongside the member; the member's own
/// presence is looked up by its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedParticipant {
    /// The member.
    pub peer: Peer,
    /// Presences delivered with this member.
    #[serde(default)]
    pub presences: PresenceByPeer,
}

impl RenderedParticipant {
    /// Wrap a peer with no presence information.
    pub fn new(peer: Peer) -> Self {
        Self {
            peer,
            presences: HashMap::new(),
        }
    }

    /// Attach the member's own presence.
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presences.insert(self.peer.id, presence);
        self
    }

    /// The member's own presence, if one was delivered.
    pub fn presence(&self) -> Option<Presence> {
        self.presences.get(&self.peer.id).copied()
    }
}

/// Set of peer identities currently in the call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantSet {
    participants: HashSet<PeerId>,
}

impl ParticipantSet {
    /// Create an empty participant set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `peer_id` is in the call.
    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.participants.contains(peer_id)
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether nobody is in the call.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Iterate the participant identities.
    pub fn iter(&self) -> impl Iterator<Item = &PeerId> {
        self.participants.iter()
    }
}

impl FromIterator<PeerId> for ParticipantSet {
    fn from_iter<I: IntoIterator<Item = PeerId>>(iter: I) -> Self {
        Self {
            participants: iter.into_iter().collect(),
        }
    }
}

/// Set of peer identities already sent a call invitation.
pub type InvitedSet = HashSet<PeerId>;

/// The viewer's contacts (or a search over them) with presences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactList {
    /// Contacts in source order.
    pub peers: Vec<Peer>,
    /// Presences keyed by contact identity.
    #[serde(default)]
    pub presences: PresenceByPeer,
}

impl ContactList {
    /// Build a contact list without presences.
    pub fn new(peers: Vec<Peer>) -> Self {
        Self {
            peers,
            presences: HashMap::new(),
        }
    }

    /// Attach a presence for one contact.
    pub fn with_presence(mut self, peer_id: PeerId, presence: Presence) -> Self {
        self.presences.insert(peer_id, presence);
        self
    }

    /// Presence of one contact.
    pub fn presence(&self, peer_id: &PeerId) -> Option<Presence> {
        self.presences.get(peer_id).copied()
    }

    /// Whether the list holds no contacts.
    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

// =============================================================================
// CLUSTER D: GROUP
// =============================================================================

/// The call's underlying group as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupInfo {
    /// Group identity; the target of add-member actions.
    pub id: GroupId,
    /// Title used in confirmation prompts.
    pub title: String,
    /// Public username, if the group has one.
    #[serde(default)]
    pub address_name: Option<String>,
    /// Exported private invitation link, if one exists.
    #[serde(default)]
    pub exported_invitation: Option<String>,
    /// Whether the viewer may add members to the group.
    #[serde(default)]
    pub can_add_members: bool,
}

// =============================================================================
// CLUSTER E: INPUT
// =============================================================================

/// The user's search text. The empty query means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Create a query from text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The distinguished "no filter" query.
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Whether this is the "no filter" query.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `None` for the empty query, the text otherwise.
    pub fn text(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }
}

impl From<&str> for SearchQuery {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SearchQuery {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
