//! Source snapshots and combine-latest state.
//!
//! `LatestValues` remembers the most recent value delivered by every source.
//! A `SourceSnapshot` can only be taken once every source has delivered at
//! least once for the current query; until then no result is produced.
//!
//! ```text
//! query ──supersede──→ recent_members = ∅, contacts = ∅ (await re-issued fetches)
//! any source value ──→ store ──→ snapshot()? ──→ recompute
//! ```

use super::link::resolve_invite_link;
use shared_types::{
    ContactList, GroupInfo, InvitedSet, ParticipantSet, RenderedParticipant, SearchQuery,
};

/// Immutable input of one aggregation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceSnapshot {
    /// Group roster for the current query, in roster order.
    pub recent_members: Vec<RenderedParticipant>,
    /// Peers currently in the call.
    pub participants: ParticipantSet,
    /// Contacts (all, or matching the query).
    pub contacts: ContactList,
    /// Peers already invited.
    pub invited: InvitedSet,
}

/// Latest value of every source, plus the active query.
#[derive(Debug, Clone, Default)]
pub struct LatestValues {
    query: Option<SearchQuery>,
    recent_members: Option<Vec<RenderedParticipant>>,
    participants: Option<ParticipantSet>,
    contacts: Option<ContactList>,
    invited: Option<InvitedSet>,
    invite_link: Option<Option<String>>,
    group: Option<GroupInfo>,
    /// Set when the link is resolved from group info instead of a feed.
    link_prefix: Option<String>,
}

impl LatestValues {
    /// Nothing delivered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nothing delivered yet; the invite link follows group info, resolved
    /// with `prefix`, and is stored in the same step as the group.
    pub fn resolving_link(prefix: impl Into<String>) -> Self {
        Self {
            link_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Install a new search query.
    ///
    /// Query-scoped values (recent members, contacts) are discarded so that
    /// no result mixes data fetched for different queries.
    ///
    /// # Returns
    ///
    /// `false` if `query` equals the active query. Nothing is discarded and
    /// the caller recomputes from the values already held.
    pub fn supersede_query(&mut self, query: SearchQuery) -> bool {
        if self.query.as_ref() == Some(&query) {
            return false;
        }
        self.query = Some(query);
        self.recent_members = None;
        self.contacts = None;
        true
    }

    /// Store the latest recent-members roster.
    pub fn set_recent_members(&mut self, members: Vec<RenderedParticipant>) {
        self.recent_members = Some(members);
    }

    /// Store the latest call participants.
    ///
    /// `None` means the call has not reported participants yet and is ignored.
    ///
    /// # Returns
    ///
    /// Whether the value was stored.
    pub fn set_participants(&mut self, participants: Option<ParticipantSet>) -> bool {
        match participants {
            Some(set) => {
                self.participants = Some(set);
                true
            }
            None => false,
        }
    }

    /// Store the latest contact list.
    pub fn set_contacts(&mut self, contacts: ContactList) {
        self.contacts = Some(contacts);
    }

    /// Store the latest invited set.
    pub fn set_invited(&mut self, invited: InvitedSet) {
        self.invited = Some(invited);
    }

    /// Store the latest resolved invite link.
    pub fn set_invite_link(&mut self, link: Option<String>) {
        self.invite_link = Some(link);
    }

    /// Store the latest group info, and the link resolved from it when the
    /// link follows the group.
    pub fn set_group(&mut self, group: GroupInfo) {
        if let Some(prefix) = &self.link_prefix {
            self.invite_link = Some(resolve_invite_link(&group, prefix));
        }
        self.group = Some(group);
    }

    /// The active query.
    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    /// The resolved invite link, if delivered and present.
    pub fn invite_link(&self) -> Option<&str> {
        self.invite_link.as_ref().and_then(|link| link.as_deref())
    }

    /// The latest group info.
    pub fn group(&self) -> Option<&GroupInfo> {
        self.group.as_ref()
    }

    /// Names of the inputs that have not delivered for the current query.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.query.is_none() {
            missing.push("query");
        }
        if self.recent_members.is_none() {
            missing.push("recent_members");
        }
        if self.participants.is_none() {
            missing.push("participants");
        }
        if self.contacts.is_none() {
            missing.push("contacts");
        }
        if self.invited.is_none() {
            missing.push("invited");
        }
        if self.invite_link.is_none() {
            missing.push("invite_link");
        }
        if self.group.is_none() {
            missing.push("group");
        }
        missing
    }

    /// Whether every input has delivered for the current query.
    pub fn is_ready(&self) -> bool {
        self.missing().is_empty()
    }

    /// Take a snapshot of the four aggregation inputs.
    ///
    /// Contacts are replaced by an empty list when the viewer cannot add
    /// members to the group: such a contact could never be invited.
    ///
    /// # Returns
    ///
    /// `None` until every input (including query, link and group) has delivered.
    pub fn snapshot(&self) -> Option<SourceSnapshot> {
        if !self.is_ready() {
            return None;
        }
        let group = self.group.as_ref()?;
        let contacts = if group.can_add_members {
            self.contacts.clone()?
        } else {
            ContactList::default()
        };
        Some(SourceSnapshot {
            recent_members: self.recent_members.clone()?,
            participants: self.participants.clone()?,
            contacts,
            invited: self.invited.clone()?,
        })
    }
}
