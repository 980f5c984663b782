//! Source Subscription Manager.
//!
//! Holds one live subscription per source and fans them into a single
//! stream of `SourceUpdate`s. Query-scoped sources (recent members,
//! contacts) are re-issued on every new query; dropping the previous
//! sequence cancels its in-flight fetch.
//!
//! ```text
//! contacts ───────┐
//! recent_members ─┤
//! participants ───┤
//! invited ────────┼──→ next_update() ──→ SourceUpdate
//! invite_link ────┤  (only when supplied as its own source)
//! group ──────────┘
//! ```

use crate::ports::outbound::{InviteLinkSupply, InviteSources};
use shared_bus::LiveSequence;
use shared_types::{
    ContactList, GroupInfo, InvitedSet, ParticipantSet, RenderedParticipant, SearchQuery,
};
use std::fmt;
use tokio_stream::StreamExt;
use tracing::debug;

/// One delivered source value.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceUpdate {
    RecentMembers(Vec<RenderedParticipant>),
    Contacts(ContactList),
    Participants(Option<ParticipantSet>),
    Invited(InvitedSet),
    InviteLink(Option<String>),
    Group(GroupInfo),
}

/// Source identity, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    RecentMembers,
    Contacts,
    Participants,
    Invited,
    InviteLink,
    Group,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RecentMembers => "recent_members",
            Self::Contacts => "contacts",
            Self::Participants => "participants",
            Self::Invited => "invited",
            Self::InviteLink => "invite_link",
            Self::Group => "group",
        };
        f.write_str(name)
    }
}

enum Polled {
    Update(SourceUpdate),
    Completed(SourceKind),
}

async fn next_of<T>(slot: &mut Option<LiveSequence<T>>) -> Option<T> {
    match slot {
        Some(sequence) => sequence.next().await,
        None => std::future::pending().await,
    }
}

/// Live subscriptions to every source.
pub struct SourceSubscriptionManager {
    sources: InviteSources,
    recent_members: Option<LiveSequence<Vec<RenderedParticipant>>>,
    contacts: Option<LiveSequence<ContactList>>,
    participants: Option<LiveSequence<Option<ParticipantSet>>>,
    invited: Option<LiveSequence<InvitedSet>>,
    invite_link: Option<LiveSequence<Option<String>>>,
    group: Option<LiveSequence<GroupInfo>>,
}

impl SourceSubscriptionManager {
    /// Subscribe to the query-independent sources.
    ///
    /// Query-scoped sources stay unsubscribed until the first `reissue`.
    pub fn open(sources: InviteSources) -> Self {
        Self {
            participants: Some(sources.participants.participants()),
            invited: Some(sources.invited.invited()),
            invite_link: match &sources.invite_link {
                InviteLinkSupply::Source(source) => Some(source.invite_link()),
                InviteLinkSupply::FromGroup { .. } => None,
            },
            group: Some(sources.group.group_info()),
            recent_members: None,
            contacts: None,
            sources,
        }
    }

    /// Re-issue the query-scoped fetches for `query`, superseding the old ones.
    ///
    /// Empty query: all recent members and all contacts.
    /// Otherwise: recent members and contacts matching the text.
    pub fn reissue(&mut self, query: &SearchQuery) {
        debug!(query = %query, "Re-issuing query-scoped fetches");
        self.recent_members = Some(self.sources.recent_members.recent_members(query.text()));
        self.contacts = Some(match query.text() {
            Some(text) => self.sources.contacts.search_contacts(text),
            None => self.sources.contacts.all_contacts(),
        });
    }

    /// Whether every held sequence has completed.
    pub fn is_exhausted(&self) -> bool {
        self.recent_members.is_none()
            && self.contacts.is_none()
            && self.participants.is_none()
            && self.invited.is_none()
            && self.invite_link.is_none()
            && self.group.is_none()
    }

    /// Await the next value from any source.
    ///
    /// A completed sequence is dropped; its last value stays in effect
    /// downstream.
    ///
    /// # Returns
    ///
    /// `None` once every sequence has completed.
    pub async fn next_update(&mut self) -> Option<SourceUpdate> {
        loop {
            if self.is_exhausted() {
                return None;
            }

            let polled = tokio::select! {
                v = next_of(&mut self.recent_members) => v
                    .map(SourceUpdate::RecentMembers)
                    .map_or(Polled::Completed(SourceKind::RecentMembers), Polled::Update),
                v = next_of(&mut self.contacts) => v
                    .map(SourceUpdate::Contacts)
                    .map_or(Polled::Completed(SourceKind::Contacts), Polled::Update),
                v = next_of(&mut self.participants) => v
                    .map(SourceUpdate::Participants)
                    .map_or(Polled::Completed(SourceKind::Participants), Polled::Update),
                v = next_of(&mut self.invited) => v
                    .map(SourceUpdate::Invited)
                    .map_or(Polled::Completed(SourceKind::Invited), Polled::Update),
                v = next_of(&mut self.invite_link) => v
                    .map(SourceUpdate::InviteLink)
                    .map_or(Polled::Completed(SourceKind::InviteLink), Polled::Update),
                v = next_of(&mut self.group) => v
                    .map(SourceUpdate::Group)
                    .map_or(Polled::Completed(SourceKind::Group), Polled::Update),
            };

            match polled {
                Polled::Update(update) => return Some(update),
                Polled::Completed(kind) => {
                    debug!(source = %kind, "Source sequence completed");
                    self.release_source(kind);
                }
            }
        }
    }

    fn release_source(&mut self, kind: SourceKind) {
        match kind {
            SourceKind::RecentMembers => self.recent_members = None,
            SourceKind::Contacts => self.contacts = None,
            SourceKind::Participants => self.participants = None,
            SourceKind::Invited => self.invited = None,
            SourceKind::InviteLink => self.invite_link = None,
            SourceKind::Group => self.group = None,
        }
    }

    /// Drop every upstream subscription.
    pub fn release(&mut self) {
        self.recent_members = None;
        self.contacts = None;
        self.participants = None;
        self.invited = None;
        self.invite_link = None;
        self.group = None;
    }
}
