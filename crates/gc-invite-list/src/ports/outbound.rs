//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Source ports return live sequences that never fail: an upstream fetch
//! failure is expected to resolve to an empty or partial value. Action ports
//! are one-shot and async.

use crate::error::InviteResult;
use async_trait::async_trait;
use shared_bus::LiveSequence;
use shared_types::{ContactList, GroupId, GroupInfo, InvitedSet, ParticipantSet, PeerId, RenderedParticipant};
use std::sync::Arc;

/// The viewer's contacts.
pub trait ContactsSource: Send + Sync {
    /// Every contact, with presence.
    fn all_contacts(&self) -> LiveSequence<ContactList>;

    /// Contacts matching `text`.
    fn search_contacts(&self, text: &str) -> LiveSequence<ContactList>;
}

/// Roster of the call's underlying group.
///
/// The sequence for a query may complete once the roster reached its ready
/// state; no updates are promised afterwards.
pub trait RecentMembersSource: Send + Sync {
    /// Recent members filtered by `query`, or all of them for `None`.
    fn recent_members(&self, query: Option<&str>) -> LiveSequence<Vec<RenderedParticipant>>;
}

/// Peers currently in the call.
pub trait CallParticipantsSource: Send + Sync {
    /// `None` until the call has reported its participants.
    fn participants(&self) -> LiveSequence<Option<ParticipantSet>>;
}

/// Peers already sent a call invitation this session.
pub trait InvitedPeersSource: Send + Sync {
    fn invited(&self) -> LiveSequence<InvitedSet>;
}

/// Resolved invite link of the group.
pub trait InviteLinkSource: Send + Sync {
    fn invite_link(&self) -> LiveSequence<Option<String>>;
}

/// Full info of the call's underlying group.
pub trait GroupInfoSource: Send + Sync {
    fn group_info(&self) -> LiveSequence<GroupInfo>;
}

/// External confirmation modal.
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// Show `message` with an affirmative `ok_label` button.
    ///
    /// # Returns
    /// `true` only on affirmative confirmation; dismissal is `false`.
    async fn request_confirmation(&self, message: &str, ok_label: &str) -> bool;
}

/// External add-member network action.
#[async_trait]
pub trait MemberGateway: Send + Sync {
    /// Add `peer_id` to `group_id`.
    ///
    /// # Errors
    /// Any failure reported by the network; the caller does not retry.
    async fn add_member(&self, group_id: GroupId, peer_id: PeerId) -> InviteResult<()>;
}

/// System clipboard.
pub trait Clipboard: Send + Sync {
    fn copy_text(&self, text: &str);
}

/// Every live source the service subscribes to.
#[derive(Clone)]
pub struct InviteSources {
    pub contacts: Arc<dyn ContactsSource>,
    pub recent_members: Arc<dyn RecentMembersSource>,
    pub participants: Arc<dyn CallParticipantsSource>,
    pub invited: Arc<dyn InvitedPeersSource>,
    pub invite_link: InviteLinkSupply,
    pub group: Arc<dyn GroupInfoSource>,
}

/// Where the invite link comes from.
#[derive(Clone)]
pub enum InviteLinkSupply {
    /// Resolved from each group info value, joined with `prefix` for public
    /// groups. The link and the group change together.
    FromGroup { prefix: String },
    /// A separate live source.
    Source(Arc<dyn InviteLinkSource>),
}

impl InviteLinkSupply {
    pub fn from_group(prefix: impl Into<String>) -> Self {
        Self::FromGroup {
            prefix: prefix.into(),
        }
    }

    /// Prefix to resolve with, when the link follows group info.
    pub fn resolving_prefix(&self) -> Option<&str> {
        match self {
            Self::FromGroup { prefix } => Some(prefix),
            Self::Source(_) => None,
        }
    }
}

/// Every external action the service may invoke.
#[derive(Clone)]
pub struct InviteActions {
    pub prompt: Arc<dyn ConfirmationPrompt>,
    pub members: Arc<dyn MemberGateway>,
    pub clipboard: Arc<dyn Clipboard>,
}
