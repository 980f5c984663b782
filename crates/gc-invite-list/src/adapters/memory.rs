//! In-memory adapters.
//!
//! `FeedPublisher` implements every source port directly, so a host (or a
//! test) drives the list by publishing new values. Contact search and
//! roster filtering match display names case-insensitively.

use crate::error::{InviteError, InviteResult};
use crate::ports::outbound::{
    CallParticipantsSource, Clipboard, ConfirmationPrompt, ContactsSource, GroupInfoSource,
    InviteActions, InviteLinkSource, InviteLinkSupply, InviteSources, InvitedPeersSource, MemberGateway,
    RecentMembersSource,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::{FeedPublisher, LiveSequence};
use shared_types::{
    ContactList, GroupId, GroupInfo, InvitedSet, ParticipantSet, PeerId, RenderedParticipant,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio_stream::StreamExt;
use tracing::debug;

fn matches_text(display_name: &str, text: &str) -> bool {
    display_name.to_lowercase().contains(&text.to_lowercase())
}

impl ContactsSource for FeedPublisher<ContactList> {
    fn all_contacts(&self) -> LiveSequence<ContactList> {
        self.sequence()
    }

    fn search_contacts(&self, text: &str) -> LiveSequence<ContactList> {
        let text = text.to_string();
        Box::pin(self.subscribe().map(move |list| {
            let peers = list
                .peers
                .into_iter()
                .filter(|p| matches_text(&p.display_name, &text))
                .collect::<Vec<_>>();
            let presences = list
                .presences
                .into_iter()
                .filter(|(id, _)| peers.iter().any(|p| p.id == *id))
                .collect();
            ContactList { peers, presences }
        }))
    }
}

fn filter_roster(
    roster: Vec<RenderedParticipant>,
    query: Option<&str>,
) -> Vec<RenderedParticipant> {
    match query {
        Some(text) => roster
            .into_iter()
            .filter(|m| matches_text(&m.peer.display_name, text))
            .collect(),
        None => roster,
    }
}

impl RecentMembersSource for FeedPublisher<Vec<RenderedParticipant>> {
    fn recent_members(&self, query: Option<&str>) -> LiveSequence<Vec<RenderedParticipant>> {
        let query = query.map(str::to_string);
        Box::pin(
            self.subscribe()
                .map(move |roster| filter_roster(roster, query.as_deref())),
        )
    }
}

/// Roster whose per-query sequence completes after its first value.
pub struct ReadyOnceRoster {
    feed: Arc<FeedPublisher<Vec<RenderedParticipant>>>,
}

impl ReadyOnceRoster {
    pub fn new(feed: Arc<FeedPublisher<Vec<RenderedParticipant>>>) -> Self {
        Self { feed }
    }
}

impl RecentMembersSource for ReadyOnceRoster {
    fn recent_members(&self, query: Option<&str>) -> LiveSequence<Vec<RenderedParticipant>> {
        Box::pin(self.feed.recent_members(query).take(1))
    }
}

impl CallParticipantsSource for FeedPublisher<Option<ParticipantSet>> {
    fn participants(&self) -> LiveSequence<Option<ParticipantSet>> {
        self.sequence()
    }
}

impl InvitedPeersSource for FeedPublisher<InvitedSet> {
    fn invited(&self) -> LiveSequence<InvitedSet> {
        self.sequence()
    }
}

impl InviteLinkSource for FeedPublisher<Option<String>> {
    fn invite_link(&self) -> LiveSequence<Option<String>> {
        self.sequence()
    }
}

impl GroupInfoSource for FeedPublisher<GroupInfo> {
    fn group_info(&self) -> LiveSequence<GroupInfo> {
        self.sequence()
    }
}

/// One feed per source.
pub struct MemorySources {
    pub contacts: Arc<FeedPublisher<ContactList>>,
    pub recent_members: Arc<FeedPublisher<Vec<RenderedParticipant>>>,
    pub participants: Arc<FeedPublisher<Option<ParticipantSet>>>,
    pub invited: Arc<FeedPublisher<InvitedSet>>,
    pub group: Arc<FeedPublisher<GroupInfo>>,
}

impl MemorySources {
    /// Empty feeds; nothing is delivered until published.
    pub fn new() -> Self {
        Self {
            contacts: Arc::new(FeedPublisher::new("contacts")),
            recent_members: Arc::new(FeedPublisher::new("recent_members")),
            participants: Arc::new(FeedPublisher::new("participants")),
            invited: Arc::new(FeedPublisher::new("invited")),
            group: Arc::new(FeedPublisher::new("group")),
        }
    }

    /// Port bundle over these feeds; the invite link is resolved from the
    /// group feed with `link_prefix`.
    pub fn sources(&self, link_prefix: &str) -> InviteSources {
        InviteSources {
            contacts: self.contacts.clone(),
            recent_members: self.recent_members.clone(),
            participants: self.participants.clone(),
            invited: self.invited.clone(),
            invite_link: InviteLinkSupply::from_group(link_prefix),
            group: self.group.clone(),
        }
    }

    /// Like `sources`, but the invite link comes from its own feed.
    pub fn sources_with_link(&self, link: Arc<dyn InviteLinkSource>) -> InviteSources {
        InviteSources {
            invite_link: InviteLinkSupply::Source(link),
            ..self.sources("")
        }
    }

    /// Like `sources`, but every roster sequence completes after its first value.
    pub fn sources_ready_once(&self, link_prefix: &str) -> InviteSources {
        InviteSources {
            recent_members: Arc::new(ReadyOnceRoster::new(self.recent_members.clone())),
            ..self.sources(link_prefix)
        }
    }
}

impl Default for MemorySources {
    fn default() -> Self {
        Self::new()
    }
}

/// Confirmation prompt answering from a script.
///
/// Answers are consumed in order; an exhausted script declines. A held
/// prompt waits for `release` before answering.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<bool>>,
    shown: Mutex<Vec<(String, String)>>,
    held: bool,
    released: Notify,
}

impl ScriptedPrompt {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Prompt that is shown but only answers after `release`.
    pub fn held(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            held: true,
            ..Self::new(answers)
        }
    }

    /// Let one held prompt answer.
    pub fn release(&self) {
        self.released.notify_one();
    }

    /// Messages and ok labels shown so far.
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().clone()
    }

    pub fn times_shown(&self) -> usize {
        self.shown.lock().len()
    }
}

#[async_trait]
impl ConfirmationPrompt for ScriptedPrompt {
    async fn request_confirmation(&self, message: &str, ok_label: &str) -> bool {
        self.shown
            .lock()
            .push((message.to_string(), ok_label.to_string()));
        if self.held {
            self.released.notified().await;
        }
        let answer = self.answers.lock().pop_front().unwrap_or(false);
        debug!(answer, "Scripted confirmation answered");
        answer
    }
}

/// Member gateway that records calls and optionally fails them.
#[derive(Default)]
pub struct RecordingMemberGateway {
    calls: Mutex<Vec<(GroupId, PeerId)>>,
    failure: Mutex<Option<String>>,
}

impl RecordingMemberGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway whose every call fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Mutex::new(Some(reason.into())),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(GroupId, PeerId)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MemberGateway for RecordingMemberGateway {
    async fn add_member(&self, group_id: GroupId, peer_id: PeerId) -> InviteResult<()> {
        self.calls.lock().push((group_id, peer_id));
        match self.failure.lock().clone() {
            Some(reason) => Err(InviteError::AddMemberFailed {
                group_id,
                peer_id,
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Clipboard that remembers what was copied.
#[derive(Default)]
pub struct RecordingClipboard {
    copied: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn copy_text(&self, text: &str) {
        self.copied.lock().push(text.to_string());
    }
}

/// Action doubles kept together so a test can inspect them afterwards.
pub struct RecordedActions {
    pub prompt: Arc<ScriptedPrompt>,
    pub members: Arc<RecordingMemberGateway>,
    pub clipboard: Arc<RecordingClipboard>,
}

impl RecordedActions {
    pub fn new(prompt: ScriptedPrompt, members: RecordingMemberGateway) -> Self {
        Self {
            prompt: Arc::new(prompt),
            members: Arc::new(members),
            clipboard: Arc::new(RecordingClipboard::new()),
        }
    }

    pub fn actions(&self) -> InviteActions {
        InviteActions {
            prompt: self.prompt.clone(),
            members: self.members.clone(),
            clipboard: self.clipboard.clone(),
        }
    }
}
