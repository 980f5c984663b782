//! Shared fixtures: a service over in-memory feeds and scripted actions.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use gc_invite_list::adapters::{
    MemorySources, RecordedActions, RecordingMemberGateway, ScriptedPrompt,
};
use gc_invite_list::{
    AggregationResult, InviteListApi, InviteListConfig, InviteListService,
    InviteListSubscription, InviteSources,
};
use shared_bus::FeedPublisher;
use shared_types::{
    ContactList, GroupId, GroupInfo, InvitedSet, ParticipantSet, Peer, PeerId,
    RenderedParticipant, SearchQuery,
};

pub const GROUP: GroupId = GroupId(100);
pub const WAIT: Duration = Duration::from_secs(1);
pub const QUIET: Duration = Duration::from_millis(150);

pub fn ann() -> Peer {
    Peer::new(1, "Ann")
}

pub fn bob() -> Peer {
    Peer::new(2, "Bob")
}

pub fn carl() -> Peer {
    Peer::new(3, "Carl")
}

pub fn dave() -> Peer {
    Peer::new(4, "Dave")
}

pub fn john() -> Peer {
    Peer::new(5, "John")
}

/// "Chess Club", with a private invitation link and add rights.
pub fn chess_club() -> GroupInfo {
    GroupInfo {
        id: GROUP,
        title: "Chess Club".into(),
        address_name: None,
        exported_invitation: Some("https://t.me/x".into()),
        can_add_members: true,
    }
}

pub fn ids(raw: &[i64]) -> InvitedSet {
    raw.iter().map(|&id| PeerId(id)).collect()
}

/// How the roster source behaves after delivering for a query.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum RosterMode {
    Live,
    ReadyOnce,
}

pub struct Harness {
    pub memory: MemorySources,
    pub recorded: RecordedActions,
    pub queries: Arc<FeedPublisher<SearchQuery>>,
    pub service: Arc<InviteListService>,
}

impl Harness {
    pub fn new(prompt: ScriptedPrompt, members: RecordingMemberGateway) -> Self {
        Self::build(InviteListConfig::default(), prompt, members, RosterMode::Live)
    }

    pub fn build(
        config: InviteListConfig,
        prompt: ScriptedPrompt,
        members: RecordingMemberGateway,
        roster: RosterMode,
    ) -> Self {
        let memory = MemorySources::new();
        let sources = match roster {
            RosterMode::Live => memory.sources(&config.invite_link_prefix),
            RosterMode::ReadyOnce => memory.sources_ready_once(&config.invite_link_prefix),
        };
        Self::assemble(memory, sources, config, prompt, members)
    }

    /// Harness whose invite link comes from `link` instead of the group.
    pub fn with_link(link: Arc<FeedPublisher<Option<String>>>) -> Self {
        let memory = MemorySources::new();
        let sources = memory.sources_with_link(link);
        Self::assemble(
            memory,
            sources,
            InviteListConfig::default(),
            ScriptedPrompt::new([]),
            RecordingMemberGateway::new(),
        )
    }

    fn assemble(
        memory: MemorySources,
        sources: InviteSources,
        config: InviteListConfig,
        prompt: ScriptedPrompt,
        members: RecordingMemberGateway,
    ) -> Self {
        memory.group.publish(chess_club());
        let recorded = RecordedActions::new(prompt, members);
        let service = InviteListService::new(GROUP, config, sources, recorded.actions())
            .expect("valid config");

        Self {
            memory,
            recorded,
            queries: Arc::new(FeedPublisher::new("query")),
            service: Arc::new(service),
        }
    }

    /// Publish roster, contacts and invited set; nobody is in the call.
    pub fn seed(&self, members: Vec<Peer>, contacts: Vec<Peer>, invited: &[i64]) {
        self.memory
            .recent_members
            .publish(members.into_iter().map(RenderedParticipant::new).collect());
        self.memory.contacts.publish(ContactList::new(contacts));
        self.memory.invited.publish(ids(invited));
        self.memory.participants.publish(Some(ParticipantSet::new()));
    }

    pub fn in_call(&self, raw: &[i64]) {
        self.memory
            .participants
            .publish(Some(raw.iter().map(|&id| PeerId(id)).collect()));
    }

    /// Type `text` into the search field.
    pub fn search(&self, text: &str) {
        self.queries.publish(SearchQuery::new(text));
    }

    /// Subscribe with `text` already typed.
    pub fn subscribe(&self, text: &str) -> InviteListSubscription {
        self.search(text);
        self.service.subscribe(self.queries.sequence())
    }
}

pub async fn next_result(sub: &mut InviteListSubscription) -> AggregationResult {
    timeout(WAIT, sub.recv())
        .await
        .expect("result in time")
        .expect("subscription open")
}

pub async fn assert_quiet(sub: &mut InviteListSubscription) {
    assert!(
        timeout(QUIET, sub.recv()).await.is_err(),
        "unexpected result"
    );
}

pub async fn wait_for_prompt(prompt: &ScriptedPrompt, count: usize) {
    timeout(WAIT, async {
        while prompt.times_shown() < count {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("confirmation prompt shown");
}

/// Member and contact ids of a result, in display order.
pub fn sections(result: &AggregationResult) -> (Vec<i64>, Vec<i64>) {
    let (contacts, members): (Vec<_>, Vec<_>) =
        result.candidates().partition(|c| c.is_contact);
    (
        members.iter().map(|c| c.peer.id.0).collect(),
        contacts.iter().map(|c| c.peer.id.0).collect(),
    )
}
