//! Invite List Service
//!
//! Wires the source subscription manager, the pure domain components and
//! the Confirmation Gate behind `InviteListApi`.
//!
//! ## Concurrency
//!
//! One recompute task per subscription. The latest source values, the
//! Contact Membership Cache and the projector's previous query live in one
//! `CoreState` behind a single mutex, so a recompute and its cache write are
//! one atomic step. Lock order: `active` → `gate` → `core`.

use crate::adapters::subscription::{SourceSubscriptionManager, SourceUpdate};
use crate::config::InviteListConfig;
use crate::domain::{
    aggregate, AggregationResult, ConfirmationGate, ContactMembershipCache, GateEvent, GateState,
    LatestValues, ResultProjector, SectionLabels, SelectionDecision,
};
use crate::error::{InviteError, InviteResult};
use crate::metrics;
use crate::ports::inbound::InviteListApi;
use crate::ports::outbound::{InviteActions, InviteSources};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::LiveSequence;
use shared_types::{GroupId, PeerId, SearchQuery};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Mutable state written by the recompute path.
struct CoreState {
    /// Subscription whose task may write this state.
    owner: Option<Uuid>,
    latest: LatestValues,
    cache: ContactMembershipCache,
    projector: ResultProjector,
}

impl CoreState {
    fn new(owner: Option<Uuid>, labels: SectionLabels, link_prefix: Option<&str>) -> Self {
        Self {
            owner,
            latest: link_prefix.map_or_else(LatestValues::new, LatestValues::resolving_link),
            cache: ContactMembershipCache::new(),
            projector: ResultProjector::new(labels),
        }
    }

    /// Store a source value.
    ///
    /// # Returns
    ///
    /// Whether the value was stored and a recompute should follow.
    fn apply(&mut self, update: SourceUpdate) -> bool {
        match update {
            SourceUpdate::RecentMembers(members) => self.latest.set_recent_members(members),
            SourceUpdate::Contacts(contacts) => self.latest.set_contacts(contacts),
            SourceUpdate::Participants(participants) => {
                return self.latest.set_participants(participants)
            }
            SourceUpdate::Invited(invited) => self.latest.set_invited(invited),
            SourceUpdate::InviteLink(link) => self.latest.set_invite_link(link),
            SourceUpdate::Group(group) => self.latest.set_group(group),
        }
        true
    }

    /// Aggregate, overwrite the cache, project.
    ///
    /// # Returns
    ///
    /// `None` while some input has not delivered for the current query.
    fn recompute(&mut self) -> Option<AggregationResult> {
        let Some(snapshot) = self.latest.snapshot() else {
            debug!(missing = ?self.latest.missing(), "Waiting for sources");
            return None;
        };
        let query = self.latest.query()?.clone();

        let lists = aggregate(&snapshot);
        self.cache.overwrite(&lists.contacts);
        let result = self
            .projector
            .project(&lists, self.latest.invite_link(), &query);

        debug!(
            query = %query,
            members = lists.members.len(),
            contacts = lists.contacts.len(),
            entries = result.entries.len(),
            search_changed = result.search_changed,
            "Invite list recomputed"
        );
        Some(result)
    }
}

struct ActiveSubscription {
    id: Uuid,
    task: AbortHandle,
}

/// State shared between the service, its recompute task and subscriptions.
struct Shared {
    active: Mutex<Option<ActiveSubscription>>,
    gate: Mutex<ConfirmationGate>,
    core: Mutex<CoreState>,
}

impl Shared {
    /// Tear down `id` if it is still the active subscription, emptying the
    /// cache.
    fn release(&self, id: Uuid) {
        let mut active = self.active.lock();
        if !active.as_ref().is_some_and(|a| a.id == id) {
            return;
        }
        if let Some(subscription) = active.take() {
            subscription.task.abort();
        }
        self.gate.lock().process_event(GateEvent::Teardown);
        let mut core = self.core.lock();
        core.owner = None;
        core.cache = ContactMembershipCache::new();
        drop(core);
        metrics::subscription_released();
        info!(subscription = %id, "Invite list subscription released");
    }
}

enum Step {
    Query(Option<SearchQuery>),
    Source(Option<SourceUpdate>),
}

/// Combine-latest loop of one subscription.
async fn run_subscription(
    shared: Arc<Shared>,
    id: Uuid,
    mut manager: SourceSubscriptionManager,
    mut queries: LiveSequence<SearchQuery>,
    results: mpsc::Sender<AggregationResult>,
) {
    let mut queries_open = true;
    let mut sources_open = true;

    while queries_open || sources_open {
        let step = tokio::select! {
            query = queries.next(), if queries_open => Step::Query(query),
            update = manager.next_update(), if sources_open => Step::Source(update),
        };

        let result = match step {
            Step::Query(None) => {
                debug!(subscription = %id, "Query sequence completed");
                queries_open = false;
                continue;
            }
            Step::Query(Some(query)) => {
                let mut core = shared.core.lock();
                if core.owner != Some(id) {
                    break;
                }
                if core.latest.supersede_query(query.clone()) {
                    manager.reissue(&query);
                    sources_open = true;
                    continue;
                }
                debug!(subscription = %id, query = %query, "Query unchanged, recomputing");
                core.recompute()
            }
            Step::Source(None) => {
                debug!(subscription = %id, "All source sequences completed");
                sources_open = false;
                continue;
            }
            Step::Source(Some(update)) => {
                let mut core = shared.core.lock();
                if core.owner != Some(id) {
                    break;
                }
                if !core.apply(update) {
                    continue;
                }
                core.recompute()
            }
        };

        let Some(result) = result else { continue };
        metrics::record_recompute(result.is_empty_placeholder());
        if results.send(result).await.is_err() {
            break;
        }
    }

    manager.release();
    debug!(subscription = %id, "Recompute task finished");
}

/// Live sequence of `AggregationResult`s for one consumer.
///
/// Dropping it cancels every upstream subscription and empties the Contact
/// Membership Cache. A pending Confirmation Gate returns to idle.
pub struct InviteListSubscription {
    shared: Arc<Shared>,
    id: Uuid,
    results: ReceiverStream<AggregationResult>,
    task: JoinHandle<()>,
}

impl InviteListSubscription {
    /// Subscription identifier used in log fields.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Receive the next result.
    ///
    /// # Errors
    ///
    /// `StreamClosed` once every input sequence has completed.
    pub async fn recv(&mut self) -> InviteResult<AggregationResult> {
        self.results.next().await.ok_or(InviteError::StreamClosed)
    }
}

impl Stream for InviteListSubscription {
    type Item = AggregationResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.results).poll_next(cx)
    }
}

impl Drop for InviteListSubscription {
    fn drop(&mut self) {
        self.task.abort();
        self.shared.release(self.id);
    }
}

/// Marks a selection in flight; resets the gate if the selection future is
/// dropped before finishing.
struct PendingSelection<'a> {
    gate: &'a Mutex<ConfirmationGate>,
    epoch: u64,
    armed: bool,
}

impl<'a> PendingSelection<'a> {
    fn new(gate: &'a Mutex<ConfirmationGate>, epoch: u64) -> Self {
        Self {
            gate,
            epoch,
            armed: true,
        }
    }

    /// Apply an intermediate event. `false` if torn down meanwhile.
    fn step(&self, event: GateEvent) -> bool {
        self.gate.lock().advance(self.epoch, event)
    }

    /// Apply a terminal event and return the gate to idle.
    fn resolve(mut self, event: GateEvent) -> bool {
        self.armed = false;
        let mut gate = self.gate.lock();
        gate.advance(self.epoch, event) && gate.advance(self.epoch, GateEvent::Settle)
    }

    /// Return an already-terminal gate to idle.
    fn settle(mut self) -> bool {
        self.armed = false;
        self.gate.lock().advance(self.epoch, GateEvent::Settle)
    }
}

impl Drop for PendingSelection<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.gate.lock().abandon(self.epoch);
        }
    }
}

/// Invite List Service implementation
pub struct InviteListService {
    group_id: GroupId,
    config: InviteListConfig,
    sources: InviteSources,
    actions: InviteActions,
    shared: Arc<Shared>,
}

impl InviteListService {
    /// Create a service inviting into `group_id`.
    ///
    /// # Errors
    ///
    /// `Config` if the configuration does not validate.
    pub fn new(
        group_id: GroupId,
        config: InviteListConfig,
        sources: InviteSources,
        actions: InviteActions,
    ) -> InviteResult<Self> {
        config.validate()?;
        let labels = config.section_labels();
        let core = CoreState::new(None, labels, sources.invite_link.resolving_prefix());
        Ok(Self {
            group_id,
            config,
            sources,
            actions,
            shared: Arc::new(Shared {
                active: Mutex::new(None),
                gate: Mutex::new(ConfirmationGate::new()),
                core: Mutex::new(core),
            }),
        })
    }

    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    pub fn config(&self) -> &InviteListConfig {
        &self.config
    }

    /// Current Confirmation Gate state.
    pub fn gate_state(&self) -> GateState {
        self.shared.gate.lock().state()
    }

    /// Whether a subscription is live.
    pub fn has_subscription(&self) -> bool {
        self.shared.active.lock().is_some()
    }

    fn group_title(&self) -> String {
        self.shared
            .core
            .lock()
            .latest
            .group()
            .map(|g| g.title.clone())
            .unwrap_or_default()
    }

    async fn confirm_and_add(
        &self,
        peer_id: PeerId,
        display_name: &str,
        pending: PendingSelection<'_>,
    ) -> InviteResult<bool> {
        let message = self
            .config
            .render_confirmation(display_name, &self.group_title());
        metrics::record_confirmation_prompt();
        debug!(peer_id = %peer_id, "Requesting add-to-group confirmation");

        let confirmed = self
            .actions
            .prompt
            .request_confirmation(&message, &self.config.confirm_ok_label)
            .await;

        if !confirmed {
            pending.resolve(GateEvent::Decline);
            info!(peer_id = %peer_id, "Selection declined");
            metrics::record_selection("declined");
            return Ok(false);
        }
        if !pending.step(GateEvent::Confirm) {
            info!(peer_id = %peer_id, "Selection cancelled by teardown");
            metrics::record_selection("cancelled");
            return Ok(false);
        }

        match self.actions.members.add_member(self.group_id, peer_id).await {
            Ok(()) => {
                pending.resolve(GateEvent::AddSucceeded);
                info!(peer_id = %peer_id, group_id = %self.group_id, "Contact added to group, selection accepted");
                metrics::record_selection("accepted");
                Ok(true)
            }
            Err(err) => {
                pending.resolve(GateEvent::AddFailed);
                warn!(peer_id = %peer_id, group_id = %self.group_id, error = %err, "Add-member failed");
                metrics::record_selection("failed");
                Err(match err {
                    failed @ InviteError::AddMemberFailed { .. } => failed,
                    other => InviteError::AddMemberFailed {
                        group_id: self.group_id,
                        peer_id,
                        reason: other.to_string(),
                    },
                })
            }
        }
    }
}

#[async_trait]
impl InviteListApi for InviteListService {
    fn subscribe(&self, queries: LiveSequence<SearchQuery>) -> InviteListSubscription {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.config.result_buffer);
        let manager = SourceSubscriptionManager::open(self.sources.clone());

        let mut active = self.shared.active.lock();
        if let Some(previous) = active.take() {
            previous.task.abort();
            self.shared.gate.lock().process_event(GateEvent::Teardown);
            metrics::subscription_released();
            info!(subscription = %previous.id, "Invite list subscription superseded");
        }
        *self.shared.core.lock() = CoreState::new(
            Some(id),
            self.config.section_labels(),
            self.sources.invite_link.resolving_prefix(),
        );

        let task = tokio::spawn(run_subscription(
            Arc::clone(&self.shared),
            id,
            manager,
            queries,
            tx,
        ));
        *active = Some(ActiveSubscription {
            id,
            task: task.abort_handle(),
        });
        metrics::subscription_opened();
        info!(subscription = %id, group_id = %self.group_id, "Invite list subscription opened");

        InviteListSubscription {
            shared: Arc::clone(&self.shared),
            id,
            results: ReceiverStream::new(rx),
            task,
        }
    }

    async fn select_peer(&self, peer_id: PeerId) -> InviteResult<bool> {
        let begun = {
            let mut gate = self.shared.gate.lock();
            let core = self.shared.core.lock();
            gate.begin(peer_id, &core.cache).map(|d| (d, gate.epoch()))
        };
        let Some((decision, epoch)) = begun else {
            warn!(peer_id = %peer_id, "Selection rejected, another selection in progress");
            metrics::record_selection("busy");
            return Err(InviteError::SelectionInProgress { peer_id });
        };

        let pending = PendingSelection::new(&self.shared.gate, epoch);
        match decision {
            SelectionDecision::AcceptImmediately => {
                pending.settle();
                info!(peer_id = %peer_id, "Selection accepted");
                metrics::record_selection("accepted");
                Ok(true)
            }
            SelectionDecision::RequireConfirmation { contact } => {
                self.confirm_and_add(peer_id, &contact.display_name, pending)
                    .await
            }
        }
    }

    async fn select_peers(&self, peer_ids: &[PeerId]) -> InviteResult<bool> {
        if peer_ids.len() > self.config.selection_limit {
            debug!(
                selected = peer_ids.len(),
                limit = self.config.selection_limit,
                "Selection truncated to limit"
            );
        }
        for peer_id in peer_ids.iter().take(self.config.selection_limit) {
            if !self.select_peer(*peer_id).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn is_contact(&self, peer_id: PeerId) -> bool {
        self.shared.core.lock().cache.is_contact(&peer_id)
    }

    fn copy_invite_link(&self) -> Option<String> {
        let link = {
            let core = self.shared.core.lock();
            match core.latest.query() {
                Some(query) if query.is_empty() => core.latest.invite_link().map(str::to_string),
                _ => None,
            }
        }?;
        self.actions.clipboard.copy_text(&link);
        info!("Invite link copied");
        Some(link)
    }
}
