//! Confirmation Gate
//!
//! Decides whether selecting a peer needs the user to confirm adding that
//! peer to the call's group first.
//!
//! State Machine:
//! ```text
//! [IDLE] ──select──→ [SELECTED] ──not contact──→ [ACCEPTED] ──settle──→ [IDLE]
//!                         │
//!                         └── is contact ──→ [CONFIRM_PENDING] ──decline──→ [CANCELLED] ──settle──→ [IDLE]
//!                                                  │
//!                                                  └── confirm ──→ [CONFIRMED] ──add ok──→ [ACCEPTED]
//!                                                                       │
//!                                                                       └── add failed ──→ [CANCELLED]
//!
//! any state ──teardown──→ [IDLE]  (epoch advances; in-flight selections become stale)
//! ```
//!
//! Transitions are deterministic; events that do not apply to the current
//! state leave it unchanged.

use super::cache::ContactMembershipCache;
use shared_types::{Peer, PeerId};

/// Gate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GateState {
    /// No selection in progress.
    #[default]
    Idle,
    /// A peer was selected; contact status not yet checked.
    Selected(PeerId),
    /// Waiting for the user to confirm adding the contact to the group.
    ConfirmPending(PeerId),
    /// Confirmed; waiting for the add-member action.
    Confirmed(PeerId),
    /// Selection accepted.
    Accepted(PeerId),
    /// Selection declined, cancelled, or add-member failed.
    Cancelled(PeerId),
}

/// Events driving the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateEvent {
    /// User selected a peer.
    Select(PeerId),
    /// Selected peer is not in the Contact Membership Cache.
    NotContact,
    /// Selected peer is in the Contact Membership Cache.
    IsContact,
    /// User confirmed.
    Confirm,
    /// User declined or dismissed.
    Decline,
    /// Add-member action succeeded.
    AddSucceeded,
    /// Add-member action failed.
    AddFailed,
    /// Terminal outcome delivered; return to idle.
    Settle,
    /// Consumer went away.
    Teardown,
}

/// What a selection needs before it can be accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionDecision {
    /// Not a contact: accept with no further action.
    AcceptImmediately,
    /// A contact outside the group: ask, then add to the group.
    RequireConfirmation { contact: Peer },
}

impl SelectionDecision {
    /// Classify `peer_id` against the cache.
    pub fn classify(cache: &ContactMembershipCache, peer_id: &PeerId) -> Self {
        match cache.peer(peer_id) {
            Some(contact) => Self::RequireConfirmation {
                contact: contact.clone(),
            },
            None => Self::AcceptImmediately,
        }
    }
}

/// Confirmation Gate.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    state: GateState,
    /// Advanced on every teardown.
    epoch: u64,
    accepted: u64,
    cancelled: u64,
}

impl ConfirmationGate {
    /// Idle gate at epoch 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a selection is between `Select` and its terminal outcome.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            GateState::Selected(_) | GateState::ConfirmPending(_) | GateState::Confirmed(_)
        )
    }

    /// Selections accepted so far.
    pub fn accepted_count(&self) -> u64 {
        self.accepted
    }

    /// Selections cancelled so far.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }

    /// Process an event and transition state.
    pub fn process_event(&mut self, event: GateEvent) -> GateState {
        let new_state = self.next_state(event);

        if new_state != self.state {
            match new_state {
                GateState::Accepted(_) => self.accepted += 1,
                GateState::Cancelled(_) => self.cancelled += 1,
                _ => {}
            }
        }
        if event == GateEvent::Teardown {
            self.epoch += 1;
        }

        self.state = new_state;
        new_state
    }

    /// Pure transition function.
    fn next_state(&self, event: GateEvent) -> GateState {
        match (self.state, event) {
            (_, GateEvent::Teardown) => GateState::Idle,

            (
                GateState::Idle | GateState::Accepted(_) | GateState::Cancelled(_),
                GateEvent::Select(peer_id),
            ) => GateState::Selected(peer_id),

            (GateState::Selected(peer_id), GateEvent::NotContact) => GateState::Accepted(peer_id),
            (GateState::Selected(peer_id), GateEvent::IsContact) => {
                GateState::ConfirmPending(peer_id)
            }

            (GateState::ConfirmPending(peer_id), GateEvent::Confirm) => {
                GateState::Confirmed(peer_id)
            }
            (GateState::ConfirmPending(peer_id), GateEvent::Decline) => {
                GateState::Cancelled(peer_id)
            }

            (GateState::Confirmed(peer_id), GateEvent::AddSucceeded) => {
                GateState::Accepted(peer_id)
            }
            (GateState::Confirmed(peer_id), GateEvent::AddFailed) => {
                GateState::Cancelled(peer_id)
            }

            (GateState::Accepted(_) | GateState::Cancelled(_), GateEvent::Settle) => {
                GateState::Idle
            }

            (state, _) => state,
        }
    }

    /// Start a selection and classify it against the cache.
    ///
    /// # Returns
    ///
    /// `None` if another selection is in progress (state unchanged).
    pub fn begin(
        &mut self,
        peer_id: PeerId,
        cache: &ContactMembershipCache,
    ) -> Option<SelectionDecision> {
        if self.is_busy() {
            return None;
        }
        self.process_event(GateEvent::Select(peer_id));
        let decision = SelectionDecision::classify(cache, &peer_id);
        match decision {
            SelectionDecision::AcceptImmediately => self.process_event(GateEvent::NotContact),
            SelectionDecision::RequireConfirmation { .. } => {
                self.process_event(GateEvent::IsContact)
            }
        };
        Some(decision)
    }

    /// Apply `event` only if no teardown happened since `epoch`.
    ///
    /// # Returns
    ///
    /// `false` if the selection went stale; the event was not applied.
    pub fn advance(&mut self, epoch: u64, event: GateEvent) -> bool {
        if self.epoch != epoch {
            return false;
        }
        self.process_event(event);
        true
    }

    /// Return to idle after a selection was dropped mid-flight.
    pub fn abandon(&mut self, epoch: u64) {
        if self.epoch == epoch && self.is_busy() {
            let peer_id = match self.state {
                GateState::Selected(p) | GateState::ConfirmPending(p) | GateState::Confirmed(p) => p,
                _ => return,
            };
            self.state = GateState::Cancelled(peer_id);
            self.cancelled += 1;
            self.process_event(GateEvent::Settle);
        }
    }
}
