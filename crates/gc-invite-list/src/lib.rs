//! # gc-invite-list
//!
//! The "who can be invited" list of a group call, fused live from the
//! group roster, the viewer's contacts, the call's participants and the
//! peers already invited.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Aggregator**: Members and Contacts candidate lists, de-duplicated
//! - **Contact Membership Cache**: which candidates are contacts outside the group
//! - **Result Projector**: ordered entries with section headers and the invite link
//! - **Confirmation Gate**: confirm-then-add flow for contacts outside the group
//!
//! ## Architecture
//!
//! ```text
//! Contacts ────────┐
//! RecentMembers ───┤
//! CallParticipants ┼──→ SourceSubscriptionManager ──→ LatestValues ──→ aggregate()
//! InvitedSet ──────┤        (combine-latest)                              │
//! GroupInfo/Link ──┘                                   ContactMembershipCache ←┤
//!                                                                          ▼
//! SearchQuery ──→ re-issue query-scoped fetches             ResultProjector ──→ AggregationResult
//!
//! select_peer ──→ ConfirmationGate ──→ ConfirmationPrompt ──→ MemberGateway
//! ```
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | No peer in both sections | `aggregate` |
//! | No call participant listed | `aggregate` |
//! | `enabled == !invited` | `Candidate` constructors |
//! | Nothing emitted until every source delivered | `LatestValues::snapshot` |
//! | `[EmptyPlaceholder]` when nothing to show | `build_entries` |
//! | At most one add-member call per confirmed selection | `ConfirmationGate` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use gc_invite_list::{InviteListApi, InviteListConfig, InviteListService};
//!
//! let service = InviteListService::new(group_id, InviteListConfig::default(), sources, actions)?;
//! let mut results = service.subscribe(queries);
//!
//! while let Some(result) = results.next().await {
//!     render(&result.entries);
//! }
//!
//! let accepted = service.select_peer(peer_id).await?;
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{SourceSubscriptionManager, SourceUpdate};
pub use config::InviteListConfig;
pub use domain::{
    aggregate, build_entries, resolve_invite_link, AggregationResult, Candidate, CandidateLists,
    ConfirmationGate, ContactMembershipCache, Entry, GateEvent, GateState, LatestValues,
    ResultProjector, SectionLabels, SelectionDecision, SourceSnapshot,
};
pub use error::{InviteError, InviteResult};
pub use ports::inbound::InviteListApi;
pub use ports::outbound::{
    CallParticipantsSource, Clipboard, ConfirmationPrompt, ContactsSource, GroupInfoSource,
    InviteActions, InviteLinkSource, InviteLinkSupply, InviteSources, InvitedPeersSource,
    MemberGateway, RecentMembersSource,
};
pub use service::{InviteListService, InviteListSubscription};
