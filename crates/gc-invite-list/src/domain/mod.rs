//! # Domain Layer - Invite List
//!
//! Pure business logic. Nothing in this module awaits, locks or logs
//! above `trace` level; every function computes synchronously over the
//! values it is given.
//!
//! ## Components
//!
//! - `candidate`: Candidate, CandidateLists
//! - `snapshot`: SourceSnapshot and the combine-latest `LatestValues`
//! - `aggregator`: Members/Contacts candidate derivation
//! - `link`: invite link resolution from group info
//! - `cache`: Contact Membership Cache
//! - `projector`: Entry sequence, searchChanged
//! - `gate`: Confirmation Gate state machine

pub mod aggregator;
pub mod cache;
pub mod candidate;
pub mod gate;
pub mod link;
pub mod projector;
pub mod snapshot;

pub use aggregator::aggregate;
pub use cache::ContactMembershipCache;
pub use candidate::{Candidate, CandidateLists};
pub use gate::{ConfirmationGate, GateEvent, GateState, SelectionDecision};
pub use link::resolve_invite_link;
pub use projector::{build_entries, AggregationResult, Entry, ResultProjector, SectionLabels};
pub use snapshot::{LatestValues, SourceSnapshot};
