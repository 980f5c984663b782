//! Driving Ports (API - Inbound)

use crate::error::InviteResult;
use crate::service::InviteListSubscription;
use async_trait::async_trait;
use shared_bus::LiveSequence;
use shared_types::{PeerId, SearchQuery};

/// Primary Invite List API
///
/// This is the driving port for the invite-list subsystem. A consumer
/// subscribes once with its search-query sequence and selects peers from the
/// entries it receives.
#[async_trait]
pub trait InviteListApi: Send + Sync {
    /// Subscribe with a search-query sequence.
    ///
    /// # Returns
    /// A live sequence of `AggregationResult`. Dropping it releases every
    /// upstream subscription and returns the Confirmation Gate to idle.
    fn subscribe(&self, queries: LiveSequence<SearchQuery>) -> InviteListSubscription;

    /// Select a peer from the list.
    ///
    /// # Returns
    /// * `Ok(true)` - selection accepted
    /// * `Ok(false)` - user declined, or the subscription went away mid-prompt
    ///
    /// # Errors
    /// * `AddMemberFailed` - the user confirmed but the add-member action failed
    /// * `SelectionInProgress` - another selection is still pending
    async fn select_peer(&self, peer_id: PeerId) -> InviteResult<bool>;

    /// Select several peers; only the first `selection_limit` are offered.
    async fn select_peers(&self, peer_ids: &[PeerId]) -> InviteResult<bool>;

    /// Whether `peer_id` was listed in the latest Contacts candidates.
    fn is_contact(&self, peer_id: PeerId) -> bool;

    /// Copy the shown invite link to the clipboard.
    ///
    /// # Returns
    /// The copied link, or `None` if no link entry is currently shown.
    fn copy_invite_link(&self) -> Option<String>;
}
