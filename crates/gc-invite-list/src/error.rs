//! Error types for the invite-list subsystem.

use shared_types::{GroupId, PeerId};
use thiserror::Error;

/// Invite-list subsystem errors.
///
/// Source sequences never fail; every variant here originates at an action
/// boundary (add-member, selection) or at configuration time.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InviteError {
    /// The external add-member action failed after the user confirmed.
    #[error("Failed to add peer {peer_id} to group {group_id}: {reason}")]
    AddMemberFailed {
        group_id: GroupId,
        peer_id: PeerId,
        reason: String,
    },

    /// Another selection is still waiting on confirmation or add-member.
    #[error("Selection of peer {peer_id} rejected: another selection is in progress")]
    SelectionInProgress { peer_id: PeerId },

    /// The result stream ended before a value arrived.
    #[error("Invite list stream closed")]
    StreamClosed,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for invite-list operations.
pub type InviteResult<T> = Result<T, InviteError>;
