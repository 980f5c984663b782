//! Recorded session fixtures.

use anyhow::{Context, Result};
use serde::Deserialize;
use shared_types::{ContactList, GroupInfo, PeerId, RenderedParticipant};
use std::path::Path;

/// Source values and user actions of one invite-list session.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// The call's underlying group.
    pub group: GroupInfo,

    /// Group roster in roster order.
    #[serde(default)]
    pub recent_members: Vec<RenderedParticipant>,

    /// The viewer's contacts.
    #[serde(default)]
    pub contacts: ContactList,

    /// Peers in the call; absent while the call has not reported them.
    #[serde(default)]
    pub participants: Option<Vec<PeerId>>,

    /// Peers already invited.
    #[serde(default)]
    pub invited: Vec<PeerId>,

    /// Answers given to confirmation prompts, in order.
    #[serde(default)]
    pub confirmations: Vec<bool>,

    /// Failure reason returned by every add-member call, if any.
    #[serde(default)]
    pub add_member_failure: Option<String>,

    /// User actions, replayed in order.
    pub steps: Vec<SessionStep>,
}

/// One user action.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionStep {
    /// Search text typed before this step.
    #[serde(default)]
    pub query: String,

    /// Peers selected after the result for `query` arrived.
    #[serde(default)]
    pub select: Vec<PeerId>,

    /// Whether the invite-link entry is tapped.
    #[serde(default)]
    pub copy_link: bool,
}

impl Session {
    /// Parse a session from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let session: Self = serde_json::from_str(text).context("Malformed session fixture")?;
        anyhow::ensure!(!session.steps.is_empty(), "Session has no steps");
        Ok(session)
    }

    /// Load a session from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session fixture {}", path.display()))?;
        Self::from_json(&text)
    }
}
