//! Invite-list configuration.
//!
//! Loaded from TOML, overridden from the environment, validated before the
//! service is built.

use crate::error::{InviteError, InviteResult};
use crate::domain::SectionLabels;
use serde::Deserialize;
use std::env;

/// Placeholder replaced by the selected contact's display name.
pub const USER_PLACEHOLDER: &str = "{user}";

/// Placeholder replaced by the group title.
pub const GROUP_PLACEHOLDER: &str = "{group}";

/// Configuration for the invite-list service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InviteListConfig {
    /// Header label of the group-members section.
    pub members_label: String,

    /// Header label of the contacts section.
    pub contacts_label: String,

    /// Confirmation text; `{user}` and `{group}` are substituted.
    pub confirm_template: String,

    /// Label of the affirmative confirmation button.
    pub confirm_ok_label: String,

    /// Prefix joined with a public group username to form the invite link.
    pub invite_link_prefix: String,

    /// Capacity of the result channel between the recompute task and the consumer.
    pub result_buffer: usize,

    /// Maximum peers considered per selection.
    pub selection_limit: usize,
}

impl Default for InviteListConfig {
    fn default() -> Self {
        Self {
            members_label: "Members".to_string(),
            contacts_label: "Contacts".to_string(),
            confirm_template: "{user} is not a member of {group}. Add them to the group first?"
                .to_string(),
            confirm_ok_label: "Add".to_string(),
            invite_link_prefix: "https://t.me/@".to_string(),
            result_buffer: 16,
            selection_limit: 1,
        }
    }
}

impl InviteListConfig {
    /// Parse configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> InviteResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| InviteError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GC_MEMBERS_LABEL`: Members section header
    /// - `GC_CONTACTS_LABEL`: Contacts section header
    /// - `GC_CONFIRM_OK_LABEL`: Confirmation button label
    /// - `GC_INVITE_LINK_PREFIX`: Public invite link prefix
    /// - `GC_RESULT_BUFFER`: Result channel capacity
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(label) = env::var("GC_MEMBERS_LABEL") {
            self.members_label = label;
        }
        if let Ok(label) = env::var("GC_CONTACTS_LABEL") {
            self.contacts_label = label;
        }
        if let Ok(label) = env::var("GC_CONFIRM_OK_LABEL") {
            self.confirm_ok_label = label;
        }
        if let Ok(prefix) = env::var("GC_INVITE_LINK_PREFIX") {
            self.invite_link_prefix = prefix;
        }
        if let Some(buffer) = env::var("GC_RESULT_BUFFER")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.result_buffer = buffer;
        }
        self
    }

    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> InviteResult<()> {
        if self.result_buffer == 0 {
            return Err(InviteError::Config("result_buffer must be non-zero".into()));
        }
        if self.selection_limit == 0 {
            return Err(InviteError::Config("selection_limit must be non-zero".into()));
        }
        if self.members_label.is_empty() || self.contacts_label.is_empty() {
            return Err(InviteError::Config("section labels must be non-empty".into()));
        }
        if !self.confirm_template.contains(USER_PLACEHOLDER) {
            return Err(InviteError::Config(format!(
                "confirm_template must contain {USER_PLACEHOLDER}"
            )));
        }
        Ok(())
    }

    /// Section header labels for the projector.
    pub fn section_labels(&self) -> SectionLabels {
        SectionLabels {
            members: self.members_label.clone(),
            contacts: self.contacts_label.clone(),
        }
    }

    /// Confirmation text naming the target user and the destination group.
    ///
    /// Placeholders are substituted in a single pass over the template;
    /// braces inside `user` or `group` are copied verbatim.
    pub fn render_confirmation(&self, user: &str, group: &str) -> String {
        let template = self.confirm_template.as_str();
        let mut out = String::with_capacity(template.len() + user.len() + group.len());
        let mut rest = template;
        while let Some(start) = rest.find('{') {
            let (before, tail) = rest.split_at(start);
            out.push_str(before);
            if let Some(after) = tail.strip_prefix(USER_PLACEHOLDER) {
                out.push_str(user);
                rest = after;
            } else if let Some(after) = tail.strip_prefix(GROUP_PLACEHOLDER) {
                out.push_str(group);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}
