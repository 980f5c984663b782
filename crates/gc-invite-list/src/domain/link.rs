//! Invite link resolution from group info.

use shared_types::GroupInfo;

/// Resolve the link shown at the top of the invite list.
///
/// A public group links by its address name; a private one by its exported
/// invitation. Groups with neither have no link.
pub fn resolve_invite_link(group: &GroupInfo, prefix: &str) -> Option<String> {
    match group.address_name.as_deref() {
        Some(name) if !name.is_empty() => Some(format!("{prefix}{name}")),
        _ => group
            .exported_invitation
            .as_ref()
            .filter(|link| !link.is_empty())
            .cloned(),
    }
}
