//! Ports module for the invite-list subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::InviteListApi;
pub use outbound::{
    CallParticipantsSource, Clipboard, ConfirmationPrompt, ContactsSource, GroupInfoSource,
    InviteActions, InviteLinkSource, InviteSources, InvitedPeersSource, MemberGateway,
    RecentMembersSource,
};
