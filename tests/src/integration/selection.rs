//! # Selection Flows
//!
//! ```text
//! select_peer ──→ [Confirmation Gate] ──not a contact──→ accepted
//!                        │
//!                    is a contact
//!                        ↓
//!              RequestConfirmation ──declined──→ not accepted
//!                        │
//!                    confirmed
//!                        ↓
//!                   AddMember ──ok──→ accepted
//!                        └──err──→ AddMemberFailed
//! ```
//!
//! Teardown at any point returns the gate to `Idle` without an add-member call
//! and empties the Contact Membership Cache.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use gc_invite_list::adapters::{RecordingMemberGateway, ScriptedPrompt};
    use gc_invite_list::{
        GateState, InviteError, InviteListApi, InviteListConfig, InviteListSubscription,
    };
    use shared_types::PeerId;
    use std::sync::Arc;
    use tokio::time::timeout;

    async fn ready(
        prompt: ScriptedPrompt,
        members: RecordingMemberGateway,
    ) -> (Harness, InviteListSubscription) {
        ready_with(InviteListConfig::default(), prompt, members).await
    }

    /// Harness with Ann as a member, Bob and Dave as contacts, and a live
    /// subscription that has delivered its first result.
    async fn ready_with(
        config: InviteListConfig,
        prompt: ScriptedPrompt,
        members: RecordingMemberGateway,
    ) -> (Harness, InviteListSubscription) {
        let h = Harness::build(config, prompt, members, RosterMode::Live);
        h.seed(vec![ann()], vec![bob(), dave()], &[]);
        let mut sub = h.subscribe("");
        next_result(&mut sub).await;
        (h, sub)
    }

    #[tokio::test]
    async fn test_member_accepted_without_prompt() {
        let (h, _sub) = ready(ScriptedPrompt::new([]), RecordingMemberGateway::new()).await;

        assert_eq!(h.service.select_peer(PeerId(1)).await, Ok(true));
        assert_eq!(h.recorded.prompt.times_shown(), 0);
        assert!(h.recorded.members.calls().is_empty());
        assert_eq!(h.service.gate_state(), GateState::Idle);
    }

    #[tokio::test]
    async fn test_declined_contact_not_added() {
        let (h, _sub) = ready(ScriptedPrompt::new([false]), RecordingMemberGateway::new()).await;

        assert_eq!(h.service.select_peer(PeerId(2)).await, Ok(false));
        assert_eq!(
            h.recorded.prompt.shown(),
            vec![(
                "Bob is not a member of Chess Club. Add them to the group first?".to_string(),
                "Add".to_string()
            )]
        );
        assert!(h.recorded.members.calls().is_empty());
        assert_eq!(h.service.gate_state(), GateState::Idle);
    }

    #[tokio::test]
    async fn test_confirmed_contact_added_once() {
        let (h, _sub) = ready(ScriptedPrompt::new([true]), RecordingMemberGateway::new()).await;

        assert_eq!(h.service.select_peer(PeerId(2)).await, Ok(true));
        assert_eq!(h.recorded.members.calls(), vec![(GROUP, PeerId(2))]);
        assert_eq!(h.service.gate_state(), GateState::Idle);
    }

    #[tokio::test]
    async fn test_add_member_failure_returned() {
        let (h, _sub) = ready(
            ScriptedPrompt::new([true]),
            RecordingMemberGateway::failing("CHAT_MEMBER_ADD_FAILED"),
        )
        .await;

        let err = h.service.select_peer(PeerId(2)).await.unwrap_err();
        assert!(matches!(
            err,
            InviteError::AddMemberFailed { peer_id: PeerId(2), ref reason, .. }
                if reason == "CHAT_MEMBER_ADD_FAILED"
        ));
        assert_eq!(h.recorded.members.calls().len(), 1);
        assert_eq!(h.service.gate_state(), GateState::Idle);
        assert!(h.service.is_contact(PeerId(2)));
    }

    #[tokio::test]
    async fn test_configured_prompt_text() {
        let config = InviteListConfig::from_toml_str(
            r#"
            confirm_template = "Add {user} to {group}?"
            confirm_ok_label = "Invite"
            "#,
        )
        .unwrap();
        let (h, _sub) = ready_with(config, ScriptedPrompt::new([false]), RecordingMemberGateway::new()).await;

        h.service.select_peer(PeerId(4)).await.unwrap();
        assert_eq!(
            h.recorded.prompt.shown(),
            vec![("Add Dave to Chess Club?".to_string(), "Invite".to_string())]
        );
    }

    #[tokio::test]
    async fn test_second_selection_rejected_while_prompt_open() {
        let (h, _sub) = ready(ScriptedPrompt::held([true]), RecordingMemberGateway::new()).await;

        let service = Arc::clone(&h.service);
        let pending = tokio::spawn(async move { service.select_peer(PeerId(2)).await });
        wait_for_prompt(&h.recorded.prompt, 1).await;
        assert_eq!(h.service.gate_state(), GateState::ConfirmPending(PeerId(2)));

        assert_eq!(
            h.service.select_peer(PeerId(1)).await,
            Err(InviteError::SelectionInProgress { peer_id: PeerId(1) })
        );

        h.recorded.prompt.release();
        let outcome = timeout(WAIT, pending).await.unwrap().unwrap();
        assert_eq!(outcome, Ok(true));
        assert_eq!(h.service.select_peer(PeerId(1)).await, Ok(true));
    }

    #[tokio::test]
    async fn test_teardown_during_prompt_cancels_selection() {
        let h = Harness::new(ScriptedPrompt::held([true]), RecordingMemberGateway::new());
        h.seed(vec![ann()], vec![bob()], &[]);
        let mut sub = h.subscribe("");
        next_result(&mut sub).await;

        let service = Arc::clone(&h.service);
        let pending = tokio::spawn(async move { service.select_peer(PeerId(2)).await });
        wait_for_prompt(&h.recorded.prompt, 1).await;

        drop(sub);
        assert_eq!(h.service.gate_state(), GateState::Idle);

        h.recorded.prompt.release();
        let outcome = timeout(WAIT, pending).await.unwrap().unwrap();
        assert_eq!(outcome, Ok(false));
        assert!(h.recorded.members.calls().is_empty());
        assert_eq!(h.service.gate_state(), GateState::Idle);
    }

    #[tokio::test]
    async fn test_contact_forgotten_after_teardown() {
        let (h, sub) = ready(ScriptedPrompt::new([true]), RecordingMemberGateway::new()).await;
        assert!(h.service.is_contact(PeerId(2)));

        drop(sub);
        assert!(!h.service.is_contact(PeerId(2)));
        assert_eq!(h.service.select_peer(PeerId(2)).await, Ok(true));
        assert_eq!(h.recorded.prompt.times_shown(), 0);
        assert!(h.recorded.members.calls().is_empty());
    }

    #[tokio::test]
    async fn test_aborted_selection_frees_gate() {
        let (h, _sub) = ready(ScriptedPrompt::held([]), RecordingMemberGateway::new()).await;

        let service = Arc::clone(&h.service);
        let pending = tokio::spawn(async move { service.select_peer(PeerId(2)).await });
        wait_for_prompt(&h.recorded.prompt, 1).await;

        pending.abort();
        let _ = pending.await;
        assert_eq!(h.service.gate_state(), GateState::Idle);
        assert_eq!(h.service.select_peer(PeerId(1)).await, Ok(true));
    }

    #[tokio::test]
    async fn test_select_peers_honours_limit() {
        let (h, _sub) = ready(ScriptedPrompt::new([]), RecordingMemberGateway::new()).await;

        assert_eq!(h.service.select_peers(&[PeerId(1), PeerId(2)]).await, Ok(true));
        assert_eq!(h.recorded.prompt.times_shown(), 0);
    }

    #[tokio::test]
    async fn test_select_peers_stops_at_first_refusal() {
        let config = InviteListConfig {
            selection_limit: 3,
            ..Default::default()
        };
        let (h, _sub) = ready_with(config, ScriptedPrompt::new([false, true]), RecordingMemberGateway::new())
            .await;

        assert_eq!(
            h.service.select_peers(&[PeerId(2), PeerId(4)]).await,
            Ok(false)
        );
        assert_eq!(h.recorded.prompt.times_shown(), 1);
        assert!(h.recorded.members.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_selection_accepted() {
        let (h, _sub) = ready(ScriptedPrompt::new([]), RecordingMemberGateway::new()).await;
        assert_eq!(h.service.select_peers(&[]).await, Ok(true));
    }
}
