//! # Invite List Flows
//!
//! Drives live feeds through the service and checks every emitted
//! `AggregationResult`.
//!
//! ## Flows Tested
//!
//! 1. **Initial result**: nothing is emitted until every source delivered
//! 2. **Source update → recompute**: participants, invited, roster, group
//! 3. **Query change**: fetches re-issued, `search_changed` raised once; a
//!    repeated query recomputes from held values
//! 4. **Teardown**: dropping or superseding a subscription releases feeds

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use gc_invite_list::adapters::{RecordingMemberGateway, ScriptedPrompt};
    use gc_invite_list::{Candidate, Entry, InviteError, InviteListApi, InviteListConfig};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use shared_bus::FeedPublisher;
    use shared_types::{GroupInfo, InvitedSet, Peer, PeerId, RenderedParticipant};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    fn harness() -> Harness {
        Harness::new(ScriptedPrompt::new([]), RecordingMemberGateway::new())
    }

    // =========================================================================
    // Concrete scenarios
    // =========================================================================

    #[tokio::test]
    async fn test_link_members_and_invited_contact() {
        let h = harness();
        h.seed(vec![ann()], vec![bob()], &[2]);
        let mut sub = h.subscribe("");

        let result = next_result(&mut sub).await;
        let invited: InvitedSet = ids(&[2]);
        assert_eq!(
            result.entries,
            vec![
                Entry::InviteLink {
                    url: "https://t.me/x".into()
                },
                Entry::SectionHeader {
                    label: "Members".into(),
                    index: 0
                },
                Entry::CandidateRow {
                    candidate: Candidate::member(ann(), None, &invited),
                    index: 1,
                    enabled: true
                },
                Entry::SectionHeader {
                    label: "Contacts".into(),
                    index: 2
                },
                Entry::CandidateRow {
                    candidate: Candidate::contact(bob(), None, &invited),
                    index: 3,
                    enabled: false
                },
            ]
        );
        assert!(!result.search_changed);
    }

    #[tokio::test]
    async fn test_nothing_to_show_is_placeholder() {
        let h = harness();
        h.memory.group.publish(GroupInfo {
            exported_invitation: None,
            ..chess_club()
        });
        h.seed(vec![], vec![], &[]);
        let mut sub = h.subscribe("");

        let result = next_result(&mut sub).await;
        assert_eq!(result.entries, vec![Entry::EmptyPlaceholder]);
        assert!(result.is_empty_placeholder());
    }

    #[tokio::test]
    async fn test_peer_in_both_sources_listed_once_under_members() {
        let h = harness();
        h.seed(vec![ann()], vec![ann(), bob()], &[]);
        let mut sub = h.subscribe("");

        let result = next_result(&mut sub).await;
        assert_eq!(sections(&result), (vec![1], vec![2]));
    }

    #[tokio::test]
    async fn test_search_changed_once_per_query() {
        let h = harness();
        h.seed(vec![ann(), john()], vec![bob()], &[]);
        let mut sub = h.subscribe("");
        assert!(!next_result(&mut sub).await.search_changed);

        h.search("jo");
        let narrowed = next_result(&mut sub).await;
        assert!(narrowed.search_changed);
        assert_eq!(sections(&narrowed), (vec![5], vec![]));

        h.memory.invited.publish(ids(&[5]));
        let again = next_result(&mut sub).await;
        assert!(!again.search_changed);
        assert_eq!(again.candidates().next().map(|c| c.enabled), Some(false));
    }

    // =========================================================================
    // Source updates
    // =========================================================================

    #[tokio::test]
    async fn test_no_result_until_participants_reported() {
        let h = harness();
        h.seed(vec![ann()], vec![bob()], &[]);
        h.memory.participants.publish(None);
        let mut sub = h.subscribe("");
        assert_quiet(&mut sub).await;

        h.in_call(&[]);
        let result = next_result(&mut sub).await;
        assert_eq!(sections(&result), (vec![1], vec![2]));
    }

    #[tokio::test]
    async fn test_joining_call_removes_candidates() {
        let h = harness();
        h.seed(vec![ann(), carl()], vec![bob()], &[]);
        let mut sub = h.subscribe("");
        assert_eq!(sections(&next_result(&mut sub).await), (vec![1, 3], vec![2]));

        h.in_call(&[1, 2]);
        let result = next_result(&mut sub).await;
        assert_eq!(sections(&result), (vec![3], vec![]));
        assert!(!h.service.is_contact(PeerId(2)));
    }

    #[tokio::test]
    async fn test_bots_never_listed() {
        let h = harness();
        h.seed(vec![ann(), Peer::bot(9, "Helper")], vec![], &[]);
        let mut sub = h.subscribe("");

        let result = next_result(&mut sub).await;
        assert_eq!(sections(&result), (vec![1], vec![]));
    }

    #[tokio::test]
    async fn test_contacts_hidden_without_add_rights() {
        let h = harness();
        h.memory.group.publish(GroupInfo {
            can_add_members: false,
            ..chess_club()
        });
        h.seed(vec![ann()], vec![bob()], &[]);
        let mut sub = h.subscribe("");

        let result = next_result(&mut sub).await;
        assert_eq!(sections(&result), (vec![1], vec![]));
        assert!(!h.service.is_contact(PeerId(2)));
    }

    #[tokio::test]
    async fn test_link_hidden_while_searching() {
        let h = harness();
        h.seed(vec![ann()], vec![], &[]);
        let mut sub = h.subscribe("an");

        let result = next_result(&mut sub).await;
        assert!(!matches!(result.entries[0], Entry::InviteLink { .. }));
        assert_eq!(h.service.copy_invite_link(), None);
        assert!(h.recorded.clipboard.copied().is_empty());
    }

    #[tokio::test]
    async fn test_public_address_preferred_for_link() {
        let h = harness();
        h.memory.group.publish(GroupInfo {
            address_name: Some("chessclub".into()),
            ..chess_club()
        });
        h.seed(vec![], vec![], &[]);
        let mut sub = h.subscribe("");

        let result = next_result(&mut sub).await;
        assert_eq!(
            result.entries,
            vec![Entry::InviteLink {
                url: "https://t.me/@chessclub".into()
            }]
        );
        assert_eq!(
            h.service.copy_invite_link().as_deref(),
            Some("https://t.me/@chessclub")
        );
        assert_eq!(h.recorded.clipboard.copied(), vec!["https://t.me/@chessclub"]);
    }

    #[tokio::test]
    async fn test_unchanged_inputs_recompute_identically() {
        let h = harness();
        h.seed(vec![ann()], vec![bob()], &[]);
        let mut sub = h.subscribe("");
        let first = next_result(&mut sub).await;

        h.memory.invited.publish(ids(&[]));
        let second = next_result(&mut sub).await;
        assert_eq!(second, first);
        assert!(!second.search_changed);
    }

    #[tokio::test]
    async fn test_cache_follows_latest_contacts_only() {
        let h = harness();
        h.seed(vec![], vec![bob(), dave()], &[]);
        let mut sub = h.subscribe("");
        next_result(&mut sub).await;
        assert!(h.service.is_contact(PeerId(4)));

        h.search("bo");
        next_result(&mut sub).await;
        assert!(h.service.is_contact(PeerId(2)));
        assert!(!h.service.is_contact(PeerId(4)));
    }

    #[tokio::test]
    async fn test_repeated_query_recomputes_without_refetch() {
        let h = harness();
        h.seed(vec![ann(), john()], vec![bob()], &[]);
        let mut sub = h.subscribe("");
        next_result(&mut sub).await;

        h.search("jo");
        let narrowed = next_result(&mut sub).await;
        assert!(narrowed.search_changed);
        let contact_fetches = h.memory.contacts.subscriptions_opened();

        h.search("jo");
        let repeated = next_result(&mut sub).await;
        assert!(!repeated.search_changed);
        assert_eq!(repeated.entries, narrowed.entries);
        assert_eq!(h.memory.contacts.subscriptions_opened(), contact_fetches);
        assert_quiet(&mut sub).await;
    }

    #[tokio::test]
    async fn test_group_update_applied_in_one_step() {
        let h = harness();
        h.seed(vec![ann()], vec![bob()], &[]);
        let mut sub = h.subscribe("");
        let first = next_result(&mut sub).await;
        assert!(matches!(first.entries[0], Entry::InviteLink { .. }));
        assert_eq!(sections(&first), (vec![1], vec![2]));

        h.memory.group.publish(GroupInfo {
            exported_invitation: None,
            can_add_members: false,
            ..chess_club()
        });
        let updated = next_result(&mut sub).await;
        assert!(!matches!(updated.entries[0], Entry::InviteLink { .. }));
        assert_eq!(sections(&updated), (vec![1], vec![]));
        assert_quiet(&mut sub).await;
    }

    #[tokio::test]
    async fn test_separately_supplied_link_shown() {
        let link = Arc::new(FeedPublisher::with_value(
            "invite_link",
            Some("https://t.me/+club".to_string()),
        ));
        let h = Harness::with_link(link.clone());
        h.seed(vec![ann()], vec![], &[]);
        let mut sub = h.subscribe("");

        let result = next_result(&mut sub).await;
        assert_eq!(
            result.entries[0],
            Entry::InviteLink {
                url: "https://t.me/+club".into()
            }
        );

        link.publish(None);
        let unlinked = next_result(&mut sub).await;
        assert_eq!(sections(&unlinked), (vec![1], vec![]));
        assert!(!matches!(unlinked.entries[0], Entry::InviteLink { .. }));
    }

    #[tokio::test]
    async fn test_ready_roster_keeps_last_value_until_next_query() {
        let h = Harness::build(
            InviteListConfig::default(),
            ScriptedPrompt::new([]),
            RecordingMemberGateway::new(),
            RosterMode::ReadyOnce,
        );
        h.seed(vec![ann()], vec![bob()], &[]);
        let mut sub = h.subscribe("");
        assert_eq!(sections(&next_result(&mut sub).await).0, vec![1]);

        h.memory.recent_members.publish(vec![
            RenderedParticipant::new(ann()),
            RenderedParticipant::new(carl()),
        ]);
        assert_quiet(&mut sub).await;

        h.memory.invited.publish(ids(&[]));
        assert_eq!(sections(&next_result(&mut sub).await).0, vec![1]);

        h.search("a");
        let refetched = next_result(&mut sub).await;
        assert_eq!(sections(&refetched), (vec![1, 3], vec![]));
    }

    /// Invariants hold across a random walk of call and invite updates.
    #[tokio::test]
    async fn test_invariants_over_random_updates() {
        let mut rng = StdRng::seed_from_u64(0x6c1);
        let roster: Vec<Peer> = (1..=8).map(|id| Peer::new(id, format!("m{id}"))).collect();
        let contacts: Vec<Peer> = (5..=12).map(|id| Peer::new(id, format!("c{id}"))).collect();

        let h = harness();
        h.seed(roster, contacts, &[]);
        let mut sub = h.subscribe("");
        next_result(&mut sub).await;

        for _ in 0..25 {
            let in_call: Vec<i64> = (1..=12).filter(|_| rng.gen_bool(0.3)).collect();
            let invited: Vec<i64> = (1..=12).filter(|_| rng.gen_bool(0.3)).collect();
            let participants: HashSet<i64> = in_call.iter().copied().collect();
            let invited_set = ids(&invited);

            h.in_call(&in_call);
            next_result(&mut sub).await;
            h.memory.invited.publish(invited_set.clone());
            let result = next_result(&mut sub).await;

            let (members, contacts) = sections(&result);
            assert!(members.iter().all(|id| !contacts.contains(id)));
            assert!(members
                .iter()
                .chain(contacts.iter())
                .all(|id| !participants.contains(id)));
            for candidate in result.candidates() {
                assert_eq!(candidate.enabled, !invited_set.contains(&candidate.peer.id));
            }
            if members.is_empty() && contacts.is_empty() {
                assert_eq!(result.entries.len(), 1);
            }
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    #[tokio::test]
    async fn test_dropping_subscription_releases_feeds() {
        let h = harness();
        h.seed(vec![ann()], vec![bob()], &[]);
        let mut sub = h.subscribe("");
        next_result(&mut sub).await;
        assert!(h.memory.contacts.subscriber_count() > 0);

        drop(sub);
        assert!(!h.service.has_subscription());
        timeout(WAIT, async {
            while h.memory.contacts.subscriber_count() > 0
                || h.memory.participants.subscriber_count() > 0
            {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("feeds released");
    }

    #[tokio::test]
    async fn test_new_subscription_closes_previous() {
        let h = harness();
        h.seed(vec![ann()], vec![bob()], &[]);
        let mut first = h.subscribe("");
        next_result(&mut first).await;

        let mut second = h.service.subscribe(h.queries.sequence());
        next_result(&mut second).await;

        let closed = timeout(WAIT, first.recv()).await.expect("closed in time");
        assert_eq!(closed, Err(InviteError::StreamClosed));

        drop(first);
        assert!(h.service.has_subscription());
        h.memory.invited.publish(ids(&[1]));
        let result = next_result(&mut second).await;
        assert_eq!(result.candidates().next().map(|c| c.enabled), Some(false));
    }
}
