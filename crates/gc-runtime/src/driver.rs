//! Session replay.
//!
//! Feeds a recorded session into in-memory sources, drives the invite list
//! through its public API and collects one JSON record per observable
//! outcome.

use crate::session::Session;
use anyhow::{Context, Result};
use gc_invite_list::adapters::{MemorySources, RecordedActions, RecordingMemberGateway, ScriptedPrompt};
use gc_invite_list::{InviteListApi, InviteListConfig, InviteListService};
use gc_telemetry::{log_event, log_peer_event};
use serde_json::{json, Value};
use shared_bus::FeedPublisher;
use shared_types::{InvitedSet, ParticipantSet, SearchQuery};
use std::time::Duration;
use tokio::time::timeout;

/// Replay `session`, waiting at most `wait` for each result.
///
/// # Returns
///
/// One record per result, link copy and selection, in order. Every step
/// publishes its query and yields a result, even when the query repeats.
pub async fn replay(session: Session, config: InviteListConfig, wait: Duration) -> Result<Vec<Value>> {
    let memory = MemorySources::new();
    memory.group.publish(session.group.clone());
    memory.recent_members.publish(session.recent_members);
    memory.contacts.publish(session.contacts);
    memory.participants.publish(
        session
            .participants
            .map(|ids| ids.into_iter().collect::<ParticipantSet>()),
    );
    memory
        .invited
        .publish(session.invited.into_iter().collect::<InvitedSet>());

    let members = match session.add_member_failure {
        Some(reason) => RecordingMemberGateway::failing(reason),
        None => RecordingMemberGateway::new(),
    };
    let recorded = RecordedActions::new(ScriptedPrompt::new(session.confirmations), members);

    let service = InviteListService::new(
        session.group.id,
        config.clone(),
        memory.sources(&config.invite_link_prefix),
        recorded.actions(),
    )
    .context("Failed to build invite list service")?;

    let queries = FeedPublisher::new("query");
    let mut results = service.subscribe(queries.sequence());
    let mut records = Vec::new();

    for (index, step) in session.steps.iter().enumerate() {
        queries.publish(SearchQuery::new(step.query.clone()));
        let result = timeout(wait, results.recv())
            .await
            .with_context(|| format!("No result for step {index} within {wait:?}"))??;
        log_event!(
            debug,
            "runtime",
            "Result received",
            step = index,
            entries = result.entries.len(),
            search_changed = result.search_changed
        );
        records.push(json!({ "step": index, "result": result }));

        if step.copy_link {
            let copied = service.copy_invite_link();
            records.push(json!({ "step": index, "copied": copied }));
        }

        if let Some(&offered) = step.select.first() {
            let record = match service.select_peers(&step.select).await {
                Ok(accepted) => {
                    log_peer_event!(info, "runtime", "Selection replayed", offered, step = index, accepted);
                    json!({ "step": index, "select": step.select, "accepted": accepted })
                }
                Err(err) => {
                    log_peer_event!(warn, "runtime", "Selection failed", offered, step = index, error = %err);
                    json!({ "step": index, "select": step.select, "error": err.to_string() })
                }
            };
            records.push(record);
        }
    }

    log_event!(
        info,
        "runtime",
        "Session replayed",
        steps = session.steps.len(),
        records = records.len(),
        add_member_calls = recorded.members.calls().len()
    );
    Ok(records)
}
