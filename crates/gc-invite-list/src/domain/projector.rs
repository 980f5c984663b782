//! Result Projector: candidate lists → ordered entry sequence.
//!
//! ## Entry Order
//!
//! ```text
//! [InviteLink]                      only if query is empty and a link is resolved
//! [SectionHeader(members)]          only if members is non-empty
//! [CandidateRow ...members]
//! [SectionHeader(contacts)]         only if contacts is non-empty
//! [CandidateRow ...contacts]
//! ```
//!
//! If nothing would be emitted the sequence is exactly `[EmptyPlaceholder]`.
//! Headers and rows share one ordinal counter; the invite link takes none.

use super::candidate::{Candidate, CandidateLists};
use serde::Serialize;
use shared_types::SearchQuery;

/// One row of the invite list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    /// Copy-invite-link action row.
    InviteLink { url: String },
    /// Section header.
    SectionHeader { label: String, index: u32 },
    /// A selectable candidate; disabled rows are shown but not selectable.
    CandidateRow {
        candidate: Candidate,
        index: u32,
        enabled: bool,
    },
    /// Shown when there is nothing else to show.
    EmptyPlaceholder,
}

/// Output of one recompute cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    /// Entries in display order.
    pub entries: Vec<Entry>,
    /// Whether the query differs from the one behind the previous result.
    pub search_changed: bool,
}

impl AggregationResult {
    /// Whether this result is the empty placeholder alone.
    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self.entries.as_slice(), [Entry::EmptyPlaceholder])
    }

    /// Candidates in display order.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().filter_map(|e| match e {
            Entry::CandidateRow { candidate, .. } => Some(candidate),
            _ => None,
        })
    }
}

/// Section header labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLabels {
    pub members: String,
    pub contacts: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            members: "Members".to_string(),
            contacts: "Contacts".to_string(),
        }
    }
}

/// Build the ordered entry sequence. Pure.
pub fn build_entries(
    lists: &CandidateLists,
    invite_link: Option<&str>,
    query: &SearchQuery,
    labels: &SectionLabels,
) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(lists.len() + 3);
    let mut index: u32 = 0;

    if let (Some(url), true) = (invite_link, query.is_empty()) {
        entries.push(Entry::InviteLink {
            url: url.to_string(),
        });
    }

    for (label, section) in [(&labels.members, &lists.members), (&labels.contacts, &lists.contacts)] {
        if section.is_empty() {
            continue;
        }
        entries.push(Entry::SectionHeader {
            label: label.clone(),
            index,
        });
        index += 1;
        for candidate in section {
            entries.push(Entry::CandidateRow {
                candidate: candidate.clone(),
                index,
                enabled: candidate.enabled,
            });
            index += 1;
        }
    }

    if entries.is_empty() {
        entries.push(Entry::EmptyPlaceholder);
    }
    entries
}

/// Projector carrying the query behind the previous result.
#[derive(Debug, Clone)]
pub struct ResultProjector {
    previous_query: SearchQuery,
    labels: SectionLabels,
}

impl ResultProjector {
    /// Projector whose previous query is the empty query.
    pub fn new(labels: SectionLabels) -> Self {
        Self {
            previous_query: SearchQuery::empty(),
            labels,
        }
    }

    /// Project one cycle and advance the previous query.
    pub fn project(
        &mut self,
        lists: &CandidateLists,
        invite_link: Option<&str>,
        query: &SearchQuery,
    ) -> AggregationResult {
        let entries = build_entries(lists, invite_link, query, &self.labels);
        let search_changed = self.previous_query != *query;
        self.previous_query = query.clone();
        AggregationResult {
            entries,
            search_changed,
        }
    }

    /// Query behind the previous result.
    pub fn previous_query(&self) -> &SearchQuery {
        &self.previous_query
    }
}

impl Default for ResultProjector {
    fn default() -> Self {
        Self::new(SectionLabels::default())
    }
}
