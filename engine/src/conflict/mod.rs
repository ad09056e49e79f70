//! Conflict detection and resolution between proposers.
//!
//! Several proposers may submit changes to the same file independently. A
//! conflict exists for a path when their proposed contents differ. Conflicts
//! are resolved either automatically ([`resolve_automatically`], which merges
//! hunks or falls back to the most recent whole-file change) or manually with
//! caller-supplied content through a [`ConflictResolver`].

pub mod merge;
pub mod resolver;
pub mod store;

pub use merge::merge_hunks;
pub use resolver::{ConflictResolver, Resolution};
pub use store::{ConflictStore, InMemoryConflictStore};

use chrono::{DateTime, Utc};
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

use crate::change::{ChangeType, FileChange};
use crate::error::ConflictError;

/// Identifies the agent or source that submitted a proposal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposerId(String);

impl ProposerId {
    /// Creates a new `ProposerId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProposerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictId(uuid::Uuid);

impl ConflictId {
    /// Creates a new unique conflict ID.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Creates a `ConflictId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    #[must_use]
    pub const fn inner(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for ConflictId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The changes one proposer submitted, with an optional ISO-8601 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposed file changes.
    pub changes: Vec<FileChange>,
    /// Submission time (RFC 3339). Missing means "oldest".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl Proposal {
    /// Creates an untimestamped proposal.
    #[must_use]
    pub const fn new(changes: Vec<FileChange>) -> Self {
        Self {
            changes,
            timestamp: None,
        }
    }

    /// Returns the proposal with its timestamp set.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Submission time; absent or unparsable timestamps rank as the epoch.
    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        let Some(raw) = self.timestamp.as_deref() else {
            return DateTime::<Utc>::UNIX_EPOCH;
        };
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(e) => {
                warn!(timestamp = raw, error = %e, "unparsable proposal timestamp, using epoch");
                DateTime::<Utc>::UNIX_EPOCH
            }
        }
    }

    fn for_path(&self, path: &str) -> Self {
        Self {
            changes: self
                .changes
                .iter()
                .filter(|c| c.path == path)
                .cloned()
                .collect(),
            timestamp: self.timestamp.clone(),
        }
    }
}

/// Lifecycle of a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStatus {
    /// Awaiting resolution.
    Pending,
    /// Resolved; `resolved_changes` holds the outcome.
    Resolved,
}

/// A conflict over one file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    /// Conflict identifier.
    pub id: ConflictId,
    /// Path every proposal in the record touches.
    pub file_path: String,
    /// Each proposer's changes to `file_path`.
    pub proposals: BTreeMap<ProposerId, Proposal>,
    /// Current status.
    pub status: ConflictStatus,
    /// Outcome once resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_changes: Option<Vec<FileChange>>,
    /// When the conflict was detected.
    pub created_at: DateTime<Utc>,
}

impl ConflictRecord {
    /// Creates a pending record.
    #[must_use]
    pub fn new(file_path: impl Into<String>, proposals: BTreeMap<ProposerId, Proposal>) -> Self {
        Self {
            id: ConflictId::new(),
            file_path: file_path.into(),
            proposals,
            status: ConflictStatus::Pending,
            resolved_changes: None,
            created_at: Utc::now(),
        }
    }

    /// Pre-edit content shared by the proposals, if any of them modify or
    /// delete an existing file.
    #[must_use]
    pub fn base_content(&self) -> Option<&str> {
        self.proposals
            .values()
            .flat_map(|p| &p.changes)
            .filter(|c| c.change_type != ChangeType::Create)
            .find_map(|c| c.original_content.as_deref())
    }

    /// Marks the record resolved with the given outcome.
    pub fn resolve(&mut self, changes: Vec<FileChange>) {
        self.status = ConflictStatus::Resolved;
        self.resolved_changes = Some(changes);
    }
}

/// One proposer's change to a path, with the proposal's rank.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'a> {
    pub(crate) proposer: &'a ProposerId,
    pub(crate) submitted_at: DateTime<Utc>,
    pub(crate) change: &'a FileChange,
}

/// Every change grouped by path, in proposer order within a path.
fn candidates_by_path(
    proposals: &BTreeMap<ProposerId, Proposal>,
) -> BTreeMap<&str, Vec<Candidate<'_>>> {
    let mut by_path: BTreeMap<&str, Vec<Candidate<'_>>> = BTreeMap::new();
    for (proposer, proposal) in proposals {
        let submitted_at = proposal.submitted_at();
        for change in &proposal.changes {
            by_path.entry(change.path.as_str()).or_default().push(Candidate {
                proposer,
                submitted_at,
                change,
            });
        }
    }
    by_path
}

fn disagree(candidates: &[Candidate<'_>]) -> bool {
    let contents: BTreeSet<&str> = candidates
        .iter()
        .map(|c| c.change.content.as_str())
        .collect();
    contents.len() > 1
}

/// Returns one pending record per path whose proposals disagree on content.
/// Identical content from several proposers is not a conflict.
#[must_use]
pub fn detect_conflicts(proposals: &BTreeMap<ProposerId, Proposal>) -> Vec<ConflictRecord> {
    let records: Vec<ConflictRecord> = candidates_by_path(proposals)
        .into_iter()
        .filter(|(_, candidates)| disagree(candidates))
        .map(|(path, candidates)| {
            let involved: BTreeMap<ProposerId, Proposal> = candidates
                .iter()
                .map(|c| (c.proposer.clone(), proposals[c.proposer].for_path(path)))
                .collect();
            ConflictRecord::new(path, involved)
        })
        .collect();

    for record in &records {
        info!(
            conflict = %record.id,
            path = %record.file_path,
            proposers = record.proposals.len(),
            "conflict detected"
        );
    }
    records
}

/// Resolves every path touched by the proposals into a single change.
///
/// Paths where all proposals agree pass through unchanged. Conflicting paths
/// are merged hunk by hunk when any proposal carries hunks, otherwise the
/// most recently submitted change wins.
///
/// # Errors
///
/// Returns `ConflictError::NoResolvableContent` when a conflicting path has
/// neither hunks nor content, or `ConflictError::Apply` when merged hunks do
/// not fit the original file.
pub fn resolve_automatically(
    proposals: &BTreeMap<ProposerId, Proposal>,
) -> Result<Vec<FileChange>, ConflictError> {
    candidates_by_path(proposals)
        .into_iter()
        .map(|(path, candidates)| {
            if disagree(&candidates) {
                merge::resolve_path(path, &candidates)
            } else {
                Ok(candidates[0].change.clone())
            }
        })
        .collect()
}
