//! File changes and their construction from workspace snapshots.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

use crate::config::EngineSettings;
use crate::hunk::{Hunk, HunkBuilder};
use crate::semantic::SemanticGrouper;

/// How a change affects its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    /// The file did not exist before.
    Create,
    /// The file existed and has new content.
    Modify,
    /// The file is removed.
    Delete,
}

/// A proposed change to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// Workspace-relative path.
    pub path: String,
    /// Full post-edit content (empty for deletions).
    pub content: String,
    /// Full pre-edit content; empty for newly created files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    /// Kind of change.
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    /// Line-level regions that differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hunks: Option<Vec<Hunk>>,
    /// Free-text reason supplied by the proposer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl FileChange {
    /// A new file with the given content.
    #[must_use]
    pub fn create(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            original_content: Some(String::new()),
            change_type: ChangeType::Create,
            hunks: None,
            explanation: None,
        }
    }

    /// New content for an existing file.
    #[must_use]
    pub fn modify(
        path: impl Into<String>,
        original_content: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            original_content: Some(original_content.into()),
            change_type: ChangeType::Modify,
            hunks: None,
            explanation: None,
        }
    }

    /// Removal of an existing file.
    #[must_use]
    pub fn delete(path: impl Into<String>, original_content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: String::new(),
            original_content: Some(original_content.into()),
            change_type: ChangeType::Delete,
            hunks: None,
            explanation: None,
        }
    }

    /// Attaches hunks.
    #[must_use]
    pub fn with_hunks(mut self, hunks: Vec<Hunk>) -> Self {
        self.hunks = Some(hunks);
        self
    }

    /// Attaches an explanation.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Hex-encoded SHA-256 of `content`.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Whether the change carries at least one hunk.
    #[must_use]
    pub fn has_hunks(&self) -> bool {
        self.hunks.as_ref().is_some_and(|hunks| !hunks.is_empty())
    }
}

/// Read access to the workspace as it was before any proposed change.
pub trait SnapshotProvider {
    /// Content of the file at `path`, if it exists.
    fn read(&self, path: &str) -> Option<String>;

    /// Whether a file exists at `path`.
    fn exists(&self, path: &str) -> bool {
        self.read(path).is_some()
    }
}

/// A snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshot {
    files: HashMap<String, String>,
}

impl InMemorySnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// Returns the snapshot with a file added.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl SnapshotProvider for InMemorySnapshot {
    fn read(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}

/// Builds fully populated [`FileChange`]s: change type, hunks and semantic
/// groups.
#[derive(Debug, Clone)]
pub struct ChangeBuilder {
    hunks: HunkBuilder,
    grouper: SemanticGrouper,
    semantic_grouping: bool,
}

impl Default for ChangeBuilder {
    fn default() -> Self {
        Self::new(&EngineSettings::default())
    }
}

impl ChangeBuilder {
    /// Creates a builder from engine settings.
    #[must_use]
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            hunks: HunkBuilder::from_settings(settings),
            grouper: SemanticGrouper::from_settings(settings),
            semantic_grouping: settings.semantic_grouping,
        }
    }

    /// Replaces the grouper.
    #[must_use]
    pub fn with_grouper(mut self, grouper: SemanticGrouper) -> Self {
        self.grouper = grouper;
        self
    }

    /// The change writing `after` to `path`: a create when the snapshot has
    /// no such file, otherwise a modify.
    #[must_use]
    pub fn write<S>(&self, snapshot: &S, path: &str, after: &str) -> FileChange
    where
        S: SnapshotProvider + ?Sized,
    {
        self.diff_texts(path, snapshot.read(path).as_deref(), after)
    }

    /// The change removing `path`, or `None` when the snapshot has no such
    /// file.
    #[must_use]
    pub fn remove<S>(&self, snapshot: &S, path: &str) -> Option<FileChange>
    where
        S: SnapshotProvider + ?Sized,
    {
        if !snapshot.exists(path) {
            return None;
        }
        let before = snapshot.read(path).unwrap_or_default();
        let hunks = self.hunks.build(&before, "");
        debug!(path, hunks = hunks.len(), "built deletion");
        Some(FileChange::delete(path, before).with_hunks(hunks))
    }

    /// The change turning `before` (absent for new files) into `after`.
    #[must_use]
    pub fn diff_texts(&self, path: &str, before: Option<&str>, after: &str) -> FileChange {
        let change = match before {
            Some(before) => FileChange::modify(path, before, after),
            None => FileChange::create(path, after),
        };
        let mut hunks = self.hunks.build(before.unwrap_or_default(), after);
        if self.semantic_grouping {
            self.grouper.tag(&mut hunks, &self.hunks.policy().apply(after));
        }
        debug!(path, change_type = ?change.change_type, hunks = hunks.len(), "built change");
        change.with_hunks(hunks)
    }
}
