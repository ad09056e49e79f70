//! Semantic grouping of hunks.
//!
//! A [`StructureDetector`] scans post-edit text for named line ranges
//! (functions, classes, imports and so on). Each hunk is then labelled with
//! the innermost structure enclosing the first post-edit line it changes, so
//! changes can be reviewed and merged per function rather than per line.
//!
//! Detection is a heuristic tagging layer. It never fails; text it cannot
//! make sense of simply lands in the default group.

pub mod detector;

pub use detector::RegexStructureDetector;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::config::{DEFAULT_GROUP, EngineSettings};
use crate::hunk::{Hunk, target_start_lines};

/// A named, inclusive range of post-edit lines such as `function:foo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeStructure {
    /// `kind:identifier` label.
    pub name: String,
    /// First line (1-based).
    pub start_line: usize,
    /// Last line (1-based, inclusive).
    pub end_line: usize,
}

impl CodeStructure {
    /// Creates a structure spanning `start_line..=end_line`.
    #[must_use]
    pub fn new(name: impl Into<String>, start_line: usize, end_line: usize) -> Self {
        Self {
            name: name.into(),
            start_line,
            end_line,
        }
    }

    /// Whether `line` falls inside the structure.
    #[must_use]
    pub const fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// Whether the structure shares a line with `start..=end`.
    #[must_use]
    pub const fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start_line <= end && start <= self.end_line
    }

    const fn span(&self) -> usize {
        self.end_line - self.start_line
    }
}

/// Finds named structures in a text.
///
/// Implementations must be total: any input yields a (possibly empty) list.
pub trait StructureDetector: Send + Sync {
    /// Returns the structures found in `text`, in any order.
    fn detect(&self, text: &str) -> Vec<CodeStructure>;
}

/// Tags hunks with their enclosing structure names.
#[derive(Clone)]
pub struct SemanticGrouper {
    detector: Arc<dyn StructureDetector>,
    default_group: String,
}

impl std::fmt::Debug for SemanticGrouper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticGrouper")
            .field("default_group", &self.default_group)
            .finish_non_exhaustive()
    }
}

impl Default for SemanticGrouper {
    fn default() -> Self {
        Self::new(RegexStructureDetector::new())
    }
}

impl SemanticGrouper {
    /// Creates a grouper with the given detector and the `"General"` label.
    #[must_use]
    pub fn new(detector: impl StructureDetector + 'static) -> Self {
        Self {
            detector: Arc::new(detector),
            default_group: DEFAULT_GROUP.to_string(),
        }
    }

    /// Creates a regex-backed grouper using the settings' default label.
    #[must_use]
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::default().with_default_group(settings.default_group.clone())
    }

    /// Sets the label for hunks outside any structure.
    #[must_use]
    pub fn with_default_group(mut self, group: impl Into<String>) -> Self {
        self.default_group = group.into();
        self
    }

    /// Label for hunks outside any structure.
    #[must_use]
    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// Sets `semantic_group` on every hunk, given the post-edit text the
    /// hunks were built against.
    pub fn tag(&self, hunks: &mut [Hunk], after: &str) {
        if hunks.is_empty() {
            return;
        }
        let structures = self.detector.detect(after);
        debug!(structures = structures.len(), hunks = hunks.len(), "tagging hunks");

        let starts = target_start_lines(hunks);
        for (hunk, start) in hunks.iter_mut().zip(starts) {
            let (first, last) = changed_lines(hunk, start);
            let label = enclosing(&structures, first, last)
                .map_or_else(|| self.default_group.clone(), |s| s.name.clone());
            hunk.semantic_group = Some(label);
        }
    }

    /// Buckets hunks by label, in the order each label is first seen.
    /// Untagged hunks fall into the default group.
    #[must_use]
    pub fn group(&self, hunks: &[Hunk]) -> Vec<(String, Vec<Hunk>)> {
        let mut groups: Vec<(String, Vec<Hunk>)> = Vec::new();
        for hunk in hunks {
            let label = hunk.semantic_group.as_deref().unwrap_or(&self.default_group);
            match groups.iter_mut().find(|(name, _)| name == label) {
                Some((_, members)) => members.push(hunk.clone()),
                None => groups.push((label.to_string(), vec![hunk.clone()])),
            }
        }
        groups
    }
}

/// Post-edit lines a hunk actually changes, skipping the unchanged lines it
/// carries as anchors. A pure deletion keeps its anchor line.
fn changed_lines(hunk: &Hunk, start: usize) -> (usize, usize) {
    let len = hunk.content_len();
    let (leading, trailing) = hunk.unchanged_edges();
    let first = start + leading.min(len - 1);
    let last = (start + len - 1).saturating_sub(trailing).max(first);
    (first, last)
}

/// The innermost structure containing `start`, else the first one touching
/// `start..=end`.
fn enclosing(structures: &[CodeStructure], start: usize, end: usize) -> Option<&CodeStructure> {
    structures
        .iter()
        .filter(|s| s.contains(start))
        .min_by_key(|s| s.span())
        .or_else(|| structures.iter().find(|s| s.overlaps(start, end)))
}

/// Tags hunks using the regex detector and the `"General"` default label.
#[must_use]
pub fn tag_hunks(mut hunks: Vec<Hunk>, after: &str) -> Vec<Hunk> {
    SemanticGrouper::default().tag(&mut hunks, after);
    hunks
}
