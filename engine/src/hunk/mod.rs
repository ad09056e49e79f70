//! Hunk construction from edit scripts.
//!
//! A [`Hunk`] replaces an inclusive, 1-indexed range of pre-edit lines with
//! new text. Hunks are produced in ascending order, never overlap, and
//! replaying them onto the pre-edit text with [`apply_hunks`] reproduces the
//! post-edit text exactly.
//!
//! Every hunk replaces at least one line with at least one line. A pure
//! insertion or deletion is anchored to the unchanged line next to it (the
//! preceding one when there is one), so `content` and `originalContent` are
//! never ambiguous between "no lines" and "one empty line".

pub mod unified;

pub use unified::format_unified;

use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::{debug, warn};

use crate::config::EngineSettings;
use crate::diff::{DiffAlgorithm, EditKind, EditOp, MyersDiff, replay};
use crate::error::HunkError;
use crate::text::{NewlinePolicy, join_lines, line_count, split_lines};

/// A contiguous region where the pre- and post-edit texts differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunk {
    /// First replaced pre-edit line (1-based).
    pub start_line: usize,
    /// Last replaced pre-edit line (1-based, inclusive).
    pub end_line: usize,
    /// Post-edit text of the region.
    pub content: String,
    /// Pre-edit text of the region.
    pub original_content: String,
    /// Name of the enclosing code structure, once tagged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_group: Option<String>,
}

impl Hunk {
    /// Creates an untagged hunk.
    #[must_use]
    pub fn new(
        start_line: usize,
        end_line: usize,
        content: impl Into<String>,
        original_content: impl Into<String>,
    ) -> Self {
        Self {
            start_line,
            end_line,
            content: content.into(),
            original_content: original_content.into(),
            semantic_group: None,
        }
    }

    /// Returns the hunk with its semantic group set.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.semantic_group = Some(group.into());
        self
    }

    /// Whether the two hunks share at least one pre-edit line.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_line <= other.end_line && other.start_line <= self.end_line
    }

    /// Number of pre-edit lines the hunk replaces.
    #[must_use]
    pub const fn original_len(&self) -> usize {
        (self.end_line + 1).saturating_sub(self.start_line)
    }

    /// Number of post-edit lines the hunk produces.
    #[must_use]
    pub fn content_len(&self) -> usize {
        line_count(&self.content)
    }

    /// Lines that `original_content` and `content` share at their head and
    /// at their tail, such as the anchor line of a pure insertion.
    ///
    /// The two counts never claim the same line twice.
    #[must_use]
    pub fn unchanged_edges(&self) -> (usize, usize) {
        let old = split_lines(&self.original_content);
        let new = split_lines(&self.content);
        let leading = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
        let room = old.len().min(new.len()) - leading;
        let trailing = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(room)
            .take_while(|(a, b)| a == b)
            .count();
        (leading, trailing)
    }
}

/// Line counts added and removed by an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    /// Lines present only after the edit.
    pub additions: usize,
    /// Lines present only before the edit.
    pub deletions: usize,
}

impl DiffStats {
    /// Tallies an edit script.
    #[must_use]
    pub fn from_ops(ops: &[EditOp]) -> Self {
        ops.iter()
            .filter(|op| op.is_change())
            .fold(Self::default(), |acc, op| Self {
                additions: acc.additions + op.target_len(),
                deletions: acc.deletions + op.base_len(),
            })
    }

    /// Whether the edit changed nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}

/// Builds hunks between two versions of a text.
#[derive(Debug, Clone)]
pub struct HunkBuilder<A = MyersDiff> {
    algorithm: A,
    policy: NewlinePolicy,
    large_input_lines: usize,
}

impl Default for HunkBuilder<MyersDiff> {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

impl HunkBuilder<MyersDiff> {
    /// Creates a builder using Myers diff and the settings' newline policy.
    #[must_use]
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            algorithm: MyersDiff::new(),
            policy: settings.newline_policy,
            large_input_lines: settings.large_input_lines,
        }
    }
}

impl<A: DiffAlgorithm> HunkBuilder<A> {
    /// Creates a builder around a custom diff algorithm.
    #[must_use]
    pub fn with_algorithm(algorithm: A, settings: &EngineSettings) -> Self {
        Self {
            algorithm,
            policy: settings.newline_policy,
            large_input_lines: settings.large_input_lines,
        }
    }

    /// Newline policy applied before splitting.
    #[must_use]
    pub const fn policy(&self) -> NewlinePolicy {
        self.policy
    }

    /// Computes the hunks turning `before` into `after`.
    #[must_use]
    pub fn build(&self, before: &str, after: &str) -> Vec<Hunk> {
        let (before, after) = (self.policy.apply(before), self.policy.apply(after));
        let (old, new) = (split_lines(&before), split_lines(&after));
        self.warn_if_large(old.len() + new.len());
        let ops = self.algorithm.diff(&old, &new);
        let hunks = hunks_from_lines(&old, &new, &ops);
        debug!(runs = ops.len(), hunks = hunks.len(), "built hunks");
        hunks
    }

    /// Builds hunks from a caller-supplied edit script, which may contain
    /// `Replace` runs.
    ///
    /// # Errors
    ///
    /// Returns `HunkError::ScriptMismatch` if the script does not turn
    /// `before` into `after`.
    pub fn build_from_ops(
        &self,
        before: &str,
        after: &str,
        ops: &[EditOp],
    ) -> Result<Vec<Hunk>, HunkError> {
        let (before, after) = (self.policy.apply(before), self.policy.apply(after));
        let (old, new) = (split_lines(&before), split_lines(&after));
        if replay(&old, &new, ops).is_none() {
            return Err(HunkError::ScriptMismatch);
        }
        Ok(hunks_from_lines(&old, &new, ops))
    }

    /// Counts the lines added and removed between two texts.
    #[must_use]
    pub fn stats(&self, before: &str, after: &str) -> DiffStats {
        let (before, after) = (self.policy.apply(before), self.policy.apply(after));
        let (old, new) = (split_lines(&before), split_lines(&after));
        DiffStats::from_ops(&self.algorithm.diff(&old, &new))
    }

    fn warn_if_large(&self, total_lines: usize) {
        if total_lines > self.large_input_lines {
            warn!(
                total_lines,
                threshold = self.large_input_lines,
                "diffing large input; worst case is quadratic in line count"
            );
        }
    }
}

/// Computes hunks with the default builder.
#[must_use]
pub fn build_hunks(before: &str, after: &str) -> Vec<Hunk> {
    HunkBuilder::default().build(before, after)
}

/// A change block as ranges of 0-based line indices.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    old: Range<usize>,
    new: Range<usize>,
}

fn hunks_from_lines(old: &[&str], new: &[&str], ops: &[EditOp]) -> Vec<Hunk> {
    let regions = anchor_regions(collect_regions(ops), old.len(), new.len());
    regions
        .into_iter()
        .map(|r| {
            Hunk::new(
                r.old.start + 1,
                r.old.end.max(r.old.start + 1),
                join_lines(&new[r.new.clone()]),
                join_lines(&old[r.old.clone()]),
            )
        })
        .collect()
}

/// Sweeps the edit script, opening a region at the first change after an
/// `Equal` run and closing it at the next one.
fn collect_regions(ops: &[EditOp]) -> Vec<Region> {
    let (mut i, mut j) = (0, 0);
    let mut open: Option<Region> = None;
    let mut regions = Vec::new();

    for op in ops {
        if op.kind == EditKind::Equal {
            regions.extend(open.take());
        } else {
            let region = open.get_or_insert(Region { old: i..i, new: j..j });
            region.old.end += op.base_len();
            region.new.end += op.target_len();
        }
        i += op.base_len();
        j += op.target_len();
    }
    regions.extend(open);
    regions
}

/// Widens one-sided regions by an adjacent unchanged line and merges
/// regions that end up sharing a line.
fn anchor_regions(regions: Vec<Region>, old_len: usize, new_len: usize) -> Vec<Region> {
    let mut anchored: Vec<Region> = Vec::with_capacity(regions.len());
    for mut region in regions {
        if region.old.is_empty() || region.new.is_empty() {
            if region.old.start > 0 && region.new.start > 0 {
                region.old.start -= 1;
                region.new.start -= 1;
            } else if region.old.end < old_len && region.new.end < new_len {
                region.old.end += 1;
                region.new.end += 1;
            }
        }
        match anchored.last_mut() {
            Some(last) if region.old.start < last.old.end => {
                last.old.end = last.old.end.max(region.old.end);
                last.new.end = last.new.end.max(region.new.end);
            }
            _ => anchored.push(region),
        }
    }
    anchored
}

/// Post-edit start line (1-based) of each hunk, derived from the line-count
/// delta of the hunks before it.
pub(crate) fn target_start_lines(hunks: &[Hunk]) -> Vec<usize> {
    let mut delta: isize = 0;
    hunks
        .iter()
        .map(|hunk| {
            let start = hunk.start_line.saturating_add_signed(delta);
            delta += hunk.content_len() as isize - hunk.original_len() as isize;
            start
        })
        .collect()
}

/// Replays hunks onto `before`, replacing each `[startLine, endLine]` span
/// with the hunk's content.
///
/// # Errors
///
/// Returns an error if a hunk lies outside `before` or the hunks are not in
/// ascending, non-overlapping order.
pub fn apply_hunks(before: &str, hunks: &[Hunk]) -> Result<String, HunkError> {
    let lines = split_lines(before);
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut cursor = 0;

    for hunk in hunks {
        if hunk.start_line == 0 || hunk.end_line < hunk.start_line || hunk.start_line <= cursor {
            return Err(HunkError::Overlapping {
                start_line: hunk.start_line,
            });
        }
        if hunk.end_line > lines.len() {
            return Err(HunkError::OutOfRange {
                start_line: hunk.start_line,
                end_line: hunk.end_line,
                line_count: lines.len(),
            });
        }
        out.extend_from_slice(&lines[cursor..hunk.start_line - 1]);
        out.extend(split_lines(&hunk.content));
        cursor = hunk.end_line;
    }
    out.extend_from_slice(&lines[cursor..]);
    Ok(join_lines(&out))
}
