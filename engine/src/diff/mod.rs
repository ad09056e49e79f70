//! Line-level edit scripts.
//!
//! This module provides a trait-based approach to diff algorithms so callers
//! can depend on [`DiffAlgorithm`] while the engine ships a single Myers
//! implementation. Edit scripts are expressed as counted runs ([`EditOp`]);
//! no two adjacent runs ever share a kind.

pub mod myers;

pub use myers::MyersDiff;
pub use myers::optimization::pair_replacements;

use serde::{Deserialize, Serialize};

/// Kind of an edit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// Lines present in both sequences.
    Equal,
    /// Lines present only in the target sequence.
    Insert,
    /// Lines present only in the base sequence.
    Delete,
    /// A delete paired with an insert of the same arity at the same position.
    Replace,
}

/// A run of `count` consecutive edits of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditOp {
    /// What the run does.
    pub kind: EditKind,
    /// How many lines the run spans (always at least one).
    pub count: usize,
}

impl EditOp {
    /// Creates a run of the given kind.
    #[must_use]
    pub const fn new(kind: EditKind, count: usize) -> Self {
        Self { kind, count }
    }

    /// Shorthand for an `Equal` run.
    #[must_use]
    pub const fn equal(count: usize) -> Self {
        Self::new(EditKind::Equal, count)
    }

    /// Shorthand for an `Insert` run.
    #[must_use]
    pub const fn insert(count: usize) -> Self {
        Self::new(EditKind::Insert, count)
    }

    /// Shorthand for a `Delete` run.
    #[must_use]
    pub const fn delete(count: usize) -> Self {
        Self::new(EditKind::Delete, count)
    }

    /// Shorthand for a `Replace` run.
    #[must_use]
    pub const fn replace(count: usize) -> Self {
        Self::new(EditKind::Replace, count)
    }

    /// Returns true if this run changes content.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self.kind, EditKind::Equal)
    }

    /// Lines consumed from the base sequence.
    #[must_use]
    pub const fn base_len(&self) -> usize {
        match self.kind {
            EditKind::Insert => 0,
            EditKind::Equal | EditKind::Delete | EditKind::Replace => self.count,
        }
    }

    /// Lines produced into the target sequence.
    #[must_use]
    pub const fn target_len(&self) -> usize {
        match self.kind {
            EditKind::Delete => 0,
            EditKind::Equal | EditKind::Insert | EditKind::Replace => self.count,
        }
    }
}

/// Trait for diff algorithms.
///
/// Implementations compute a minimal edit script turning `base` into
/// `target`. The trait uses `Send + Sync` bounds so a single instance can be
/// shared across threads; implementations hold no per-call state.
pub trait DiffAlgorithm: Send + Sync {
    /// Computes the edit script between two line sequences.
    fn diff(&self, base: &[&str], target: &[&str]) -> Vec<EditOp>;
}

/// Computes the Myers edit script between two line sequences.
///
/// Runs are pre-merged and only `Equal`, `Insert` and `Delete` are produced;
/// see [`pair_replacements`] to fold paired changes into `Replace`.
#[must_use]
pub fn diff(base: &[&str], target: &[&str]) -> Vec<EditOp> {
    MyersDiff::new().diff(base, target)
}

/// Number of single-line insertions plus deletions in an edit script.
///
/// A `Replace` run counts as one insertion and one deletion per line.
#[must_use]
pub fn edit_distance(ops: &[EditOp]) -> usize {
    ops.iter()
        .map(|op| match op.kind {
            EditKind::Equal => 0,
            EditKind::Insert | EditKind::Delete => op.count,
            EditKind::Replace => op.count * 2,
        })
        .sum()
}

/// Replays an edit script against `base`, drawing new lines from `target`.
///
/// Returns `None` when the script does not fit the two sequences: it runs past
/// either end, leaves lines unconsumed, or an `Equal` run covers lines that
/// differ.
#[must_use]
pub fn replay<'a>(base: &[&'a str], target: &[&'a str], ops: &[EditOp]) -> Option<Vec<&'a str>> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::with_capacity(target.len());
    for op in ops {
        let (bi, tj) = (i + op.base_len(), j + op.target_len());
        if bi > base.len() || tj > target.len() {
            return None;
        }
        match op.kind {
            EditKind::Equal => {
                if base[i..bi] != target[j..tj] {
                    return None;
                }
                out.extend_from_slice(&base[i..bi]);
            }
            EditKind::Insert | EditKind::Replace => out.extend_from_slice(&target[j..tj]),
            EditKind::Delete => {}
        }
        i = bi;
        j = tj;
    }
    (i == base.len() && j == target.len()).then_some(out)
}
