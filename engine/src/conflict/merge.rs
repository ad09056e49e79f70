//! Merging conflicting changes to a single path.
//!
//! Every hunk is first reduced to the lines it actually changes, dropping
//! the unchanged anchor lines it carries, so an insertion after line N and
//! an edit of line N stay disjoint. The edits from every proposer are then
//! sorted by position. An edit that overlaps the previously merged one
//! widens it to the union of both ranges and the more recently submitted
//! text wins. This is positional, not content-aware: an overlap in line
//! range drops the older text even when the edits would have composed.
//!
//! The merged edits are replayed onto the shared base and the resulting
//! file is diffed again, so the hunks handed back always match its content.

use chrono::{DateTime, Utc};
use std::ops::Range;
use tracing::{debug, info, warn};

use crate::change::{ChangeBuilder, ChangeType, FileChange};
use crate::conflict::Candidate;
use crate::error::{ConflictError, HunkError};
use crate::hunk::{Hunk, HunkBuilder, build_hunks};
use crate::text::{join_lines, split_lines};

/// The changed core of a hunk: a 0-based, half-open range of base lines
/// and the lines replacing it. An empty range is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    old: Range<usize>,
    lines: Vec<String>,
    submitted_at: DateTime<Utc>,
}

impl Edit {
    fn from_hunk(
        hunk: &Hunk,
        submitted_at: DateTime<Utc>,
        line_count: usize,
    ) -> Result<Self, HunkError> {
        if hunk.start_line == 0 || hunk.end_line < hunk.start_line || hunk.end_line > line_count {
            return Err(HunkError::OutOfRange {
                start_line: hunk.start_line,
                end_line: hunk.end_line,
                line_count,
            });
        }
        let content = split_lines(&hunk.content);
        // Trimming needs `original_content` to describe the replaced range.
        let (leading, trailing) = if split_lines(&hunk.original_content).len() == hunk.original_len()
        {
            hunk.unchanged_edges()
        } else {
            (0, 0)
        };
        let start = hunk.start_line - 1 + leading;
        Ok(Self {
            old: start..(hunk.end_line - trailing).max(start),
            lines: content[leading..content.len() - trailing]
                .iter()
                .map(ToString::to_string)
                .collect(),
            submitted_at,
        })
    }

    /// Whether both edits touch the same base line, or insert at the same
    /// point.
    fn collides(&self, other: &Self) -> bool {
        if self.old.is_empty() && other.old.is_empty() {
            return self.old.start == other.old.start;
        }
        self.old.start < other.old.end && other.old.start < self.old.end
    }
}

/// Merges hunks built against `base`, each ranked by submission time, and
/// returns the hunks of the merged file.
///
/// # Errors
///
/// Returns `HunkError::OutOfRange` if a hunk does not fit inside `base`.
pub fn merge_hunks(base: &str, ranked: &[(DateTime<Utc>, Hunk)]) -> Result<Vec<Hunk>, HunkError> {
    let merged = merge_onto(base, ranked)?;
    Ok(build_hunks(base, &merged))
}

/// Replays the merged edits of every ranked hunk onto `base`.
fn merge_onto(base: &str, ranked: &[(DateTime<Utc>, Hunk)]) -> Result<String, HunkError> {
    let lines = split_lines(base);
    let mut edits = ranked
        .iter()
        .map(|(submitted_at, hunk)| Edit::from_hunk(hunk, *submitted_at, lines.len()))
        .collect::<Result<Vec<_>, _>>()?;
    edits.sort_by_key(|e| (e.old.start, e.old.end, e.submitted_at));

    let mut merged: Vec<Edit> = Vec::with_capacity(edits.len());
    for edit in edits {
        match merged.last_mut() {
            Some(last) if last.collides(&edit) => {
                debug!(
                    start = last.old.start,
                    end = last.old.end.max(edit.old.end),
                    "overlapping edits, later one wins"
                );
                last.old.end = last.old.end.max(edit.old.end);
                if edit.submitted_at >= last.submitted_at {
                    last.lines = edit.lines;
                    last.submitted_at = edit.submitted_at;
                }
            }
            _ => merged.push(edit),
        }
    }

    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut cursor = 0;
    for edit in &merged {
        out.extend_from_slice(&lines[cursor..edit.old.start]);
        out.extend(edit.lines.iter().map(String::as_str));
        cursor = edit.old.end;
    }
    out.extend_from_slice(&lines[cursor..]);
    Ok(join_lines(&out))
}

/// Resolves the candidates for one path into a single change.
pub(crate) fn resolve_path(
    path: &str,
    candidates: &[Candidate<'_>],
) -> Result<FileChange, ConflictError> {
    if candidates.is_empty() {
        return Err(ConflictError::NoProposals(path.to_string()));
    }

    if candidates.iter().any(|c| c.change.has_hunks()) {
        merge_path(path, candidates)
    } else {
        latest_whole_file(path, candidates)
    }
}

fn latest_whole_file(path: &str, candidates: &[Candidate<'_>]) -> Result<FileChange, ConflictError> {
    let resolvable = candidates
        .iter()
        .any(|c| !c.change.content.is_empty() || c.change.change_type == ChangeType::Delete);
    if !resolvable {
        return Err(ConflictError::NoResolvableContent(path.to_string()));
    }

    let winner = candidates
        .iter()
        .max_by_key(|c| c.submitted_at)
        .ok_or_else(|| ConflictError::NoProposals(path.to_string()))?;
    warn!(
        path,
        proposer = %winner.proposer,
        submitted_at = %winner.submitted_at,
        "no hunks to merge, taking most recent whole-file change"
    );
    Ok(winner.change.clone())
}

fn merge_path(path: &str, candidates: &[Candidate<'_>]) -> Result<FileChange, ConflictError> {
    let Some(base) = shared_base(candidates) else {
        warn!(path, "no original content to replay merged hunks onto");
        return latest_whole_file(path, candidates);
    };

    let differ = HunkBuilder::default();
    let mut ranked: Vec<(DateTime<Utc>, Hunk)> = Vec::new();
    let mut contributing = 0;
    for candidate in candidates {
        let hunks = match (&candidate.change.hunks, &candidate.change.original_content) {
            (Some(hunks), _) => hunks.clone(),
            (None, Some(original)) => {
                debug!(path, proposer = %candidate.proposer, "diffing change without hunks");
                differ.build(original, &candidate.change.content)
            }
            (None, None) => {
                warn!(
                    path,
                    proposer = %candidate.proposer,
                    "change has neither hunks nor original content, leaving it out of the merge"
                );
                continue;
            }
        };
        contributing += 1;
        ranked.extend(hunks.into_iter().map(|hunk| (candidate.submitted_at, hunk)));
    }

    let pooled = ranked.len();
    let content = merge_onto(base, &ranked).map_err(|source| ConflictError::Apply {
        path: path.to_string(),
        source,
    })?;

    let merged = ChangeBuilder::default().diff_texts(path, Some(base), &content);
    info!(
        path,
        proposers = contributing,
        pooled,
        merged = merged.hunks.as_ref().map_or(0, Vec::len),
        "merged conflicting hunks"
    );

    Ok(FileChange {
        change_type: merged_type(candidates),
        explanation: Some(format!(
            "Auto-merged {pooled} hunks from {contributing} proposals"
        )),
        ..merged
    })
}

/// Original content of the file, preferring changes to an existing file.
fn shared_base<'a>(candidates: &[Candidate<'a>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter(|c| c.change.change_type != ChangeType::Create)
        .chain(candidates)
        .find_map(|c| c.change.original_content.as_deref())
}

fn merged_type(candidates: &[Candidate<'_>]) -> ChangeType {
    let first = candidates[0].change.change_type;
    if candidates.iter().all(|c| c.change.change_type == first) {
        first
    } else {
        ChangeType::Modify
    }
}
