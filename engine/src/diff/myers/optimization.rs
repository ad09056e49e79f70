//! Myers diff algorithm optimizations.
//!
//! This module provides post-processing for edit scripts: folding elementary
//! steps into counted runs, and pairing deletions with insertions.

use crate::diff::myers::algorithm::Step;
use crate::diff::{EditKind, EditOp};

/// Folds elementary steps into runs, merging consecutive steps of one kind.
pub(crate) fn coalesce_steps(steps: &[Step]) -> Vec<EditOp> {
    let mut ops: Vec<EditOp> = Vec::new();
    for step in steps {
        let kind = match step {
            Step::Keep => EditKind::Equal,
            Step::Insert => EditKind::Insert,
            Step::Delete => EditKind::Delete,
        };
        match ops.last_mut() {
            Some(last) if last.kind == kind => last.count += 1,
            _ => ops.push(EditOp::new(kind, 1)),
        }
    }
    ops
}

/// Coalesces each block of adjacent deletions and insertions into a
/// `Replace` run.
///
/// A block deleting `d` lines and inserting `i` lines becomes
/// `Replace(min(d, i))` followed by the leftover `Delete` or `Insert` run.
/// `Equal` runs pass through untouched, so the output still never holds two
/// adjacent runs of the same kind.
#[must_use]
pub fn pair_replacements(ops: &[EditOp]) -> Vec<EditOp> {
    let mut out = Vec::with_capacity(ops.len());
    let (mut deleted, mut inserted) = (0, 0);

    for op in ops {
        match op.kind {
            EditKind::Delete => deleted += op.count,
            EditKind::Insert => inserted += op.count,
            EditKind::Replace => {
                deleted += op.count;
                inserted += op.count;
            }
            EditKind::Equal => {
                flush_block(&mut out, &mut deleted, &mut inserted);
                push_run(&mut out, *op);
            }
        }
    }
    flush_block(&mut out, &mut deleted, &mut inserted);
    out
}

fn flush_block(out: &mut Vec<EditOp>, deleted: &mut usize, inserted: &mut usize) {
    let paired = (*deleted).min(*inserted);
    if paired > 0 {
        out.push(EditOp::replace(paired));
    }
    if *deleted > paired {
        out.push(EditOp::delete(*deleted - paired));
    }
    if *inserted > paired {
        out.push(EditOp::insert(*inserted - paired));
    }
    *deleted = 0;
    *inserted = 0;
}

fn push_run(out: &mut Vec<EditOp>, op: EditOp) {
    match out.last_mut() {
        Some(last) if last.kind == op.kind => last.count += op.count,
        _ => out.push(op),
    }
}
