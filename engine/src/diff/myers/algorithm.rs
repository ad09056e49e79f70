//! Myers diff algorithm.

use tracing::debug;

use crate::diff::myers::optimization::coalesce_steps;
use crate::diff::{DiffAlgorithm, EditOp};

/// Myers diff algorithm.
///
/// When two neighbouring diagonals reach equally far, the lower one is
/// extended (a deletion is taken before an insertion). The resulting script
/// is deterministic and minimal, but it is not the only minimal script.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyersDiff;

impl MyersDiff {
    /// Creates new instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DiffAlgorithm for MyersDiff {
    fn diff(&self, base: &[&str], target: &[&str]) -> Vec<EditOp> {
        if base.is_empty() && target.is_empty() {
            return Vec::new();
        }
        if base.is_empty() {
            return vec![EditOp::insert(target.len())];
        }
        if target.is_empty() {
            return vec![EditOp::delete(base.len())];
        }
        if base == target {
            return vec![EditOp::equal(base.len())];
        }
        let ops = coalesce_steps(&shortest_edit_script(base, target));
        debug!(
            base_lines = base.len(),
            target_lines = target.len(),
            runs = ops.len(),
            "computed edit script"
        );
        ops
    }
}

/// One elementary move through the edit graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Keep,
    Insert,
    Delete,
}

/// Furthest-reaching `x` for every diagonal `k` in `[-d, d]` after round `d`.
struct Frontier {
    d: isize,
    reach: Vec<isize>,
}

impl Frontier {
    fn get(&self, k: isize) -> isize {
        self.reach[(k + self.d) as usize]
    }
}

pub(crate) fn shortest_edit_script<T: PartialEq>(base: &[T], target: &[T]) -> Vec<Step> {
    let trace = explore(base, target);
    backtrack(&trace, base.len(), target.len())
}

/// Runs the forward search, recording each round's frontier.
fn explore<T: PartialEq>(base: &[T], target: &[T]) -> Vec<Frontier> {
    let (n, m) = (base.len() as isize, target.len() as isize);
    let max_d = n + m;
    let offset = max_d + 1;
    let mut v: Vec<isize> = vec![0; (2 * max_d + 3) as usize];
    let mut trace = Vec::new();

    for d in 0..=max_d {
        let mut reached_end = false;
        for k in (-d..=d).step_by(2) {
            let idx = (k + offset) as usize;
            let mut x = if k == -d || (k != d && v[idx - 1] < v[idx + 1]) {
                v[idx + 1]
            } else {
                v[idx - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && base[x as usize] == target[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx] = x;
            if x >= n && y >= m {
                reached_end = true;
                break;
            }
        }
        let (lo, hi) = ((offset - d) as usize, (offset + d) as usize);
        trace.push(Frontier {
            d,
            reach: v[lo..=hi].to_vec(),
        });
        if reached_end {
            break;
        }
    }
    trace
}

/// Walks the recorded frontiers from `(n, m)` back to the origin.
fn backtrack(trace: &[Frontier], n: usize, m: usize) -> Vec<Step> {
    let (mut x, mut y) = (n as isize, m as isize);
    let mut steps = Vec::with_capacity(n + m);

    for round in (1..trace.len()).rev() {
        let prev = &trace[round - 1];
        let d = round as isize;
        let k = x - y;
        let prev_k = if k == -d || (k != d && prev.get(k - 1) < prev.get(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = prev.get(prev_k);
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            steps.push(Step::Keep);
            x -= 1;
            y -= 1;
        }
        if x == prev_x {
            steps.push(Step::Insert);
            y -= 1;
        } else {
            steps.push(Step::Delete);
            x -= 1;
        }
    }
    while x > 0 && y > 0 {
        steps.push(Step::Keep);
        x -= 1;
        y -= 1;
    }
    steps.reverse();
    steps
}
