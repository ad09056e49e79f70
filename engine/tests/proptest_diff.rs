//! Property-based tests for the edit-script engine and hunk builder.
//!
//! Uses proptest to generate small line-based texts from a narrow alphabet so
//! that common lines, repeats and empty lines occur often.

use changeset_engine::diff::{edit_distance, replay};
use changeset_engine::{
    FileChange, Proposal, ProposerId, apply_hunks, build_hunks, detect_conflicts, diff,
    pair_replacements,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy to generate a list of short lines
fn lines_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]{0,2}", 0..=max)
}

/// Strategy to generate a text, sometimes with CRLF or a trailing newline
fn text_strategy() -> impl Strategy<Value = String> {
    (lines_strategy(10), any::<bool>(), any::<bool>()).prop_map(|(lines, crlf, trailing)| {
        let sep = if crlf { "\r\n" } else { "\n" };
        let mut text = lines.join(sep);
        if trailing {
            text.push('\n');
        }
        text
    })
}

/// Brute-force edit distance (insertions plus deletions) via LCS.
fn oracle_distance(a: &[&str], b: &[&str]) -> usize {
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            table[i][j] = if a[i] == b[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }
    a.len() + b.len() - 2 * table[0][0]
}

fn as_strs(lines: &[String]) -> Vec<&str> {
    lines.iter().map(String::as_str).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: replaying the hunks onto `before` reproduces `after`.
    #[test]
    fn hunks_round_trip(before in text_strategy(), after in text_strategy()) {
        let hunks = build_hunks(&before, &after);
        prop_assert_eq!(apply_hunks(&before, &hunks).unwrap(), after);
    }

    /// Property: a text diffed against itself yields no hunks.
    #[test]
    fn unchanged_text_has_no_hunks(text in text_strategy()) {
        prop_assert!(build_hunks(&text, &text).is_empty());
    }

    /// Property: hunks are ascending, well formed and disjoint.
    #[test]
    fn hunks_are_ordered(before in text_strategy(), after in text_strategy()) {
        let hunks = build_hunks(&before, &after);
        for hunk in &hunks {
            prop_assert!(hunk.start_line >= 1);
            prop_assert!(hunk.start_line <= hunk.end_line);
        }
        for pair in hunks.windows(2) {
            prop_assert!(pair[0].end_line < pair[1].start_line);
        }
    }

    /// Property: the script is as short as the brute-force optimum.
    #[test]
    fn script_is_minimal(a in lines_strategy(8), b in lines_strategy(8)) {
        let (a, b) = (as_strs(&a), as_strs(&b));
        let ops = diff(&a, &b);
        prop_assert_eq!(edit_distance(&ops), oracle_distance(&a, &b));
        prop_assert_eq!(edit_distance(&pair_replacements(&ops)), edit_distance(&ops));
    }

    /// Property: the script transforms `a` into `b`, before and after
    /// replacement pairing.
    #[test]
    fn script_replays(a in lines_strategy(12), b in lines_strategy(12)) {
        let (a, b) = (as_strs(&a), as_strs(&b));
        let ops = diff(&a, &b);
        prop_assert_eq!(replay(&a, &b, &ops), Some(b.clone()));
        prop_assert_eq!(replay(&a, &b, &pair_replacements(&ops)), Some(b.clone()));
    }

    /// Property: no two adjacent runs share a kind and no run is empty.
    #[test]
    fn runs_are_coalesced(a in lines_strategy(12), b in lines_strategy(12)) {
        let ops = diff(&as_strs(&a), &as_strs(&b));
        prop_assert!(ops.iter().all(|op| op.count >= 1));
        for pair in ops.windows(2) {
            prop_assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    /// Property: proposals conflict exactly when their contents differ.
    #[test]
    fn conflicts_follow_content(x in "[ab]{0,3}", y in "[ab]{0,3}") {
        let proposals = BTreeMap::from([
            (ProposerId::new("a"), Proposal::new(vec![FileChange::modify("f", "", x.clone())])),
            (ProposerId::new("b"), Proposal::new(vec![FileChange::modify("f", "", y.clone())])),
        ]);
        prop_assert_eq!(detect_conflicts(&proposals).len(), usize::from(x != y));
    }
}
