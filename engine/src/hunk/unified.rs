//! Unified diff rendering for hunks.

use std::fmt::Write;

use crate::hunk::{Hunk, target_start_lines};
use crate::text::split_lines;

/// Formats hunks as a unified diff string (similar to `diff -u` with no
/// extra context beyond the anchoring line).
#[must_use]
pub fn format_unified(path: &str, hunks: &[Hunk]) -> String {
    let mut output = String::new();
    if hunks.is_empty() {
        return output;
    }

    let _ = writeln!(output, "--- a/{path}");
    let _ = writeln!(output, "+++ b/{path}");

    for (hunk, new_start) in hunks.iter().zip(target_start_lines(hunks)) {
        let _ = writeln!(
            output,
            "@@ -{},{} +{},{} @@{}",
            hunk.start_line,
            hunk.original_len(),
            new_start,
            hunk.content_len(),
            hunk.semantic_group
                .as_deref()
                .map(|group| format!(" {group}"))
                .unwrap_or_default()
        );
        for line in split_lines(&hunk.original_content) {
            let _ = writeln!(output, "-{line}");
        }
        for line in split_lines(&hunk.content) {
            let _ = writeln!(output, "+{line}");
        }
    }

    output
}
