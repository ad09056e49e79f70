//! Line splitting and newline handling.
//!
//! The engine works on line sequences produced by splitting on `\n`. Empty
//! trailing segments are kept, so `join_lines(split_lines(s)) == s` for every
//! input under [`NewlinePolicy::Preserve`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How carriage returns are treated before a text is split into lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewlinePolicy {
    /// Split strictly on `\n`; a `\r` before it stays part of the line.
    #[default]
    Preserve,
    /// Rewrite `\r\n` to `\n` before splitting.
    Normalize,
}

impl NewlinePolicy {
    /// Applies the policy to a whole text.
    #[must_use]
    pub fn apply<'a>(self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::Normalize if text.contains("\r\n") => Cow::Owned(text.replace("\r\n", "\n")),
            _ => Cow::Borrowed(text),
        }
    }
}

/// Splits a text into lines on `\n`.
///
/// Always yields at least one element: the empty text is a single empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Joins lines with `\n`; the inverse of [`split_lines`].
#[must_use]
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

/// Number of lines [`split_lines`] would produce.
#[must_use]
pub fn line_count(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count() + 1
}
