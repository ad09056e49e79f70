//! Error types for the engine.
//!
//! The edit-script engine, hunk builder and semantic grouper are total and
//! define no errors. Errors only arise when replaying hunks supplied from
//! outside, when resolving conflicts, and at the conflict-store seam.

use thiserror::Error;

use crate::conflict::ConflictId;

/// Errors that can occur when hunks or edit scripts supplied by a caller do
/// not fit the text they are applied to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HunkError {
    /// A hunk addresses lines past the end of the file.
    #[error("Hunk {start_line}-{end_line} is outside a {line_count}-line file")]
    OutOfRange {
        /// First line of the hunk (1-based).
        start_line: usize,
        /// Last line of the hunk (1-based, inclusive).
        end_line: usize,
        /// Number of lines in the file.
        line_count: usize,
    },
    /// A hunk starts before the previous one ends, or ends before it starts.
    #[error("Hunk starting at line {start_line} overlaps or precedes the previous hunk")]
    Overlapping {
        /// First line of the offending hunk (1-based).
        start_line: usize,
    },
    /// An edit script does not transform the given base into the given target.
    #[error("Edit script does not match the supplied texts")]
    ScriptMismatch,
}

/// Errors that can occur when resolving a conflict.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConflictError {
    /// No conflict is registered under the requested id.
    #[error("Conflict not found: {0}")]
    NotFound(ConflictId),
    /// No proposal touches the requested path.
    #[error("No proposals found for {0}")]
    NoProposals(String),
    /// Auto-resolution was requested but there is nothing to merge.
    #[error("No hunks or content to resolve for {0}")]
    NoResolvableContent(String),
    /// The merged hunks could not be replayed onto the original file.
    #[error("Failed to apply merged hunks to {path}: {source}")]
    Apply {
        /// Path of the conflicting file.
        path: String,
        /// Underlying replay failure.
        #[source]
        source: HunkError,
    },
    /// The conflict store failed.
    #[error("Conflict store error: {0}")]
    Store(#[from] StoreError),
}

/// Errors reported by a [`crate::conflict::ConflictStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store is unavailable or rejected the operation.
    #[error("Conflict store unavailable: {0}")]
    Unavailable(String),
}
