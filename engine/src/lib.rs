//! Changeset Engine
//!
//! The engine turns agent-proposed file edits into reviewable units. It:
//! 1. Computes a minimal line edit script between two file versions (Myers)
//! 2. Folds the edit script into 1-indexed line-range hunks
//! 3. Attributes each hunk to the enclosing function/class it touches
//! 4. Merges competing proposals for the same file into one resolved change
//!
//! Every stage is a synchronous, pure computation over in-memory strings.
//! File access, persistence and UI live with the caller and reach the engine
//! only through the collaborator traits [`change::SnapshotProvider`] and
//! [`conflict::ConflictStore`].

pub mod change;
pub mod config;
pub mod conflict;
pub mod diff;
pub mod error;
pub mod hunk;
pub mod semantic;
pub mod telemetry;
pub mod text;

pub use change::{ChangeBuilder, ChangeType, FileChange, InMemorySnapshot, SnapshotProvider};
pub use crate::config::EngineSettings;
pub use conflict::{
    ConflictId, ConflictRecord, ConflictResolver, ConflictStatus, ConflictStore,
    InMemoryConflictStore, Proposal, ProposerId, Resolution, detect_conflicts, merge_hunks,
    resolve_automatically,
};
pub use diff::{DiffAlgorithm, EditKind, EditOp, MyersDiff, diff, pair_replacements};
pub use error::{ConflictError, HunkError, StoreError};
pub use hunk::{DiffStats, Hunk, HunkBuilder, apply_hunks, build_hunks, format_unified};
pub use semantic::{
    CodeStructure, RegexStructureDetector, SemanticGrouper, StructureDetector, tag_hunks,
};
pub use text::NewlinePolicy;
