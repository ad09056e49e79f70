//! Conflict resolution against a store.

use std::collections::BTreeMap;
use tracing::info;

use crate::change::{ChangeBuilder, FileChange};
use crate::conflict::{
    ConflictId, ConflictRecord, ConflictStore, Proposal, ProposerId, candidates_by_path,
    detect_conflicts, merge,
};
use crate::error::ConflictError;

/// How a conflict should be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Merge hunks, or take the most recent whole-file change.
    Auto,
    /// Use the given content verbatim.
    Manual(String),
}

/// Registers and resolves conflicts held in a [`ConflictStore`].
#[derive(Debug)]
pub struct ConflictResolver<S> {
    store: S,
    changes: ChangeBuilder,
}

impl<S: ConflictStore> ConflictResolver<S> {
    /// Creates a resolver over a store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            changes: ChangeBuilder::default(),
        }
    }

    /// Sets the builder used to diff manually resolved content.
    #[must_use]
    pub fn with_change_builder(mut self, changes: ChangeBuilder) -> Self {
        self.changes = changes;
        self
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Detects conflicts among the proposals and stores each as pending.
    ///
    /// # Errors
    /// Returns `ConflictError::Store` if a record cannot be stored.
    pub fn register(
        &self,
        proposals: &BTreeMap<ProposerId, Proposal>,
    ) -> Result<Vec<ConflictId>, ConflictError> {
        detect_conflicts(proposals)
            .into_iter()
            .map(|record| {
                let id = record.id;
                self.store.put(record)?;
                Ok(id)
            })
            .collect()
    }

    /// Resolves a stored conflict and marks it resolved.
    ///
    /// Resolving an already resolved conflict replaces its outcome.
    ///
    /// # Errors
    /// Returns `ConflictError::NotFound` if no record has the id,
    /// `ConflictError::NoProposals` or `ConflictError::NoResolvableContent`
    /// if automatic resolution has nothing to work with, and
    /// `ConflictError::Store` if the store fails.
    pub fn resolve(
        &self,
        id: &ConflictId,
        resolution: Resolution,
    ) -> Result<Vec<FileChange>, ConflictError> {
        let mut record = self
            .store
            .get(id)?
            .ok_or(ConflictError::NotFound(*id))?;

        let resolved = match resolution {
            Resolution::Auto => vec![Self::auto(&record)?],
            Resolution::Manual(content) => vec![self.manual(&record, &content)],
        };

        record.resolve(resolved.clone());
        self.store.put(record)?;
        info!(conflict = %id, changes = resolved.len(), "conflict resolved");
        Ok(resolved)
    }

    fn auto(record: &ConflictRecord) -> Result<FileChange, ConflictError> {
        let by_path = candidates_by_path(&record.proposals);
        let candidates = by_path
            .get(record.file_path.as_str())
            .ok_or_else(|| ConflictError::NoProposals(record.file_path.clone()))?;
        merge::resolve_path(&record.file_path, candidates)
    }

    fn manual(&self, record: &ConflictRecord, content: &str) -> FileChange {
        self.changes
            .diff_texts(&record.file_path, record.base_content(), content)
            .with_explanation("Manually resolved")
    }
}
