//! Conflict record storage.
//!
//! The engine never owns conflict records. Callers supply a
//! [`ConflictStore`] backed by whatever persistence they use;
//! [`InMemoryConflictStore`] serves tests and embedding.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::conflict::{ConflictId, ConflictRecord, ConflictStatus};
use crate::error::StoreError;

/// Contract for conflict record access.
pub trait ConflictStore: Send + Sync {
    /// Fetches a record by id.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing store fails.
    fn get(&self, id: &ConflictId) -> Result<Option<ConflictRecord>, StoreError>;

    /// Inserts or replaces a record.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing store fails.
    fn put(&self, record: ConflictRecord) -> Result<(), StoreError>;

    /// All records still awaiting resolution, oldest first.
    ///
    /// # Errors
    /// Returns `StoreError` if the backing store fails.
    fn pending(&self) -> Result<Vec<ConflictRecord>, StoreError>;
}

/// Conflict records held in memory.
#[derive(Debug, Default)]
pub struct InMemoryConflictStore {
    records: RwLock<HashMap<ConflictId, ConflictRecord>>,
}

impl InMemoryConflictStore {
    /// Create new storage instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl ConflictStore for InMemoryConflictStore {
    fn get(&self, id: &ConflictId) -> Result<Option<ConflictRecord>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    fn put(&self, record: ConflictRecord) -> Result<(), StoreError> {
        self.records.write().insert(record.id, record);
        Ok(())
    }

    fn pending(&self) -> Result<Vec<ConflictRecord>, StoreError> {
        let mut pending: Vec<ConflictRecord> = self
            .records
            .read()
            .values()
            .filter(|r| r.status == ConflictStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by_key(|r| (r.created_at, r.file_path.clone()));
        Ok(pending)
    }
}
