//! In-memory record store.

use super::traits::{Record, RecordStore};
use crate::error::Result;

/// Record store backed by a `Vec`.
///
/// Counts `save` calls so callers can assert that a rejected operation
/// wrote nothing.
#[derive(Debug, Clone)]
pub struct MemoryStore<R> {
    records: Vec<R>,
    saves: usize,
}

impl<R> MemoryStore<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records,
            saves: 0,
        }
    }

    /// Number of times the collection has been rewritten.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> for MemoryStore<R> {
    fn load(&self) -> Result<Vec<R>> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[R]) -> Result<()> {
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }
}
