//! Record store trait definition.
//!
//! A `RecordStore` owns one persisted collection. The catalog, directory and
//! loan manager only ever talk to stores through this trait, so the same
//! business rules run against files on disk or against memory in tests.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{LibraryError, Result};

/// A record kind that can live in a store.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Unique key type.
    type Key: Copy + Eq + fmt::Display + fmt::Debug;

    /// Singular label used in messages ("book").
    const KIND: &'static str;

    /// Collection name, also the file stem on disk ("books").
    const COLLECTION: &'static str;

    fn key(&self) -> Self::Key;
}

/// Persistence for one collection of records.
///
/// Implementations only provide `load` and `save`; the keyed operations are
/// built on top of them. Every mutating call rewrites the whole collection.
/// There is no isolation between processes; one running instance is assumed.
pub trait RecordStore<R: Record> {
    /// Load the full collection in insertion order.
    ///
    /// A collection that has never been saved is empty.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the backing data cannot be read or
    /// parsed.
    fn load(&self) -> Result<Vec<R>>;

    /// Replace the full collection.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Storage` if the collection cannot be written.
    fn save(&mut self, records: &[R]) -> Result<()>;

    /// Find a record by key.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotFound` if no record has this key.
    fn find(&self, key: R::Key) -> Result<R> {
        self.load()?
            .into_iter()
            .find(|record| record.key() == key)
            .ok_or_else(|| not_found::<R>(key))
    }

    /// Check whether a record with this key exists.
    fn contains(&self, key: R::Key) -> Result<bool> {
        Ok(self.load()?.iter().any(|record| record.key() == key))
    }

    /// Replace the record with the same key in place, or append it.
    fn upsert(&mut self, record: R) -> Result<()> {
        let mut records = self.load()?;
        match records.iter_mut().find(|r| r.key() == record.key()) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.save(&records)
    }

    /// Remove a record by key and return it.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NotFound` if no record has this key; nothing is
    /// written in that case.
    fn delete(&mut self, key: R::Key) -> Result<R> {
        let mut records = self.load()?;
        let position = records
            .iter()
            .position(|record| record.key() == key)
            .ok_or_else(|| not_found::<R>(key))?;
        let removed = records.remove(position);
        self.save(&records)?;
        Ok(removed)
    }
}

/// Standard `NotFound` error for a record kind.
pub fn not_found<R: Record>(key: R::Key) -> LibraryError {
    LibraryError::NotFound(format!("{} {}", R::KIND, key))
}

/// Next integer key: one past the largest in use, starting at 1.
pub fn next_id<R: Record<Key = u32>>(records: &[R]) -> u32 {
    records
        .iter()
        .map(|record| record.key())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}
