//! # In-Memory Repository
//!
//! `Vec`-backed implementation of [`Repository`]. Collections in a bakery
//! hold tens to hundreds of records, so linear lookups keep the code simple
//! and insertion order comes for free.

use obrador_core::Entity;
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;

/// In-memory record store for one collection.
#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    records: Vec<T>,
}

impl<T> MemoryRepository<T> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        MemoryRepository {
            records: Vec::new(),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the repository holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Entity> MemoryRepository<T> {
    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity + Clone> Repository<T> for MemoryRepository<T> {
    fn insert(&mut self, record: T) -> StoreResult<()> {
        if self.position(record.id()).is_some() {
            return Err(StoreError::duplicate(T::KIND, record.id()));
        }

        trace!(entity = %T::KIND, id = %record.id(), "Inserting record");
        self.records.push(record);
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<T>> {
        Ok(self.position(id).map(|index| self.records[index].clone()))
    }

    fn update(&mut self, record: T) -> StoreResult<()> {
        let index = self
            .position(record.id())
            .ok_or_else(|| StoreError::not_found(T::KIND, record.id()))?;

        trace!(entity = %T::KIND, id = %record.id(), "Updating record");
        self.records[index] = record;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> StoreResult<T> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;

        trace!(entity = %T::KIND, id = %id, "Removing record");
        Ok(self.records.remove(index))
    }

    fn list(&self) -> StoreResult<Vec<T>> {
        Ok(self.records.clone())
    }

    fn contains(&self, id: &str) -> StoreResult<bool> {
        Ok(self.position(id).is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
