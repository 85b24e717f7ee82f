//! # Repository Module
//!
//! The record-store contract every engine component is written against.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  InventoryLedger<R: Repository<Material>>                              │
//! │       │                                                                 │
//! │       │  self.materials.get("harina-id")                               │
//! │       ▼                                                                 │
//! │  Repository<T>                                                         │
//! │  ├── insert(&mut self, record)                                         │
//! │  ├── get(&self, id)                                                    │
//! │  ├── update(&mut self, record)                                         │
//! │  ├── remove(&mut self, id)                                             │
//! │  └── list(&self)              ← insertion order, always                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MemoryRepository<T>  |  host-supplied persistent store                │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Engine logic never touches a concrete collection                    │
//! │  • Tests inject the in-memory store (or a failing fake)                │
//! │  • No process-wide singleton                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod memory;

use obrador_core::Entity;

use crate::error::StoreResult;

/// CRUD access to one collection of records.
///
/// ## Contract
/// - `list` returns records in insertion order; `update` keeps a record's
///   position.
/// - `insert` fails with `Duplicate` if the id is taken.
/// - `update` and `remove` fail with `NotFound` if the id is absent.
/// - A failed call leaves the collection unchanged.
pub trait Repository<T: Entity + Clone> {
    /// Appends a new record.
    fn insert(&mut self, record: T) -> StoreResult<()>;

    /// Looks a record up by id.
    fn get(&self, id: &str) -> StoreResult<Option<T>>;

    /// Replaces the record with the same id.
    fn update(&mut self, record: T) -> StoreResult<()>;

    /// Removes and returns the record with this id.
    fn remove(&mut self, id: &str) -> StoreResult<T>;

    /// All records, in insertion order.
    fn list(&self) -> StoreResult<Vec<T>>;

    /// Whether a record with this id exists.
    fn contains(&self, id: &str) -> StoreResult<bool> {
        Ok(self.get(id)?.is_some())
    }
}
