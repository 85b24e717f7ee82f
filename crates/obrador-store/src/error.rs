//! # Store Error Types
//!
//! Error types for record store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Backend failure (host store) / missing id / duplicate id              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds entity and id context                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EngineError (obrador-engine) ← NotFound reclassified as domain kind   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError ← Serialized for the presentation layer                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use obrador_core::EntityKind;
use thiserror::Error;

/// Record store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this id.
    ///
    /// ## When This Occurs
    /// - `update` or `remove` on an id that was never inserted
    /// - The record was removed by an earlier call
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// A record with this id already exists.
    #[error("Duplicate {entity} id: '{id}' already exists")]
    Duplicate { entity: EntityKind, id: String },

    /// The backing store could not serve the request.
    ///
    /// Never produced by the in-memory store; reserved for host stores
    /// (disk full, connection lost, ...).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity kind and id.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(entity: EntityKind, id: impl Into<String>) -> Self {
        StoreError::Duplicate {
            entity,
            id: id.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
