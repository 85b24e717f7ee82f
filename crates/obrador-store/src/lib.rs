//! # obrador-store: Record Store Layer for Obrador
//!
//! The engine never owns a concrete collection type. Each component is
//! generic over [`Repository`], so the same ledger, recipe and sales logic
//! runs against the in-memory store here or against a persistent store
//! supplied by the host application.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Obrador Data Flow                                │
//! │                                                                         │
//! │  Bakery facade (commit_sale)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  obrador-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────────────┐        ┌──────────────────────────┐ │   │
//! │  │   │  Repository<T>       │        │  MemoryRepository<T>     │ │   │
//! │  │   │  (the contract)      │◄───────│  Vec, insertion order    │ │   │
//! │  │   │  insert/get/update/  │        │                          │ │   │
//! │  │   │  remove/list         │        │  (or any host store)     │ │   │
//! │  │   └──────────────────────┘        └──────────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`repository`] - The `Repository` trait and its in-memory implementation
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use obrador_core::{Material, Money, Unit};
//! use obrador_store::{MemoryRepository, Repository};
//! use rust_decimal::Decimal;
//!
//! let mut materials = MemoryRepository::<Material>::new();
//! materials.insert(Material {
//!     id: "1".to_string(),
//!     name: "Harina".to_string(),
//!     unit: Unit::Kilogram,
//!     quantity: Decimal::from(10),
//!     unit_cost: Money::from_units(25),
//! })?;
//!
//! assert_eq!(materials.list()?.len(), 1);
//! # Ok::<(), obrador_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use repository::memory::MemoryRepository;
pub use repository::Repository;
