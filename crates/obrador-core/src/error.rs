//! # Error Types
//!
//! Domain-specific error types for obrador-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  obrador-core errors (this file)                                       │
//! │  ├── CoreError          - The three kinds callers must distinguish     │
//! │  │   ├── Validation       malformed / out-of-range input               │
//! │  │   ├── NotFound         id missing from its collection               │
//! │  │   └── BusinessRule     domain rule violated                         │
//! │  ├── ValidationError    - Which field failed and how                   │
//! │  ├── BusinessRuleError  - Recipe rules, insufficient stock             │
//! │  └── RecipeIssue        - Structured recipe validation reason          │
//! │                                                                         │
//! │  obrador-store errors (separate crate)                                 │
//! │  └── StoreError         - Record store failures                        │
//! │                                                                         │
//! │  obrador-engine errors                                                 │
//! │  ├── EngineError        - Core + Store + lock failures                 │
//! │  └── ApiError           - What the presentation layer sees             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → ApiError            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is detected before any mutation, so all three kinds are
//! safe to retry once the input or id is corrected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::EntityKind;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Input failed a schema rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Referenced id does not exist.
    ///
    /// ## When This Occurs
    /// - Updating or deleting a material/product that was already deleted
    /// - Committing a sale for a product removed after the preview
    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    /// A domain rule was violated.
    #[error("{0}")]
    BusinessRule(#[from] BusinessRuleError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity kind and id.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<RecipeIssue> for CoreError {
    fn from(issue: RecipeIssue) -> Self {
        CoreError::BusinessRule(BusinessRuleError::InvalidRecipe(issue))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly greater than zero.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// A derived amount (total, cost, scaled quantity) does not fit in a
    /// decimal.
    #[error("{field} is too large")]
    TooLarge { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Creates a TooLarge error for `field`.
    pub fn too_large(field: &str) -> Self {
        ValidationError::TooLarge {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Business Rule Error
// =============================================================================

/// Domain rules that well-formed input can still violate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusinessRuleError {
    /// The recipe breaks a structural rule.
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(RecipeIssue),

    /// Not enough stock to cover the sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Sell 50 × Pastel (needs 25 kg Harina)
    ///      │
    ///      ▼
    /// Check stock: Harina = 8.5 kg
    ///      │
    ///      ▼
    /// InsufficientStock { missing: ["Harina"] }
    ///      │
    ///      ▼
    /// UI shows: "insufficient stock: Harina"
    /// ```
    #[error("insufficient stock: {}", .missing.join(", "))]
    InsufficientStock { missing: Vec<String> },
}

// =============================================================================
// Recipe Issue
// =============================================================================

/// Why a recipe failed validation.
///
/// Returned as data by `validate_recipe` so forms can give live feedback
/// without going through an error path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RecipeIssue {
    /// The recipe has no lines.
    #[error("empty recipe")]
    Empty,

    /// The same material appears on more than one line.
    #[error("duplicate material")]
    DuplicateMaterial { material_id: String },

    /// A line uses zero or a negative quantity.
    #[error("invalid quantity")]
    InvalidQuantity { material_id: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
