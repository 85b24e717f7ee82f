//! # Engine Error Types
//!
//! `EngineError` is what every engine operation returns; `ApiError` is the
//! serialized shape handed to a presentation layer.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Obrador                                │
//! │                                                                         │
//! │  Presentation                Rust Engine                                │
//! │  ────────────                ───────────                                │
//! │                                                                         │
//! │  bakery.commit_sale(input)                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Engine operation                                                │  │
//! │  │  EngineResult<T>                                                 │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad input? ───── CoreError::Validation ──────────┐             │  │
//! │  │         │                                         │             │  │
//! │  │         ▼                                         ▼             │  │
//! │  │  Missing id? ──── StoreError::NotFound ──► CoreError::NotFound  │  │
//! │  │         │                                         │             │  │
//! │  │         ▼                                         ▼             │  │
//! │  │  Stock short? ─── BusinessRuleError ──────── ApiError ─────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_STOCK",                                        │
//! │    "message": "insufficient stock: Harina",                             │
//! │    "missing": ["Harina"] }                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use obrador_core::{BusinessRuleError, CoreError, EntityKind};
use obrador_store::StoreError;
use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Engine Error
// =============================================================================

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Validation, missing id or business rule.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The record store failed.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// A thread panicked while holding the state lock.
    #[error("Engine state lock poisoned")]
    StatePoisoned,
}

/// The error kinds a caller branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    BusinessRule,
    Internal,
}

impl EngineError {
    /// Creates a NotFound error for a given entity kind and id.
    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        EngineError::Core(CoreError::not_found(entity, id))
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Core(CoreError::Validation(_)) => ErrorKind::Validation,
            EngineError::Core(CoreError::NotFound { .. }) => ErrorKind::NotFound,
            EngineError::Core(CoreError::BusinessRule(_)) => ErrorKind::BusinessRule,
            EngineError::Store(_) | EngineError::StatePoisoned => ErrorKind::Internal,
        }
    }
}

/// Store misses are domain misses; everything else stays a store failure.
impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => EngineError::not_found(entity, id),
            other => EngineError::Store(other),
        }
    }
}

impl From<obrador_core::ValidationError> for EngineError {
    fn from(err: obrador_core::ValidationError) -> Self {
        EngineError::Core(err.into())
    }
}

impl From<BusinessRuleError> for EngineError {
    fn from(err: BusinessRuleError) -> Self {
        EngineError::Core(err.into())
    }
}

impl From<obrador_core::RecipeIssue> for EngineError {
    fn from(issue: obrador_core::RecipeIssue) -> Self {
        EngineError::Core(issue.into())
    }
}

/// Convenience type alias for Results with EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// API Error
// =============================================================================

/// Error payload for a presentation layer.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 3f2a..."
/// }
/// ```
/// `missing` is only present for `INSUFFICIENT_STOCK`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Materials that fell short, in recipe order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Resource not found
    NotFound,

    /// Domain rule violated (invalid recipe)
    BusinessRule,

    /// Not enough stock to commit the sale
    InsufficientStock,

    /// Store or lock failure
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            missing: Vec::new(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts engine errors to API errors.
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Core(CoreError::Validation(e)) => {
                ApiError::new(ErrorCode::ValidationError, e.to_string())
            }
            EngineError::Core(e @ CoreError::NotFound { .. }) => {
                ApiError::new(ErrorCode::NotFound, e.to_string())
            }
            EngineError::Core(CoreError::BusinessRule(BusinessRuleError::InsufficientStock {
                missing,
            })) => {
                let message =
                    BusinessRuleError::InsufficientStock { missing: missing.clone() }.to_string();
                ApiError {
                    code: ErrorCode::InsufficientStock,
                    message,
                    missing,
                }
            }
            EngineError::Core(CoreError::BusinessRule(e)) => {
                ApiError::new(ErrorCode::BusinessRule, e.to_string())
            }
            EngineError::Store(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Store operation failed: {}", e);
                ApiError::internal("Store operation failed")
            }
            EngineError::StatePoisoned => {
                tracing::error!("Engine state lock poisoned");
                ApiError::internal("Engine state unavailable")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
