//! # obrador-core: Pure Business Logic for Obrador
//!
//! Domain types and rules for a bakery's inventory, recipes and sales.
//! Everything here is a pure function or a plain data type.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Obrador Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (external)                   │   │
//! │  │   Materials page ──► Products page ──► Sale dialog ──► Dashboard│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ library calls                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            obrador-engine (Bakery facade, single writer)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ obrador-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  costing  │  │ validation│  │   │
//! │  │   │ Material  │  │   Money   │  │ cost/marg │  │  schemas  │  │   │
//! │  │   │ Product   │  │           │  │ scaling   │  │  recipes  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Material, Product, Sale, Consumption, ...)
//! - [`money`] - Exact decimal money type
//! - [`costing`] - Recipe cost, margin and scaling math
//! - [`validation`] - Input schemas and recipe rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use obrador_core::costing::{compute_cost, compute_margin};
//! use obrador_core::money::Money;
//! use obrador_core::types::RecipeLine;
//! use rust_decimal::Decimal;
//!
//! let recipe = vec![RecipeLine::new("harina", Decimal::new(5, 1))]; // 0.5 kg
//! let cost = compute_cost(&recipe, |_| Some(Money::new(Decimal::from(25))))?;
//! assert_eq!(cost.total, Money::new(Decimal::new(125, 1))); // 12.5
//!
//! let margin = compute_margin(Money::new(Decimal::from(450)), cost.total);
//! assert_eq!(margin.round_dp(2), Decimal::new(9722, 2)); // 97.22 %
//! # Ok::<(), obrador_core::ValidationError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod costing;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{BusinessRuleError, CoreError, CoreResult, RecipeIssue, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a material or product name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a product description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Default quantity at or below which a material counts as low stock.
///
/// Matches the threshold the bakery has always used on its dashboard.
/// Engines may override it through configuration.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Name reported for a consumption whose material no longer exists.
pub const UNKNOWN_MATERIAL_LABEL: &str = "Unknown material";

/// Name reported for a sale whose product has been deleted.
pub const DELETED_PRODUCT_LABEL: &str = "Deleted product";
