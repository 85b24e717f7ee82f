//! # obrador-engine: Inventory, Recipe and Sale Engine
//!
//! Keeps a bakery's raw-material stock, product recipes and sales history
//! consistent with one another.
//!
//! ## Module Organization
//! ```text
//! obrador_engine/
//! ├── lib.rs          ◄─── You are here (exports & tracing setup)
//! ├── bakery.rs       ◄─── Serialized facade (Arc<RwLock<..>>)
//! ├── ledger.rs       ◄─── Inventory Ledger (materials, stock)
//! ├── recipes.rs      ◄─── Recipe Costing Engine (products, cost, margin)
//! ├── sales.rs        ◄─── Sale Transaction Coordinator (preview, commit, stats)
//! ├── ports.rs        ◄─── Reader/writer traits between components
//! ├── clock.rs        ◄─── System and fixed clocks
//! ├── config.rs       ◄─── EngineConfig (env overrides, currency format)
//! ├── error.rs        ◄─── EngineError and ApiError
//! ├── seed.rs         ◄─── Sample catalog
//! └── bin/seed.rs     ◄─── Loads and prints the sample catalog
//! ```
//!
//! ## Quick Start
//! ```rust
//! use obrador_core::{MaterialInput, Money, ProductInput, RecipeLine, SaleInput, Unit};
//! use obrador_engine::{Bakery, EngineConfig};
//! use rust_decimal::Decimal;
//!
//! let bakery = Bakery::new(EngineConfig::default());
//!
//! let harina = bakery.create_material(MaterialInput {
//!     name: "Harina".to_string(),
//!     unit: Unit::Kilogram,
//!     quantity: Decimal::from(10),
//!     unit_cost: Money::from_units(25),
//! })?;
//!
//! let pastel = bakery.create_product(ProductInput {
//!     name: "Pastel".to_string(),
//!     description: None,
//!     reference_price: Money::from_units(450),
//!     recipe: vec![RecipeLine::new(harina.id.clone(), Decimal::new(5, 1))],
//! })?;
//!
//! bakery.commit_sale(SaleInput {
//!     product_id: pastel.id,
//!     unit_price: Money::from_units(450),
//!     quantity: 3,
//! })?;
//!
//! let stock = bakery.get_material(&harina.id)?.map(|m| m.quantity);
//! assert_eq!(stock, Some(Decimal::new(85, 1)));
//! # Ok::<(), obrador_engine::EngineError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bakery;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod ports;
pub mod recipes;
pub mod sales;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use bakery::Bakery;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use error::{ApiError, EngineError, EngineResult, ErrorCode, ErrorKind};
pub use ledger::InventoryLedger;
pub use ports::{InventoryReader, InventoryWriter, ProductReader};
pub use recipes::RecipeBook;
pub use sales::SaleCoordinator;

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=obrador_engine=trace` - Trace the engine only
/// - Default: INFO, DEBUG for obrador crates
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,obrador_core=debug,obrador_store=debug,obrador_engine=debug")
    });

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
