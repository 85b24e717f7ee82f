//! # Bakery Facade
//!
//! The single entry point a host application holds. Wraps the three
//! components behind one lock so a stock check and the decrement that
//! follows it can never interleave with another sale.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bakery State Access                                  │
//! │                                                                         │
//! │  Caller                    Lock              Components                 │
//! │  ──────                    ────              ──────────                 │
//! │                                                                         │
//! │  create_material() ──────► write ──────────► ledger                    │
//! │  update_product()  ──────► write ──────────► recipes                   │
//! │  commit_sale()     ──────► write ──────────► recipes (read)            │
//! │                                              ledger  (verify+decrement)│
//! │                                              sales   (append)          │
//! │                                                                         │
//! │  list_*() / preview_sale() / statistics()                              │
//! │                    ──────► read  ──────────► consistent snapshot        │
//! │                                                                         │
//! │  NOTE: writers hold the lock for the WHOLE operation. Readers never    │
//! │        see a sale recorded without its stock decrement.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no `decrement` here. Outside an explicit edit, stock only drops
//! through [`Bakery::commit_sale`].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use obrador_core::costing::RecipeCost;
use obrador_core::{
    Consumption, Material, MaterialInput, MaterialPatch, Money, Product, ProductCosting,
    ProductInput, ProductPatch, RecipeIssue, RecipeLine, Sale, SaleDetail, SaleInput,
    SalePreview, SalesStatistics, StockCheck,
};
use obrador_store::{MemoryRepository, Repository};
use rust_decimal::Decimal;
use tracing::{error, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::ledger::InventoryLedger;
use crate::ports::InventoryReader;
use crate::recipes::{self, RecipeBook};
use crate::sales::SaleCoordinator;

/// Everything the lock protects.
struct BakeryState<M, P, S> {
    ledger: InventoryLedger<M>,
    recipes: RecipeBook<P>,
    sales: SaleCoordinator<S>,
}

/// Shared handle to the engine. Cheap to clone; clones share state.
pub struct Bakery<
    M = MemoryRepository<Material>,
    P = MemoryRepository<Product>,
    S = MemoryRepository<Sale>,
> {
    state: Arc<RwLock<BakeryState<M, P, S>>>,
    config: Arc<EngineConfig>,
}

impl<M, P, S> Clone for Bakery<M, P, S> {
    fn clone(&self) -> Self {
        Bakery {
            state: Arc::clone(&self.state),
            config: Arc::clone(&self.config),
        }
    }
}

impl Bakery {
    /// An empty in-memory bakery on the system clock.
    pub fn new(config: EngineConfig) -> Self {
        Bakery::with_clock(config, Arc::new(SystemClock))
    }

    /// An empty in-memory bakery on the given clock.
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Bakery::with_stores(
            config,
            clock,
            MemoryRepository::new(),
            MemoryRepository::new(),
            MemoryRepository::new(),
        )
    }
}

impl Default for Bakery {
    fn default() -> Self {
        Bakery::new(EngineConfig::default())
    }
}

impl<M, P, S> Bakery<M, P, S>
where
    M: Repository<Material>,
    P: Repository<Product>,
    S: Repository<Sale>,
{
    /// A bakery over host-supplied record stores.
    pub fn with_stores(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        materials: M,
        products: P,
        sales: S,
    ) -> Self {
        let offset = config.utc_offset();
        let state = BakeryState {
            ledger: InventoryLedger::new(materials),
            recipes: RecipeBook::new(products),
            sales: SaleCoordinator::new(sales, clock, offset),
        };

        Bakery {
            state: Arc::new(RwLock::new(state)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Lock Helpers
    // =========================================================================

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, BakeryState<M, P, S>>> {
        self.state.read().map_err(|_| {
            error!("Bakery state lock poisoned (read)");
            EngineError::StatePoisoned
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, BakeryState<M, P, S>>> {
        self.state.write().map_err(|_| {
            error!("Bakery state lock poisoned (write)");
            EngineError::StatePoisoned
        })
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub fn create_material(&self, input: MaterialInput) -> EngineResult<Material> {
        self.write()?.ledger.create(input)
    }

    pub fn update_material(&self, id: &str, patch: &MaterialPatch) -> EngineResult<()> {
        self.write()?.ledger.update(id, patch)
    }

    pub fn delete_material(&self, id: &str) -> EngineResult<()> {
        self.write()?.ledger.delete(id)
    }

    pub fn get_material(&self, id: &str) -> EngineResult<Option<Material>> {
        self.read()?.ledger.get(id)
    }

    pub fn list_materials(&self) -> EngineResult<Vec<Material>> {
        self.read()?.ledger.list()
    }

    /// Materials at or below `threshold`.
    pub fn list_low_stock(&self, threshold: Decimal) -> EngineResult<Vec<Material>> {
        self.read()?.ledger.list_low_stock(threshold)
    }

    /// Materials at or below the configured threshold.
    pub fn low_stock(&self) -> EngineResult<Vec<Material>> {
        let low = self.list_low_stock(self.config.low_stock_threshold)?;
        if !low.is_empty() {
            warn!(
                count = low.len(),
                threshold = %self.config.low_stock_threshold,
                "Materials running low"
            );
        }
        Ok(low)
    }

    pub fn total_inventory_value(&self) -> EngineResult<Money> {
        self.read()?.ledger.total_inventory_value()
    }

    pub fn verify_sufficient(&self, consumption: &[Consumption]) -> EngineResult<StockCheck> {
        self.read()?.ledger.verify_sufficient(consumption)
    }

    // =========================================================================
    // Products & Costing
    // =========================================================================

    /// Pure recipe check for live form feedback. Takes no lock.
    pub fn validate_recipe(&self, lines: &[RecipeLine]) -> Result<(), RecipeIssue> {
        recipes::validate_recipe(lines)
    }

    /// Costs recipe lines at current prices.
    pub fn compute_cost(&self, lines: &[RecipeLine]) -> EngineResult<RecipeCost> {
        let state = self.read()?;
        recipes::compute_cost(lines, &state.ledger)
    }

    pub fn compute_margin(&self, reference_price: Money, cost: Money) -> Decimal {
        recipes::compute_margin(reference_price, cost)
    }

    pub fn create_product(&self, input: ProductInput) -> EngineResult<Product> {
        self.write()?.recipes.create(input)
    }

    pub fn update_product(&self, id: &str, patch: &ProductPatch) -> EngineResult<()> {
        self.write()?.recipes.update(id, patch)
    }

    pub fn delete_product(&self, id: &str) -> EngineResult<()> {
        self.write()?.recipes.delete(id)
    }

    pub fn get_product(&self, id: &str) -> EngineResult<Option<Product>> {
        self.read()?.recipes.get(id)
    }

    pub fn list_products(&self) -> EngineResult<Vec<Product>> {
        self.read()?.recipes.list()
    }

    pub fn list_products_with_costing(&self) -> EngineResult<Vec<ProductCosting>> {
        let state = self.read()?;
        state.recipes.list_with_costing(&state.ledger)
    }

    // =========================================================================
    // Sales
    // =========================================================================

    pub fn scale_recipe(&self, product_id: &str, quantity: i64) -> EngineResult<Vec<Consumption>> {
        let state = self.read()?;
        state.sales.scale_recipe(&state.recipes, product_id, quantity)
    }

    /// Advisory summary; `None` when the product does not exist.
    pub fn preview_sale(&self, input: &SaleInput) -> EngineResult<Option<SalePreview>> {
        let state = self.read()?;
        state.sales.preview(&state.recipes, &state.ledger, input)
    }

    /// Verifies stock, appends the sale and decrements stock under one
    /// exclusive lock.
    pub fn commit_sale(&self, input: SaleInput) -> EngineResult<Sale> {
        let mut guard = self.write()?;
        let BakeryState {
            ledger,
            recipes,
            sales,
        } = &mut *guard;
        sales.commit(&*recipes, ledger, input)
    }

    pub fn statistics(&self, month: u32, year: i32) -> EngineResult<SalesStatistics> {
        let state = self.read()?;
        state.sales.statistics(&state.recipes, &state.ledger, month, year)
    }

    pub fn sales_today(&self) -> EngineResult<Vec<Sale>> {
        self.read()?.sales.sales_today()
    }

    pub fn list_sales(&self) -> EngineResult<Vec<Sale>> {
        self.read()?.sales.list()
    }

    /// Sales joined with product names, newest first.
    pub fn list_sales_with_detail(&self) -> EngineResult<Vec<SaleDetail>> {
        let state = self.read()?;
        state.sales.list_with_detail(&state.recipes)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
