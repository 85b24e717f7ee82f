//! # Sale Transaction Coordinator
//!
//! Owns the append-only sale history. Turns a product and a quantity into a
//! material consumption, checks it against the ledger and commits the sale
//! record plus the stock decrement as one unit.
//!
//! ## Sale Attempt Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Attempt                                      │
//! │                                                                         │
//! │  1. DRAFTING                                                           │
//! │     └── caller fills { product_id, unit_price, quantity }              │
//! │                                                                         │
//! │  2. PREVIEWED                                                          │
//! │     └── preview() → SalePreview { status: Ready | Rejected }           │
//! │         (advisory: nothing is reserved)                                │
//! │                                                                         │
//! │  3. COMMITTED                                                          │
//! │     └── commit()                                                       │
//! │         (a) validate price and quantity                                │
//! │         (b) resolve product                                            │
//! │         (c) scale recipe again (never trust the preview)               │
//! │         (d) verify stock          ─┐                                   │
//! │         (e) append Sale, decrement ─┘ one unit under the write lock    │
//! │                                                                         │
//! │  REJECTED: stock short at (d). No override exists.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, FixedOffset, Offset, Utc};
use obrador_core::costing::{self, scale_recipe};
use obrador_core::validation::{validate_period, validate_sale_input};
use obrador_core::{
    BestSeller, BusinessRuleError, Consumption, ConsumptionDetail, EntityKind, Money,
    PreviewStatus, Sale, SaleDetail, SaleInput, SalePreview, SalesStatistics,
    ValidationError, DELETED_PRODUCT_LABEL, UNKNOWN_MATERIAL_LABEL,
};
use obrador_store::{MemoryRepository, Repository};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::error::{EngineError, EngineResult};
use crate::ports::{InventoryReader, InventoryWriter, ProductReader};
use crate::recipes::compute_cost;

/// The sale history and the rules for adding to it.
pub struct SaleCoordinator<R = MemoryRepository<Sale>> {
    sales: R,
    clock: Arc<dyn Clock>,
    offset: FixedOffset,
}

impl<R: std::fmt::Debug> std::fmt::Debug for SaleCoordinator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaleCoordinator")
            .field("sales", &self.sales)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Default for SaleCoordinator {
    /// Empty history, system clock, UTC calendar.
    fn default() -> Self {
        SaleCoordinator::new(
            MemoryRepository::new(),
            Arc::new(SystemClock),
            Utc.fix(),
        )
    }
}

impl<R: Repository<Sale>> SaleCoordinator<R> {
    /// Creates a coordinator over the given store.
    ///
    /// `offset` decides which calendar day and month a sale falls in.
    pub fn new(sales: R, clock: Arc<dyn Clock>, offset: FixedOffset) -> Self {
        SaleCoordinator { sales, clock, offset }
    }

    // =========================================================================
    // Preview & Commit
    // =========================================================================

    /// The product's recipe multiplied by `quantity`.
    ///
    /// A quantity whose scaled lines do not fit in a decimal is a
    /// `Validation` error.
    pub fn scale_recipe<P: ProductReader>(
        &self,
        products: &P,
        product_id: &str,
        quantity: i64,
    ) -> EngineResult<Vec<Consumption>> {
        let product = products
            .find_product(product_id)?
            .ok_or_else(|| EngineError::not_found(EntityKind::Product, product_id))?;
        Ok(scale_recipe(&product.recipe, quantity)?)
    }

    /// Builds the advisory summary shown before a sale is confirmed.
    ///
    /// Returns `None` when the product cannot be resolved. Nothing is
    /// reserved; [`commit`](Self::commit) checks everything again.
    pub fn preview<P, I>(
        &self,
        products: &P,
        inventory: &I,
        input: &SaleInput,
    ) -> EngineResult<Option<SalePreview>>
    where
        P: ProductReader,
        I: InventoryReader,
    {
        debug!(product_id = %input.product_id, quantity = input.quantity, "Previewing sale");

        let Some(product) = products.find_product(&input.product_id)? else {
            debug!(product_id = %input.product_id, "Preview for unknown product");
            return Ok(None);
        };

        let consumption = scale_recipe(&product.recipe, input.quantity)?;
        let total = sale_total(input)?;
        let total_cost = compute_cost(&product.recipe, inventory)?
            .total
            .checked_multiply_quantity(input.quantity)
            .ok_or_else(|| ValidationError::too_large("cost"))?;
        let check = inventory.verify_sufficient(&consumption)?;

        let mut lines = Vec::with_capacity(consumption.len());
        for entry in consumption {
            let detail = match inventory.find_material(&entry.material_id)? {
                Some(material) => ConsumptionDetail {
                    sufficient: material.quantity >= entry.quantity,
                    name: material.name,
                    unit: Some(material.unit),
                    current_stock: material.quantity,
                    required: entry.quantity,
                    material_id: entry.material_id,
                },
                None => ConsumptionDetail {
                    name: UNKNOWN_MATERIAL_LABEL.to_string(),
                    unit: None,
                    current_stock: Decimal::ZERO,
                    sufficient: false,
                    required: entry.quantity,
                    material_id: entry.material_id,
                },
            };
            lines.push(detail);
        }

        let status = if check.ok {
            PreviewStatus::Ready
        } else {
            PreviewStatus::Rejected
        };

        Ok(Some(SalePreview {
            product_id: product.id,
            product_name: product.name,
            reference_price: product.reference_price,
            unit_price: input.unit_price,
            quantity: input.quantity,
            total,
            total_cost,
            lines,
            sufficient: check.ok,
            insufficient_names: check.insufficient_names,
            status,
        }))
    }

    /// Records a sale and consumes its materials.
    ///
    /// Every check runs before the first write, so a failed commit leaves
    /// the sale history and the ledger untouched.
    ///
    /// ## Errors
    /// - `Validation` if the unit price is not positive, the quantity is
    ///   not a positive integer, or the total does not fit in a decimal
    /// - `NotFound` if the product does not exist
    /// - `BusinessRule::InsufficientStock` naming the materials that fall short
    pub fn commit<P, I>(&mut self, products: &P, inventory: &mut I, input: SaleInput) -> EngineResult<Sale>
    where
        P: ProductReader,
        I: InventoryReader + InventoryWriter,
    {
        debug!(product_id = %input.product_id, quantity = input.quantity, "Committing sale");

        validate_sale_input(&input)?;
        let total = sale_total(&input)?;
        let consumption = self.scale_recipe(products, &input.product_id, input.quantity)?;

        let check = inventory.verify_sufficient(&consumption)?;
        if !check.ok {
            warn!(
                product_id = %input.product_id,
                quantity = input.quantity,
                missing = ?check.insufficient_names,
                "Sale rejected: insufficient stock"
            );
            return Err(BusinessRuleError::InsufficientStock {
                missing: check.insufficient_names,
            }
            .into());
        }

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            product_id: input.product_id,
            unit_price: input.unit_price,
            quantity: input.quantity,
            created_at: self.clock.now(),
            consumption,
        };
        self.sales.insert(sale.clone())?;

        if let Err(err) = inventory.decrement(&sale.consumption) {
            // Keep the history consistent with the ledger
            if let Err(rollback) = self.sales.remove(&sale.id) {
                warn!(id = %sale.id, error = %rollback, "Could not withdraw sale after failed decrement");
            }
            return Err(err);
        }

        info!(
            id = %sale.id,
            product_id = %sale.product_id,
            quantity = sale.quantity,
            total = %total,
            "Sale committed"
        );
        Ok(sale)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Dashboard figures for one calendar month (1-12) of `year`.
    ///
    /// Cost values each sale's frozen consumption at CURRENT material prices.
    /// The best seller is the product with the highest summed quantity; ties
    /// go to the product that sold first.
    pub fn statistics<P, I>(
        &self,
        products: &P,
        inventory: &I,
        month: u32,
        year: i32,
    ) -> EngineResult<SalesStatistics>
    where
        P: ProductReader,
        I: InventoryReader,
    {
        debug!(month, year, "Computing sales statistics");
        validate_period(month, year)?;

        let sales: Vec<Sale> = self
            .sales
            .list()?
            .into_iter()
            .filter(|sale| {
                let local = sale.created_at.with_timezone(&self.offset);
                local.month() == month && local.year() == year
            })
            .collect();

        let prices = inventory.unit_costs(
            sales
                .iter()
                .flat_map(|sale| sale.consumption.iter())
                .map(|entry| entry.material_id.as_str()),
        )?;

        let mut revenue = Money::zero();
        let mut cost = Money::zero();
        for sale in &sales {
            revenue = sale
                .total()
                .and_then(|total| revenue.checked_add(total))
                .ok_or_else(|| ValidationError::too_large("revenue"))?;
            let sale_cost = costing::consumption_cost(&sale.consumption, |id| prices.get(id).copied())?;
            cost = cost
                .checked_add(sale_cost.total)
                .ok_or_else(|| ValidationError::too_large("cost"))?;
        }
        let balance = revenue
            .checked_sub(cost)
            .ok_or_else(|| ValidationError::too_large("balance"))?;

        let best_seller = match best_selling(&sales) {
            Some((product_id, quantity)) => {
                let name = products
                    .find_product(&product_id)?
                    .map(|product| product.name)
                    .unwrap_or_else(|| DELETED_PRODUCT_LABEL.to_string());
                Some(BestSeller {
                    product_id,
                    name,
                    quantity,
                })
            }
            None => None,
        };

        Ok(SalesStatistics {
            month,
            year,
            revenue,
            cost,
            balance,
            transactions: sales.len(),
            best_seller,
        })
    }

    /// Sales whose local calendar date is today.
    pub fn sales_today(&self) -> EngineResult<Vec<Sale>> {
        let today = self.clock.now().with_timezone(&self.offset).date_naive();
        Ok(self
            .sales
            .list()?
            .into_iter()
            .filter(|sale| sale.created_at.with_timezone(&self.offset).date_naive() == today)
            .collect())
    }

    /// All sales, oldest first.
    pub fn list(&self) -> EngineResult<Vec<Sale>> {
        Ok(self.sales.list()?)
    }

    /// Sales with their product's current name, newest first.
    pub fn list_with_detail<P: ProductReader>(&self, products: &P) -> EngineResult<Vec<SaleDetail>> {
        let mut names: HashMap<String, String> = HashMap::new();
        let mut details = Vec::new();

        for sale in self.sales.list()?.into_iter().rev() {
            let product_name = match names.get(&sale.product_id) {
                Some(name) => name.clone(),
                None => {
                    let name = products
                        .find_product(&sale.product_id)?
                        .map(|product| product.name)
                        .unwrap_or_else(|| DELETED_PRODUCT_LABEL.to_string());
                    names.insert(sale.product_id.clone(), name.clone());
                    name
                }
            };
            details.push(SaleDetail { sale, product_name });
        }

        // Stable: same-instant sales stay newest-inserted first
        details.sort_by(|a, b| b.sale.created_at.cmp(&a.sale.created_at));
        Ok(details)
    }
}

fn sale_total(input: &SaleInput) -> EngineResult<Money> {
    Ok(input
        .unit_price
        .checked_multiply_quantity(input.quantity)
        .ok_or_else(|| ValidationError::too_large("total"))?)
}

/// Product with the highest summed quantity; first-sold wins ties.
fn best_selling(sales: &[Sale]) -> Option<(String, i64)> {
    let mut order: Vec<(String, i64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sale in sales {
        match index.get(sale.product_id.as_str()) {
            Some(&i) => order[i].1 = order[i].1.saturating_add(sale.quantity),
            None => {
                index.insert(sale.product_id.as_str(), order.len());
                order.push((sale.product_id.clone(), sale.quantity));
            }
        }
    }

    order.into_iter().fold(None, |best, candidate| match best {
        Some(current) if current.1 >= candidate.1 => Some(current),
        _ => Some(candidate),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
