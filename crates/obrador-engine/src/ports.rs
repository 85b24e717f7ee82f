//! # Component Ports
//!
//! The narrow interfaces one component uses to reach another.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Reads Whom                                       │
//! │                                                                         │
//! │  SaleCoordinator ──ProductReader──► RecipeBook                         │
//! │        │                                │                               │
//! │        │                                └──InventoryReader──┐          │
//! │        │                                                    ▼          │
//! │        ├──────────InventoryReader──────────────────► InventoryLedger   │
//! │        └──────────InventoryWriter (commit only)────► InventoryLedger   │
//! │                                                                         │
//! │  Lower components never read higher ones.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ports are passed as parameters on each call, never stored, so no
//! component holds a reference into another.

use std::collections::HashMap;

use obrador_core::{Consumption, Material, Money, Product, StockCheck};

use crate::error::EngineResult;

/// Read access to materials and stock.
pub trait InventoryReader {
    /// Looks a material up by id.
    fn find_material(&self, id: &str) -> EngineResult<Option<Material>>;

    /// Checks a consumption list against stock on hand.
    fn verify_sufficient(&self, consumption: &[Consumption]) -> EngineResult<StockCheck>;

    /// Current unit costs of the given materials, keyed by id.
    ///
    /// Ids that no longer resolve are absent from the map.
    fn unit_costs<'a, I>(&self, ids: I) -> EngineResult<HashMap<String, Money>>
    where
        I: IntoIterator<Item = &'a str>,
        Self: Sized,
    {
        let mut costs = HashMap::new();
        for id in ids {
            if costs.contains_key(id) {
                continue;
            }
            if let Some(material) = self.find_material(id)? {
                costs.insert(material.id, material.unit_cost);
            }
        }
        Ok(costs)
    }
}

/// Stock mutation.
///
/// Never re-verifies. The only production caller is sale commit, which
/// verifies first under the same exclusive lock.
pub trait InventoryWriter {
    /// Lowers stock by each entry, flooring at zero; unknown ids are skipped.
    fn decrement(&mut self, consumption: &[Consumption]) -> EngineResult<()>;
}

/// Read access to products and their recipes.
pub trait ProductReader {
    /// Looks a product up by id.
    fn find_product(&self, id: &str) -> EngineResult<Option<Product>>;
}
