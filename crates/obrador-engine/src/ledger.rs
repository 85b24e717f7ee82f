//! # Inventory Ledger
//!
//! Owns materials and their stock on hand.
//!
//! ## Stock Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Material Lifecycle                                │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → Material { id: uuid v4, quantity ≥ 0, cost > 0 }    │
//! │                                                                         │
//! │  2. RESTOCK / REPRICE                                                  │
//! │     └── update(id, patch) → only supplied fields change                │
//! │                                                                         │
//! │  3. CONSUME (sale commit only)                                         │
//! │     └── verify_sufficient() → decrement()  (same exclusive lock)       │
//! │                                                                         │
//! │  4. DELETE                                                             │
//! │     └── delete(id) → recipes referencing it cost the line at zero      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use obrador_core::validation::{validate_material_input, validate_material_patch};
use obrador_core::{
    Consumption, EntityKind, Material, MaterialInput, MaterialPatch, Money, StockCheck,
    ValidationError, UNKNOWN_MATERIAL_LABEL,
};
use obrador_store::{MemoryRepository, Repository};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::ports::{InventoryReader, InventoryWriter};

/// Materials and their stock.
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger<R = MemoryRepository<Material>> {
    materials: R,
}

impl<R: Repository<Material>> InventoryLedger<R> {
    /// Creates a ledger over the given store.
    pub fn new(materials: R) -> Self {
        InventoryLedger { materials }
    }

    /// Adds a material with a fresh id.
    pub fn create(&mut self, input: MaterialInput) -> EngineResult<Material> {
        debug!(name = %input.name, "Creating material");
        validate_material_input(&input)?;

        let material = Material {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            unit: input.unit,
            quantity: input.quantity,
            unit_cost: input.unit_cost,
        };
        self.materials.insert(material.clone())?;

        info!(id = %material.id, name = %material.name, "Material created");
        Ok(material)
    }

    /// Merges the supplied fields into an existing material.
    pub fn update(&mut self, id: &str, patch: &MaterialPatch) -> EngineResult<()> {
        debug!(id = %id, "Updating material");

        let mut material = self
            .materials
            .get(id)?
            .ok_or_else(|| EngineError::not_found(EntityKind::Material, id))?;
        validate_material_patch(patch)?;

        patch.apply_to(&mut material);
        self.materials.update(material)?;

        info!(id = %id, "Material updated");
        Ok(())
    }

    /// Removes a material. Recipes that reference it are left alone.
    pub fn delete(&mut self, id: &str) -> EngineResult<()> {
        debug!(id = %id, "Deleting material");
        let removed = self.materials.remove(id)?;
        info!(id = %id, name = %removed.name, "Material deleted");
        Ok(())
    }

    pub fn get(&self, id: &str) -> EngineResult<Option<Material>> {
        Ok(self.materials.get(id)?)
    }

    /// All materials, in creation order.
    pub fn list(&self) -> EngineResult<Vec<Material>> {
        Ok(self.materials.list()?)
    }

    /// Materials whose quantity is at or below `threshold`, in creation order.
    pub fn list_low_stock(&self, threshold: Decimal) -> EngineResult<Vec<Material>> {
        let low: Vec<Material> = self
            .materials
            .list()?
            .into_iter()
            .filter(|material| material.quantity <= threshold)
            .collect();

        debug!(threshold = %threshold, count = low.len(), "Listed low stock");
        Ok(low)
    }

    /// Σ(quantity × unit cost) over every material.
    pub fn total_inventory_value(&self) -> EngineResult<Money> {
        let mut total = Money::zero();
        for material in self.materials.list()? {
            total = material
                .stock_value()
                .and_then(|value| total.checked_add(value))
                .ok_or_else(|| ValidationError::too_large("inventory value"))?;
        }
        Ok(total)
    }
}

impl<R: Repository<Material>> InventoryReader for InventoryLedger<R> {
    fn find_material(&self, id: &str) -> EngineResult<Option<Material>> {
        self.get(id)
    }

    /// Missing materials count as insufficient and are reported with a
    /// placeholder name.
    fn verify_sufficient(&self, consumption: &[Consumption]) -> EngineResult<StockCheck> {
        let mut insufficient_names = Vec::new();

        for entry in consumption {
            match self.materials.get(&entry.material_id)? {
                Some(material) if material.quantity >= entry.quantity => {}
                Some(material) => insufficient_names.push(material.name),
                None => insufficient_names.push(UNKNOWN_MATERIAL_LABEL.to_string()),
            }
        }

        Ok(StockCheck {
            ok: insufficient_names.is_empty(),
            insufficient_names,
        })
    }
}

impl<R: Repository<Material>> InventoryWriter for InventoryLedger<R> {
    /// Reads every material and computes its new quantity before the first
    /// write. If a write fails, the materials already written are restored
    /// and the store error is returned.
    fn decrement(&mut self, consumption: &[Consumption]) -> EngineResult<()> {
        // (material as read, remaining quantity)
        let mut plan: Vec<(Material, Decimal)> = Vec::with_capacity(consumption.len());

        for entry in consumption {
            if let Some(planned) = plan.iter_mut().find(|planned| planned.0.id == entry.material_id) {
                planned.1 = floor_at_zero(planned.1, entry.quantity);
                continue;
            }

            let Some(material) = self.materials.get(&entry.material_id)? else {
                debug!(material_id = %entry.material_id, "Skipping decrement of unknown material");
                continue;
            };
            let remaining = floor_at_zero(material.quantity, entry.quantity);
            plan.push((material, remaining));
        }

        for (written, (original, remaining)) in plan.iter().enumerate() {
            let mut updated = original.clone();
            updated.quantity = *remaining;
            debug!(
                id = %updated.id,
                before = %original.quantity,
                remaining = %updated.quantity,
                "Decrementing stock"
            );

            if let Err(err) = self.materials.update(updated) {
                warn!(id = %original.id, error = %err, "Stock write failed, restoring earlier writes");
                self.restore(plan[..written].iter().map(|(material, _)| material));
                return Err(err.into());
            }
        }

        Ok(())
    }
}

impl<R: Repository<Material>> InventoryLedger<R> {
    fn restore<'a>(&mut self, originals: impl Iterator<Item = &'a Material>) {
        for original in originals {
            if let Err(err) = self.materials.update(original.clone()) {
                error!(id = %original.id, error = %err, "Could not restore stock after failed decrement");
            }
        }
    }
}

fn floor_at_zero(quantity: Decimal, consumed: Decimal) -> Decimal {
    quantity
        .checked_sub(consumed)
        .map_or(Decimal::ZERO, |left| left.max(Decimal::ZERO))
}

// =============================================================================
// Unit Tests
// =============================================================================
