//! # Recipe Costing Engine
//!
//! Owns products and their recipes. Cost and margin are derived from the
//! ledger's CURRENT prices on every call; nothing is cached.
//!
//! ## Costing Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    list_with_costing()                                  │
//! │                                                                         │
//! │  RecipeBook ── products ──┐                                            │
//! │                           ▼                                            │
//! │              for each product:                                         │
//! │                unit_costs(recipe ids) ◄── InventoryReader (ledger)     │
//! │                           │                                            │
//! │                           ▼                                            │
//! │                costing::compute_cost()   (obrador-core, pure)          │
//! │                costing::compute_margin()                               │
//! │                           │                                            │
//! │                           ▼                                            │
//! │              ProductCosting { product, total_cost, margin, .. }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use obrador_core::costing::{self, RecipeCost};
use obrador_core::validation::{validate_product_input, validate_product_patch};
use obrador_core::{
    EntityKind, Money, Product, ProductCosting, ProductInput, ProductPatch, RecipeIssue,
    RecipeLine,
};
use obrador_store::{MemoryRepository, Repository};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::ports::{InventoryReader, ProductReader};

// =============================================================================
// Pure Operations
// =============================================================================

/// Checks a recipe's structural rules without touching any state.
///
/// First failure wins, in the order: empty, duplicate material, quantity.
pub fn validate_recipe(lines: &[RecipeLine]) -> Result<(), RecipeIssue> {
    obrador_core::validation::validate_recipe(lines)
}

/// Costs recipe lines at the inventory's current prices.
///
/// Lines whose material no longer exists contribute zero and are counted in
/// [`RecipeCost::unresolved`]. A total too large for a decimal is a
/// `Validation` error.
pub fn compute_cost<I: InventoryReader>(lines: &[RecipeLine], inventory: &I) -> EngineResult<RecipeCost> {
    let prices = inventory.unit_costs(lines.iter().map(|line| line.material_id.as_str()))?;
    Ok(costing::compute_cost(lines, |id| prices.get(id).copied())?)
}

/// Margin over the reference price in percent; zero when the price is not
/// positive.
pub fn compute_margin(reference_price: Money, cost: Money) -> Decimal {
    costing::compute_margin(reference_price, cost)
}

// =============================================================================
// Recipe Book
// =============================================================================

/// Products and their recipes.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook<R = MemoryRepository<Product>> {
    products: R,
}

impl<R: Repository<Product>> RecipeBook<R> {
    /// Creates a recipe book over the given store.
    pub fn new(products: R) -> Self {
        RecipeBook { products }
    }

    /// Adds a product with a fresh id.
    ///
    /// ## Errors
    /// - `Validation` for name, description or price out of bounds
    /// - `BusinessRule` carrying the [`RecipeIssue`] for a malformed recipe
    pub fn create(&mut self, input: ProductInput) -> EngineResult<Product> {
        debug!(name = %input.name, lines = input.recipe.len(), "Creating product");
        validate_product_input(&input)?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            description: input.description,
            reference_price: input.reference_price,
            recipe: input.recipe,
        };
        self.products.insert(product.clone())?;

        info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Merges the supplied fields into an existing product.
    pub fn update(&mut self, id: &str, patch: &ProductPatch) -> EngineResult<()> {
        debug!(id = %id, "Updating product");

        let mut product = self
            .products
            .get(id)?
            .ok_or_else(|| EngineError::not_found(EntityKind::Product, id))?;
        validate_product_patch(patch)?;

        patch.apply_to(&mut product);
        self.products.update(product)?;

        info!(id = %id, "Product updated");
        Ok(())
    }

    /// Removes a product. Past sales keep their consumption snapshot.
    pub fn delete(&mut self, id: &str) -> EngineResult<()> {
        debug!(id = %id, "Deleting product");
        let removed = self.products.remove(id)?;
        info!(id = %id, name = %removed.name, "Product deleted");
        Ok(())
    }

    pub fn get(&self, id: &str) -> EngineResult<Option<Product>> {
        Ok(self.products.get(id)?)
    }

    /// All products, in creation order.
    pub fn list(&self) -> EngineResult<Vec<Product>> {
        Ok(self.products.list()?)
    }

    /// Every product with its cost and margin at current prices.
    pub fn list_with_costing<I: InventoryReader>(&self, inventory: &I) -> EngineResult<Vec<ProductCosting>> {
        let products = self.products.list()?;
        let mut costed = Vec::with_capacity(products.len());

        for product in products {
            let cost = compute_cost(&product.recipe, inventory)?;
            if cost.unresolved > 0 {
                warn!(
                    id = %product.id,
                    unresolved = cost.unresolved,
                    "Recipe references missing materials"
                );
            }

            costed.push(ProductCosting {
                margin: compute_margin(product.reference_price, cost.total),
                total_cost: cost.total,
                unresolved_lines: cost.unresolved,
                product,
            });
        }

        Ok(costed)
    }
}

impl<R: Repository<Product>> ProductReader for RecipeBook<R> {
    fn find_product(&self, id: &str) -> EngineResult<Option<Product>> {
        self.get(id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InventoryLedger;
    use obrador_core::{BusinessRuleError, CoreError, MaterialInput, MaterialPatch, Unit};
    use rust_decimal_macros::dec;

    fn new_book() -> RecipeBook {
        RecipeBook::default()
    }

    fn ledger_with_harina() -> (InventoryLedger, String) {
        let mut ledger: InventoryLedger = InventoryLedger::default();
        let harina = ledger
            .create(MaterialInput {
                name: "Harina".to_string(),
                unit: Unit::Kilogram,
                quantity: dec!(10),
                unit_cost: Money::from_units(25),
            })
            .unwrap();
        (ledger, harina.id)
    }

    fn pastel(recipe: Vec<RecipeLine>) -> ProductInput {
        ProductInput {
            name: "Pastel".to_string(),
            description: Some("Delicioso pastel de 3 capas".to_string()),
            reference_price: Money::from_units(450),
            recipe,
        }
    }

    #[test]
    fn test_create_rejects_empty_recipe_as_business_rule() {
        let mut book = new_book();

        let err = book.create(pastel(vec![])).unwrap_err();
        assert_eq!(
            err,
            EngineError::Core(CoreError::BusinessRule(BusinessRuleError::InvalidRecipe(
                RecipeIssue::Empty
            )))
        );
        assert!(book.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_non_positive_price() {
        let mut book = new_book();
        let mut input = pastel(vec![RecipeLine::new("m1", dec!(1))]);
        input.reference_price = Money::zero();

        let err = book.create(input).unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn test_update_validates_supplied_recipe() {
        let mut book = new_book();
        let product = book.create(pastel(vec![RecipeLine::new("m1", dec!(1))])).unwrap();

        let patch = ProductPatch {
            recipe: Some(vec![RecipeLine::new("m1", dec!(1)), RecipeLine::new("m1", dec!(2))]),
            ..Default::default()
        };
        let err = book.update(&product.id, &patch).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::BusinessRule(BusinessRuleError::InvalidRecipe(
                RecipeIssue::DuplicateMaterial { .. }
            )))
        ));

        let err = book.update("nope", &ProductPatch::default()).unwrap_err();
        assert!(matches!(err, EngineError::Core(CoreError::NotFound { .. })));
    }

    #[test]
    fn test_update_can_clear_description() {
        let mut book = new_book();
        let product = book.create(pastel(vec![RecipeLine::new("m1", dec!(1))])).unwrap();

        let patch = ProductPatch {
            description: Some(None),
            ..Default::default()
        };
        book.update(&product.id, &patch).unwrap();

        assert_eq!(book.get(&product.id).unwrap().unwrap().description, None);
    }

    #[test]
    fn test_costing_follows_current_prices() {
        let (mut ledger, harina) = ledger_with_harina();
        let mut book = new_book();
        book.create(pastel(vec![RecipeLine::new(harina.clone(), dec!(0.5))])).unwrap();

        let costed = book.list_with_costing(&ledger).unwrap();
        assert_eq!(costed[0].total_cost, Money::new(dec!(12.5)));
        assert_eq!(costed[0].margin.round_dp(2), dec!(97.22));

        let patch = MaterialPatch {
            unit_cost: Some(Money::from_units(30)),
            ..Default::default()
        };
        ledger.update(&harina, &patch).unwrap();

        let costed = book.list_with_costing(&ledger).unwrap();
        assert_eq!(costed[0].total_cost, Money::from_units(15));
    }

    #[test]
    fn test_costing_counts_deleted_materials() {
        let (mut ledger, harina) = ledger_with_harina();
        let mut book = new_book();
        book.create(pastel(vec![
            RecipeLine::new(harina.clone(), dec!(0.5)),
            RecipeLine::new("ghost", dec!(2)),
        ]))
        .unwrap();

        let costed = book.list_with_costing(&ledger).unwrap();
        assert_eq!(costed[0].total_cost, Money::new(dec!(12.5)));
        assert_eq!(costed[0].unresolved_lines, 1);

        ledger.delete(&harina).unwrap();
        let costed = book.list_with_costing(&ledger).unwrap();
        assert_eq!(costed[0].total_cost, Money::zero());
        assert_eq!(costed[0].unresolved_lines, 2);
    }

    /// Every material exists at a fixed price and plenty of stock.
    struct FixedPrices(Money);

    impl InventoryReader for FixedPrices {
        fn find_material(&self, id: &str) -> EngineResult<Option<obrador_core::Material>> {
            Ok(Some(obrador_core::Material {
                id: id.to_string(),
                name: id.to_string(),
                unit: Unit::Kilogram,
                quantity: dec!(1000),
                unit_cost: self.0,
            }))
        }

        fn verify_sufficient(
            &self,
            _consumption: &[obrador_core::Consumption],
        ) -> EngineResult<obrador_core::StockCheck> {
            Ok(obrador_core::StockCheck {
                ok: true,
                insufficient_names: Vec::new(),
            })
        }
    }

    #[test]
    fn test_costing_against_fake_inventory() {
        let mut book = new_book();
        book.create(pastel(vec![
            RecipeLine::new("a", dec!(0.5)),
            RecipeLine::new("b", dec!(1.5)),
        ]))
        .unwrap();

        let costed = book.list_with_costing(&FixedPrices(Money::from_units(10))).unwrap();
        assert_eq!(costed[0].total_cost, Money::from_units(20));
        assert_eq!(costed[0].unresolved_lines, 0);
    }

    #[test]
    fn test_compute_cost_against_ledger() {
        let (ledger, harina) = ledger_with_harina();
        let cost = compute_cost(&[RecipeLine::new(harina, dec!(2))], &ledger).unwrap();
        assert_eq!(cost.total, Money::from_units(50));
        assert_eq!(cost.unresolved, 0);
    }
}
