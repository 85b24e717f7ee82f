//! # Validation Module
//!
//! Input schemas for materials, products and sales, plus the recipe rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (external)                                       │
//! │  └── Calls validate_recipe() on every keystroke for live feedback       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine (create / update / commit)                             │
//! │  └── THIS MODULE again, before any mutation                             │
//! │                                                                         │
//! │  Same pure functions at both layers: the form and the commit boundary   │
//! │  can never disagree about what is valid.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use obrador_core::validation::validate_recipe;
//! use obrador_core::{RecipeIssue, RecipeLine};
//! use rust_decimal::Decimal;
//!
//! let recipe = vec![
//!     RecipeLine::new("harina", Decimal::ONE),
//!     RecipeLine::new("harina", Decimal::from(2)),
//! ];
//! assert!(matches!(
//!     validate_recipe(&recipe),
//!     Err(RecipeIssue::DuplicateMaterial { .. })
//! ));
//! ```

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{CoreResult, RecipeIssue, ValidationError};
use crate::money::Money;
use crate::types::{MaterialInput, MaterialPatch, ProductInput, ProductPatch, RecipeLine, SaleInput};
use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an optional product description (at most 255 characters).
pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LEN => Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock quantity (zero allowed, negative rejected).
pub fn validate_stock_quantity(quantity: Decimal) -> ValidationResult<()> {
    if quantity < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price or cost, which must be strictly positive.
///
/// ## Example
/// ```rust
/// use obrador_core::validation::validate_positive_amount;
/// use obrador_core::Money;
///
/// assert!(validate_positive_amount("unit_cost", Money::from_units(25)).is_ok());
/// assert!(validate_positive_amount("unit_cost", Money::zero()).is_err());
/// ```
pub fn validate_positive_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates units sold: a positive integer.
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a statistics period. Months are numbered 1-12.
pub fn validate_period(month: u32, _year: i32) -> ValidationResult<()> {
    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }

    Ok(())
}

// =============================================================================
// Recipe Rules
// =============================================================================

/// Checks a recipe's structural rules.
///
/// Pure and side-effect free, so forms can call it on every change.
///
/// ## Rules (first failure wins, in this order)
/// 1. At least one line → [`RecipeIssue::Empty`]
/// 2. No material twice → [`RecipeIssue::DuplicateMaterial`]
/// 3. Every quantity > 0 → [`RecipeIssue::InvalidQuantity`]
pub fn validate_recipe(lines: &[RecipeLine]) -> Result<(), RecipeIssue> {
    if lines.is_empty() {
        return Err(RecipeIssue::Empty);
    }

    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if !seen.insert(line.material_id.as_str()) {
            return Err(RecipeIssue::DuplicateMaterial {
                material_id: line.material_id.clone(),
            });
        }
    }

    if let Some(line) = lines.iter().find(|line| line.quantity <= Decimal::ZERO) {
        return Err(RecipeIssue::InvalidQuantity {
            material_id: line.material_id.clone(),
        });
    }

    Ok(())
}

// =============================================================================
// Record Schemas
// =============================================================================

/// Validates a new material.
pub fn validate_material_input(input: &MaterialInput) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_stock_quantity(input.quantity)?;
    validate_positive_amount("unit_cost", input.unit_cost)?;
    Ok(())
}

/// Validates only the fields a material patch supplies.
pub fn validate_material_patch(patch: &MaterialPatch) -> ValidationResult<()> {
    if let Some(name) = &patch.name {
        validate_name("name", name)?;
    }
    if let Some(quantity) = patch.quantity {
        validate_stock_quantity(quantity)?;
    }
    if let Some(unit_cost) = patch.unit_cost {
        validate_positive_amount("unit_cost", unit_cost)?;
    }
    Ok(())
}

/// Validates a new product.
///
/// Field errors surface as `Validation`, recipe errors as `BusinessRule`.
pub fn validate_product_input(input: &ProductInput) -> CoreResult<()> {
    validate_name("name", &input.name)?;
    validate_description(input.description.as_deref())?;
    validate_positive_amount("reference_price", input.reference_price)?;
    validate_recipe(&input.recipe)?;
    Ok(())
}

/// Validates only the fields a product patch supplies.
pub fn validate_product_patch(patch: &ProductPatch) -> CoreResult<()> {
    if let Some(name) = &patch.name {
        validate_name("name", name)?;
    }
    if let Some(description) = &patch.description {
        validate_description(description.as_deref())?;
    }
    if let Some(price) = patch.reference_price {
        validate_positive_amount("reference_price", price)?;
    }
    if let Some(recipe) = &patch.recipe {
        validate_recipe(recipe)?;
    }
    Ok(())
}

/// Validates a sale request at the commit boundary.
pub fn validate_sale_input(input: &SaleInput) -> ValidationResult<()> {
    validate_positive_amount("unit_price", input.unit_price)?;
    validate_sale_quantity(input.quantity)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BusinessRuleError, CoreError};
    use crate::types::Unit;
    use rust_decimal_macros::dec;

    fn line(id: &str, qty: Decimal) -> RecipeLine {
        RecipeLine::new(id, qty)
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Harina").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"a".repeat(100)).is_ok());
        assert!(validate_name("name", &"a".repeat(101)).is_err());
        // Counted in characters, not bytes
        assert!(validate_name("name", &"ñ".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some("")).is_ok());
        assert!(validate_description(Some(&"x".repeat(255))).is_ok());
        assert!(validate_description(Some(&"x".repeat(256))).is_err());
    }

    #[test]
    fn test_validate_recipe_accepts_well_formed() {
        let recipe = vec![line("1", dec!(0.5)), line("2", dec!(0.3)), line("3", dec!(4))];
        assert_eq!(validate_recipe(&recipe), Ok(()));
    }

    #[test]
    fn test_validate_recipe_rejections() {
        assert_eq!(validate_recipe(&[]), Err(RecipeIssue::Empty));

        assert_eq!(
            validate_recipe(&[line("1", dec!(1)), line("1", dec!(2))]),
            Err(RecipeIssue::DuplicateMaterial {
                material_id: "1".to_string()
            })
        );

        assert_eq!(
            validate_recipe(&[line("1", dec!(1)), line("2", dec!(0))]),
            Err(RecipeIssue::InvalidQuantity {
                material_id: "2".to_string()
            })
        );

        assert!(validate_recipe(&[line("1", dec!(-0.1))]).is_err());
    }

    #[test]
    fn test_validate_recipe_reports_duplicate_before_quantity() {
        let recipe = vec![line("1", dec!(0)), line("1", dec!(2))];
        assert!(matches!(
            validate_recipe(&recipe),
            Err(RecipeIssue::DuplicateMaterial { .. })
        ));
    }

    #[test]
    fn test_validate_material_input() {
        let mut input = MaterialInput {
            name: "Harina".to_string(),
            unit: Unit::Kilogram,
            quantity: dec!(0),
            unit_cost: Money::from_units(25),
        };
        assert!(validate_material_input(&input).is_ok());

        input.quantity = dec!(-1);
        assert_eq!(
            validate_material_input(&input),
            Err(ValidationError::Negative {
                field: "quantity".to_string()
            })
        );

        input.quantity = dec!(1);
        input.unit_cost = Money::zero();
        assert!(matches!(
            validate_material_input(&input),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_validate_material_patch_checks_supplied_fields_only() {
        assert!(validate_material_patch(&MaterialPatch::default()).is_ok());

        let patch = MaterialPatch {
            unit_cost: Some(Money::new(dec!(-3))),
            ..Default::default()
        };
        assert!(validate_material_patch(&patch).is_err());
    }

    #[test]
    fn test_validate_product_input_classifies_failures() {
        let input = ProductInput {
            name: "Pastel".to_string(),
            description: None,
            reference_price: Money::from_units(450),
            recipe: vec![],
        };
        assert!(matches!(
            validate_product_input(&input),
            Err(CoreError::BusinessRule(BusinessRuleError::InvalidRecipe(
                RecipeIssue::Empty
            )))
        ));

        let input = ProductInput {
            reference_price: Money::zero(),
            recipe: vec![line("1", dec!(1))],
            ..input
        };
        assert!(matches!(
            validate_product_input(&input),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_sale_input() {
        let mut input = SaleInput {
            product_id: "p".to_string(),
            unit_price: Money::from_units(450),
            quantity: 3,
        };
        assert!(validate_sale_input(&input).is_ok());

        input.quantity = 0;
        assert!(validate_sale_input(&input).is_err());

        input.quantity = 1;
        input.unit_price = Money::zero();
        assert!(validate_sale_input(&input).is_err());
    }

    #[test]
    fn test_validate_period() {
        assert!(validate_period(1, 2024).is_ok());
        assert!(validate_period(12, 2024).is_ok());
        assert!(validate_period(0, 2024).is_err());
        assert!(validate_period(13, 2024).is_err());
    }
}
