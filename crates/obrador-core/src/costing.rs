//! # Costing Module
//!
//! Recipe cost, margin and scaling math.
//!
//! Prices are never stored on products: every function here takes a lookup
//! that resolves a material id to its CURRENT unit cost, so results always
//! reflect the latest inventory prices.
//!
//! ## Missing References
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Recipe: [Harina 0.5, Azúcar 0.3, <deleted material> 2]                │
//! │                                                                         │
//! │  Harina   0.5 × $25.00 = $12.50                                        │
//! │  Azúcar   0.3 × $30.00 =  $9.00                                        │
//! │  ???      unresolved   =  $0.00   ← counted in `unresolved`            │
//! │                          ───────                                        │
//! │  total                   $21.50                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Costing stays viewable with stale references; the unresolved count lets
//! callers surface the data-integrity problem instead of hiding it.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Consumption, RecipeLine};
use crate::validation::ValidationResult;

/// Cost of a recipe (or of a consumption list) at current prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecipeCost {
    /// Σ(quantity × unit cost) over resolvable lines.
    pub total: Money,
    /// Lines whose material could not be resolved.
    pub unresolved: usize,
}

/// Computes the cost of a recipe.
///
/// `unit_cost` resolves a material id to its current unit cost; `None` means
/// the material no longer exists and the line contributes zero.
///
/// ## Errors
/// `TooLarge { field: "cost" }` if the total does not fit in a decimal.
pub fn compute_cost<F>(lines: &[RecipeLine], unit_cost: F) -> ValidationResult<RecipeCost>
where
    F: FnMut(&str) -> Option<Money>,
{
    cost_of(
        lines.iter().map(|line| (line.material_id.as_str(), line.quantity)),
        unit_cost,
    )
}

/// Values a consumption list (e.g. a sale's frozen snapshot) at current prices.
///
/// Same lenient policy and overflow error as [`compute_cost`].
pub fn consumption_cost<F>(consumption: &[Consumption], unit_cost: F) -> ValidationResult<RecipeCost>
where
    F: FnMut(&str) -> Option<Money>,
{
    cost_of(
        consumption
            .iter()
            .map(|entry| (entry.material_id.as_str(), entry.quantity)),
        unit_cost,
    )
}

fn cost_of<'a, I, F>(entries: I, mut unit_cost: F) -> ValidationResult<RecipeCost>
where
    I: Iterator<Item = (&'a str, Decimal)>,
    F: FnMut(&str) -> Option<Money>,
{
    let mut acc = RecipeCost::default();
    for (material_id, quantity) in entries {
        match unit_cost(material_id) {
            Some(cost) => {
                acc.total = cost
                    .checked_times(quantity)
                    .and_then(|line| acc.total.checked_add(line))
                    .ok_or_else(|| ValidationError::too_large("cost"))?;
            }
            None => acc.unresolved += 1,
        }
    }
    Ok(acc)
}

/// Margin over the reference price, in percent.
///
/// `(price − cost) / price × 100`, or zero when the price is not positive.
/// Saturates instead of overflowing for absurd cost/price ratios.
///
/// ## Example
/// ```rust
/// use obrador_core::costing::compute_margin;
/// use obrador_core::Money;
/// use rust_decimal::Decimal;
///
/// let margin = compute_margin(Money::from_units(200), Money::from_units(50));
/// assert_eq!(margin, Decimal::from(75));
///
/// assert_eq!(compute_margin(Money::zero(), Money::from_units(50)), Decimal::ZERO);
/// ```
pub fn compute_margin(reference_price: Money, cost: Money) -> Decimal {
    if !reference_price.is_positive() {
        return Decimal::ZERO;
    }

    let price = reference_price.amount();
    let gain = price.saturating_sub(cost.amount());
    match gain.checked_div(price) {
        Some(ratio) => ratio.saturating_mul(Decimal::ONE_HUNDRED),
        None if gain.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Multiplies every recipe line by the number of units sold.
///
/// ## User Workflow
/// ```text
/// Pastel recipe: Harina 0.5, Huevos 4
/// Units sold: 3
///      │
///      ▼
/// scale_recipe(recipe, 3) ← THIS FUNCTION
///      │
///      ▼
/// Consumption: Harina 1.5, Huevos 12
/// ```
///
/// ## Errors
/// `TooLarge { field: "quantity" }` if a scaled line does not fit in a
/// decimal.
pub fn scale_recipe(lines: &[RecipeLine], quantity: i64) -> ValidationResult<Vec<Consumption>> {
    let factor = Decimal::from(quantity);
    lines
        .iter()
        .map(|line| {
            line.quantity
                .checked_mul(factor)
                .map(|scaled| Consumption::new(line.material_id.clone(), scaled))
                .ok_or_else(|| ValidationError::too_large("quantity"))
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn prices() -> HashMap<&'static str, Money> {
        HashMap::from([
            ("harina", Money::from_units(25)),
            ("azucar", Money::from_units(30)),
            ("vainilla", Money::new(dec!(0.5))),
        ])
    }

    #[test]
    fn test_compute_cost_single_line() {
        let prices = prices();
        let recipe = vec![RecipeLine::new("harina", dec!(0.5))];

        let cost = compute_cost(&recipe, |id| prices.get(id).copied()).unwrap();

        assert_eq!(cost.total, Money::new(dec!(12.5)));
        assert_eq!(cost.unresolved, 0);
    }

    #[test]
    fn test_compute_cost_skips_unresolved_lines() {
        let prices = prices();
        let recipe = vec![
            RecipeLine::new("harina", dec!(0.5)),
            RecipeLine::new("azucar", dec!(0.3)),
            RecipeLine::new("deleted", dec!(2)),
        ];

        let cost = compute_cost(&recipe, |id| prices.get(id).copied()).unwrap();

        assert_eq!(cost.total, Money::new(dec!(21.5)));
        assert_eq!(cost.unresolved, 1);
    }

    #[test]
    fn test_margin_for_reference_recipe() {
        let margin = compute_margin(Money::from_units(450), Money::new(dec!(12.5)));
        assert_eq!(margin.round_dp(2), dec!(97.22));
    }

    #[test]
    fn test_margin_can_be_negative() {
        let margin = compute_margin(Money::from_units(10), Money::from_units(15));
        assert_eq!(margin, dec!(-50));
    }

    #[test]
    fn test_scale_recipe() {
        let recipe = vec![
            RecipeLine::new("harina", dec!(0.5)),
            RecipeLine::new("huevos", dec!(4)),
        ];
        let scaled = scale_recipe(&recipe, 3).unwrap();
        assert_eq!(
            scaled,
            vec![
                Consumption::new("harina", dec!(1.5)),
                Consumption::new("huevos", dec!(12)),
            ]
        );
    }

    #[test]
    fn test_consumption_cost_uses_lookup() {
        let prices = prices();
        let snapshot = vec![
            Consumption::new("harina", dec!(1.5)),
            Consumption::new("vainilla", dec!(20)),
        ];
        let cost = consumption_cost(&snapshot, |id| prices.get(id).copied()).unwrap();
        assert_eq!(cost.total, Money::new(dec!(47.5)));
    }

    #[test]
    fn test_overflow_is_reported_not_panicked() {
        let recipe = vec![RecipeLine::new("harina", Decimal::MAX)];

        let err = compute_cost(&recipe, |_| Some(Money::from_units(2))).unwrap_err();
        assert_eq!(err, ValidationError::too_large("cost"));

        let err = scale_recipe(&recipe, i64::MAX).unwrap_err();
        assert_eq!(err, ValidationError::too_large("quantity"));

        let margin = compute_margin(Money::new(dec!(0.0001)), Money::new(Decimal::MAX));
        assert_eq!(margin, Decimal::MIN);
    }

    fn arb_quantity() -> impl Strategy<Value = Decimal> {
        // 0.001 .. 1000.000 with three decimals
        (1i64..1_000_000).prop_map(|n| Decimal::new(n, 3))
    }

    proptest! {
        #[test]
        fn prop_compute_cost_is_linear(
            quantities in proptest::collection::vec(arb_quantity(), 1..6),
            k in 1i64..50,
        ) {
            let prices = prices();
            let ids = ["harina", "azucar", "vainilla", "deleted", "harina2", "x"];
            let recipe: Vec<RecipeLine> = quantities
                .iter()
                .zip(ids.iter())
                .map(|(q, id)| RecipeLine::new(*id, *q))
                .collect();
            let scaled: Vec<RecipeLine> = recipe
                .iter()
                .map(|l| RecipeLine::new(l.material_id.clone(), l.quantity * Decimal::from(k)))
                .collect();

            let base = compute_cost(&recipe, |id| prices.get(id).copied()).unwrap();
            let again = compute_cost(&recipe, |id| prices.get(id).copied()).unwrap();
            let times_k = compute_cost(&scaled, |id| prices.get(id).copied()).unwrap();

            prop_assert_eq!(base, again);
            prop_assert_eq!(times_k.total, base.total.multiply_quantity(k));
            prop_assert_eq!(times_k.unresolved, base.unresolved);
        }

        #[test]
        fn prop_margin_is_zero_for_non_positive_price(
            price in -1_000_000i64..=0,
            cost in 0i64..1_000_000,
        ) {
            let margin = compute_margin(Money::new(Decimal::new(price, 2)), Money::new(Decimal::new(cost, 2)));
            prop_assert_eq!(margin, Decimal::ZERO);
        }
    }
}
