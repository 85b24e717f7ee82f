use obrador_core::{
    Consumption, MaterialInput, MaterialPatch, Money, ProductInput, RecipeIssue, RecipeLine,
    SaleInput, Unit,
};
use obrador_engine::{Bakery, EngineConfig, ErrorKind};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Tenths between 0 and `max / 10`.
fn tenths(max: i64) -> impl Strategy<Value = Decimal> {
    (0..=max).prop_map(|n| Decimal::new(n, 1))
}

#[derive(Debug, Clone)]
enum Step {
    Restock(usize, Decimal),
    Sell(usize, i64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..3usize, tenths(100)).prop_map(|(m, q)| Step::Restock(m, q)),
        (0..2usize, 1..6i64).prop_map(|(p, q)| Step::Sell(p, q)),
    ]
}

struct Shop {
    bakery: Bakery,
    materials: Vec<String>,
    products: Vec<String>,
}

fn shop(stock: &[Decimal]) -> Shop {
    let bakery = Bakery::new(EngineConfig::default());
    let materials: Vec<String> = stock
        .iter()
        .enumerate()
        .map(|(i, quantity)| {
            bakery
                .create_material(MaterialInput {
                    name: format!("Material {i}"),
                    unit: Unit::Kilogram,
                    quantity: *quantity,
                    unit_cost: Money::from_units(10),
                })
                .unwrap()
                .id
        })
        .collect();

    let recipes = [
        vec![
            RecipeLine::new(materials[0].clone(), Decimal::new(5, 1)),
            RecipeLine::new(materials[1].clone(), Decimal::new(2, 1)),
        ],
        vec![
            RecipeLine::new(materials[1].clone(), Decimal::new(3, 1)),
            RecipeLine::new(materials[2].clone(), Decimal::ONE),
        ],
    ];
    let products = recipes
        .into_iter()
        .enumerate()
        .map(|(i, recipe)| {
            bakery
                .create_product(ProductInput {
                    name: format!("Product {i}"),
                    description: None,
                    reference_price: Money::from_units(100),
                    recipe,
                })
                .unwrap()
                .id
        })
        .collect();

    Shop {
        bakery,
        materials,
        products,
    }
}

fn stock_of(shop: &Shop) -> Vec<Decimal> {
    shop.materials
        .iter()
        .map(|id| shop.bakery.get_material(id).unwrap().unwrap().quantity)
        .collect()
}

proptest! {
    #[test]
    fn stock_never_goes_negative(
        initial in prop::collection::vec(tenths(50), 3),
        steps in prop::collection::vec(step(), 1..30),
    ) {
        let shop = shop(&initial);

        for step in steps {
            match step {
                Step::Restock(m, quantity) => {
                    let patch = MaterialPatch { quantity: Some(quantity), ..Default::default() };
                    shop.bakery.update_material(&shop.materials[m], &patch).unwrap();
                }
                Step::Sell(p, quantity) => {
                    let _ = shop.bakery.commit_sale(SaleInput {
                        product_id: shop.products[p].clone(),
                        unit_price: Money::from_units(100),
                        quantity,
                    });
                }
            }

            for quantity in stock_of(&shop) {
                prop_assert!(quantity >= Decimal::ZERO);
            }
        }
    }

    #[test]
    fn commit_is_all_or_nothing(
        initial in prop::collection::vec(tenths(30), 3),
        product in 0..2usize,
        quantity in 1..10i64,
    ) {
        let shop = shop(&initial);
        let before = stock_of(&shop);

        let result = shop.bakery.commit_sale(SaleInput {
            product_id: shop.products[product].clone(),
            unit_price: Money::from_units(100),
            quantity,
        });
        let after = stock_of(&shop);

        match result {
            Ok(sale) => {
                prop_assert_eq!(shop.bakery.list_sales().unwrap().len(), 1);
                for entry in &sale.consumption {
                    let i = shop.materials.iter().position(|id| *id == entry.material_id).unwrap();
                    prop_assert_eq!(after[i], before[i] - entry.quantity);
                }
            }
            Err(err) => {
                prop_assert_eq!(err.kind(), ErrorKind::BusinessRule);
                prop_assert_eq!(after, before);
                prop_assert!(shop.bakery.list_sales().unwrap().is_empty());
            }
        }
    }

    #[test]
    fn consumed_stock_matches_sale_snapshots(
        sells in prop::collection::vec((0..2usize, 1..4i64), 1..15),
    ) {
        let initial = vec![Decimal::from(20); 3];
        let shop = shop(&initial);

        for (product, quantity) in sells {
            let _ = shop.bakery.commit_sale(SaleInput {
                product_id: shop.products[product].clone(),
                unit_price: Money::from_units(100),
                quantity,
            });
        }

        let after = stock_of(&shop);
        let sales = shop.bakery.list_sales().unwrap();
        for (i, id) in shop.materials.iter().enumerate() {
            let consumed: Decimal = sales
                .iter()
                .flat_map(|sale| sale.consumption.iter())
                .filter(|entry| entry.material_id == *id)
                .map(|entry| entry.quantity)
                .sum();
            prop_assert_eq!(initial[i] - consumed, after[i]);
        }
    }

    #[test]
    fn scaled_consumption_is_linear(quantity in 1..100i64) {
        let shop = shop(&[Decimal::ONE, Decimal::ONE, Decimal::ONE]);
        let once = shop.bakery.scale_recipe(&shop.products[0], 1).unwrap();
        let many = shop.bakery.scale_recipe(&shop.products[0], quantity).unwrap();

        let expected: Vec<Consumption> = once
            .iter()
            .map(|entry| Consumption::new(entry.material_id.clone(), entry.quantity * Decimal::from(quantity)))
            .collect();
        prop_assert_eq!(many, expected);
    }

    #[test]
    fn well_formed_recipes_validate(
        quantities in prop::collection::vec(1..1000i64, 1..8),
    ) {
        let bakery = Bakery::new(EngineConfig::default());
        let lines: Vec<RecipeLine> = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| RecipeLine::new(format!("m-{i}"), Decimal::new(*q, 2)))
            .collect();

        prop_assert_eq!(bakery.validate_recipe(&lines), Ok(()));
    }

    #[test]
    fn repeated_material_is_rejected(
        quantities in prop::collection::vec(1..1000i64, 1..8),
        repeat in 0..8usize,
    ) {
        let bakery = Bakery::new(EngineConfig::default());
        let mut lines: Vec<RecipeLine> = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| RecipeLine::new(format!("m-{i}"), Decimal::new(*q, 2)))
            .collect();
        let copy = lines[repeat % lines.len()].clone();
        lines.push(copy);

        let is_duplicate = matches!(
            bakery.validate_recipe(&lines),
            Err(RecipeIssue::DuplicateMaterial { .. })
        );
        prop_assert!(is_duplicate);
    }

    #[test]
    fn non_positive_quantity_is_rejected(
        quantities in prop::collection::vec(1..1000i64, 1..8),
        bad in -1000..=0i64,
        at in 0..8usize,
    ) {
        let bakery = Bakery::new(EngineConfig::default());
        let mut lines: Vec<RecipeLine> = quantities
            .iter()
            .enumerate()
            .map(|(i, q)| RecipeLine::new(format!("m-{i}"), Decimal::new(*q, 2)))
            .collect();
        let at = at % lines.len();
        lines[at].quantity = Decimal::new(bad, 2);

        let is_invalid = matches!(
            bakery.validate_recipe(&lines),
            Err(RecipeIssue::InvalidQuantity { .. })
        );
        prop_assert!(is_invalid);
    }
}
