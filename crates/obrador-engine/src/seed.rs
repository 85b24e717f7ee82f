//! # Sample Catalog
//!
//! A small bakery's starting inventory, four products and a few sales,
//! used for demos and development.
//!
//! Sales go through [`Bakery::commit_sale`] like any other sale, so the
//! loaded stock already reflects them.

use obrador_core::{
    EntityKind, Material, MaterialInput, Money, Product, ProductInput, RecipeLine, Sale,
    SaleInput, Unit,
};
use obrador_store::Repository;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use crate::bakery::Bakery;
use crate::error::{EngineError, EngineResult};

/// (name, unit, quantity on hand, unit cost)
const MATERIALS: &[(&str, Unit, Decimal, Decimal)] = &[
    ("Harina", Unit::Kilogram, dec!(10), dec!(25)),
    ("Azúcar", Unit::Kilogram, dec!(8), dec!(30)),
    ("Huevos", Unit::Piece, dec!(24), dec!(4)),
    ("Mantequilla", Unit::Kilogram, dec!(3), dec!(120)),
    ("Leche", Unit::Liter, dec!(5), dec!(28)),
    ("Chocolate", Unit::Kilogram, dec!(2), dec!(180)),
    ("Vainilla", Unit::Milliliter, dec!(200), dec!(0.5)),
    ("Polvo para hornear", Unit::Kilogram, dec!(1), dec!(85)),
];

/// (name, description, reference price, recipe of (material, quantity))
type ProductSeed = (&'static str, &'static str, i64, &'static [(&'static str, Decimal)]);

const PRODUCTS: &[ProductSeed] = &[
    (
        "Pastel de Chocolate",
        "Delicioso pastel de 3 capas",
        450,
        &[("Harina", dec!(0.5)), ("Azúcar", dec!(0.3)), ("Huevos", dec!(4)), ("Chocolate", dec!(0.2))],
    ),
    (
        "Cheesecake NY",
        "Clásico cheesecake horneado",
        380,
        &[("Huevos", dec!(3)), ("Mantequilla", dec!(0.2)), ("Azúcar", dec!(0.2))],
    ),
    (
        "Cupcakes (12)",
        "Docena de cupcakes variados",
        180,
        &[("Harina", dec!(0.3)), ("Azúcar", dec!(0.2)), ("Huevos", dec!(2)), ("Vainilla", dec!(10))],
    ),
    (
        "Brownies (6)",
        "Media docena de brownies",
        90,
        &[("Chocolate", dec!(0.15)), ("Mantequilla", dec!(0.1)), ("Huevos", dec!(2))],
    ),
];

/// (product, unit price, quantity)
const SALES: &[(&str, i64, i64)] = &[
    ("Pastel de Chocolate", 450, 1),
    ("Cupcakes (12)", 180, 2),
    ("Cheesecake NY", 380, 1),
    ("Brownies (6)", 90, 3),
];

/// What [`load_sample_catalog`] created.
#[derive(Debug, Clone)]
pub struct SampleCatalog {
    pub materials: Vec<Material>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
}

/// Loads the sample materials, products and sales into `bakery`.
pub fn load_sample_catalog<M, P, S>(bakery: &Bakery<M, P, S>) -> EngineResult<SampleCatalog>
where
    M: Repository<Material>,
    P: Repository<Product>,
    S: Repository<Sale>,
{
    let mut materials = Vec::with_capacity(MATERIALS.len());
    for (name, unit, quantity, cost) in MATERIALS {
        materials.push(bakery.create_material(MaterialInput {
            name: name.to_string(),
            unit: *unit,
            quantity: *quantity,
            unit_cost: Money::new(*cost),
        })?);
    }

    let mut products = Vec::with_capacity(PRODUCTS.len());
    for (name, description, price, recipe) in PRODUCTS {
        let recipe = recipe
            .iter()
            .map(|(material, quantity)| {
                Ok(RecipeLine::new(id_of(&materials, material)?, *quantity))
            })
            .collect::<EngineResult<Vec<_>>>()?;

        products.push(bakery.create_product(ProductInput {
            name: name.to_string(),
            description: Some(description.to_string()),
            reference_price: Money::from_units(*price),
            recipe,
        })?);
    }

    let mut sales = Vec::with_capacity(SALES.len());
    for (product, price, quantity) in SALES {
        let product_id = products
            .iter()
            .find(|p| p.name == *product)
            .map(|p| p.id.clone())
            .ok_or_else(|| EngineError::not_found(EntityKind::Product, *product))?;

        sales.push(bakery.commit_sale(SaleInput {
            product_id,
            unit_price: Money::from_units(*price),
            quantity: *quantity,
        })?);
    }

    info!(
        materials = materials.len(),
        products = products.len(),
        sales = sales.len(),
        "Sample catalog loaded"
    );

    Ok(SampleCatalog {
        materials,
        products,
        sales,
    })
}

fn id_of(materials: &[Material], name: &str) -> EngineResult<String> {
    materials
        .iter()
        .find(|m| m.name == name)
        .map(|m| m.id.clone())
        .ok_or_else(|| EngineError::not_found(EntityKind::Material, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_loads_and_consumes_stock() {
        let bakery: Bakery = Bakery::default();
        let catalog = load_sample_catalog(&bakery).unwrap();

        assert_eq!(catalog.materials.len(), 8);
        assert_eq!(catalog.products.len(), 4);
        assert_eq!(catalog.sales.len(), 4);

        // 24 - (4 + 2×2 + 3 + 3×2)
        let huevos = &catalog.materials[2];
        let now = bakery.get_material(&huevos.id).unwrap().unwrap();
        assert_eq!(now.quantity, dec!(7));

        // 2 - (0.2 + 0.15×3)
        let chocolate = &catalog.materials[5];
        let now = bakery.get_material(&chocolate.id).unwrap().unwrap();
        assert_eq!(now.quantity, dec!(1.35));
    }

    #[test]
    fn test_sample_costing() {
        let bakery: Bakery = Bakery::default();
        load_sample_catalog(&bakery).unwrap();

        let costed = bakery.list_products_with_costing().unwrap();
        // 0.5×25 + 0.3×30 + 4×4 + 0.2×180
        assert_eq!(costed[0].total_cost, Money::new(dec!(73.5)));
        assert_eq!(costed[0].unresolved_lines, 0);
    }
}
