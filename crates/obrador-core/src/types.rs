//! # Domain Types
//!
//! Core domain types used throughout Obrador.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Material     │   │     Product     │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  recipe[]       │◄──│  product_id     │       │
//! │  │  name, unit     │   │   material_id   │   │  unit_price     │       │
//! │  │  quantity       │   │   quantity      │   │  quantity       │       │
//! │  │  unit_cost      │   │  reference_price│   │  consumption[]  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  References are WEAK: ids resolved by lookup, never owned pointers.    │
//! │  A Sale's consumption is a frozen snapshot taken at commit time.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Entity Identity
// =============================================================================

/// The collections the engine owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Material,
    Product,
    Sale,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Material => "Material",
            EntityKind::Product => "Product",
            EntityKind::Sale => "Sale",
        };
        f.write_str(name)
    }
}

/// A record with a stable, system-generated identifier.
///
/// Implemented by every type a record store keeps.
pub trait Entity {
    /// Which collection the record belongs to (used in error messages).
    const KIND: EntityKind;

    /// The record's immutable id.
    fn id(&self) -> &str;
}

// =============================================================================
// Unit of Measure
// =============================================================================

/// Unit in which a material is stocked and consumed.
///
/// ## Wire Values
/// Exactly `kg`, `g`, `L`, `ml`, `pza`. Anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Unit {
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "L")]
    Liter,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "pza")]
    Piece,
}

impl Unit {
    /// Every unit, in the order pickers should list them.
    pub const ALL: [Unit; 5] = [
        Unit::Kilogram,
        Unit::Gram,
        Unit::Liter,
        Unit::Milliliter,
        Unit::Piece,
    ];

    /// The wire symbol (`kg`, `g`, `L`, `ml`, `pza`).
    pub const fn symbol(&self) -> &'static str {
        match self {
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Liter => "L",
            Unit::Milliliter => "ml",
            Unit::Piece => "pza",
        }
    }

    /// Human-readable label for selection lists.
    pub const fn label(&self) -> &'static str {
        match self {
            Unit::Kilogram => "Kilograms (kg)",
            Unit::Gram => "Grams (g)",
            Unit::Liter => "Liters (L)",
            Unit::Milliliter => "Milliliters (ml)",
            Unit::Piece => "Pieces (pza)",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = ValidationError;

    /// Parses a wire symbol. Matching is exact: `KG` and `l` are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .iter()
            .copied()
            .find(|unit| unit.symbol() == s)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "unit".to_string(),
                allowed: Unit::ALL.iter().map(|u| u.symbol().to_string()).collect(),
            })
    }
}

// =============================================================================
// Material
// =============================================================================

/// A raw ingredient tracked by quantity on hand and unit cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Material {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name ("Harina", "Azúcar", ...).
    pub name: String,

    /// Unit the quantity and cost are expressed in.
    pub unit: Unit,

    /// Quantity on hand. Never negative.
    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Cost of one unit. Always positive.
    pub unit_cost: Money,
}

impl Material {
    /// Value of the stock on hand (quantity × unit cost), or `None` if it
    /// does not fit in a decimal.
    #[inline]
    pub fn stock_value(&self) -> Option<Money> {
        self.unit_cost.checked_times(self.quantity)
    }
}

impl Entity for Material {
    const KIND: EntityKind = EntityKind::Material;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields needed to create a material (everything but the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MaterialInput {
    pub name: String,
    pub unit: Unit,
    #[ts(type = "string")]
    pub quantity: Decimal,
    pub unit_cost: Money,
}

/// Partial update of a material. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MaterialPatch {
    pub name: Option<String>,
    pub unit: Option<Unit>,
    #[ts(type = "string | null")]
    pub quantity: Option<Decimal>,
    pub unit_cost: Option<Money>,
}

impl MaterialPatch {
    /// Applies the supplied fields onto `material`.
    ///
    /// Does not validate; callers run the schema first.
    pub fn apply_to(&self, material: &mut Material) {
        if let Some(name) = &self.name {
            material.name = name.trim().to_string();
        }
        if let Some(unit) = self.unit {
            material.unit = unit;
        }
        if let Some(quantity) = self.quantity {
            material.quantity = quantity;
        }
        if let Some(unit_cost) = self.unit_cost {
            material.unit_cost = unit_cost;
        }
    }
}

// =============================================================================
// Recipe
// =============================================================================

/// One material-quantity pairing within a product's recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecipeLine {
    /// Weak reference to a [`Material`] by id.
    pub material_id: String,

    /// Quantity of the material used per unit of product.
    #[ts(type = "string")]
    pub quantity: Decimal,
}

impl RecipeLine {
    /// Creates a recipe line.
    pub fn new(material_id: impl Into<String>, quantity: Decimal) -> Self {
        RecipeLine {
            material_id: material_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A sellable item defined by a recipe and a reference price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name ("Pastel de Chocolate").
    pub name: String,

    /// Optional description for menus.
    pub description: Option<String>,

    /// Suggested selling price. Sales may use a different price.
    pub reference_price: Money,

    /// Ordered recipe lines; never empty, no repeated material.
    pub recipe: Vec<RecipeLine>,
}

impl Entity for Product {
    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields needed to create a product (everything but the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub description: Option<String>,
    pub reference_price: Money,
    pub recipe: Vec<RecipeLine>,
}

/// Partial update of a product. `None` fields are left untouched.
///
/// `description: Some(None)` clears the description. On the wire an absent
/// `description` key leaves it alone and `"description": null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    pub reference_price: Option<Money>,
    pub recipe: Option<Vec<RecipeLine>>,
}

/// Maps a present key to `Some`, so an explicit `null` becomes `Some(None)`.
/// Absent keys fall back to `None` through `#[serde(default)]`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProductPatch {
    /// Applies the supplied fields onto `product`.
    ///
    /// Does not validate; callers run the schema first.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.reference_price {
            product.reference_price = price;
        }
        if let Some(recipe) = &self.recipe {
            product.recipe = recipe.clone();
        }
    }
}

/// A product together with its cost and margin at current material prices.
///
/// Never stored: recomputed on every listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCosting {
    #[serde(flatten)]
    pub product: Product,

    /// Σ(line quantity × current unit cost).
    pub total_cost: Money,

    /// Margin over the reference price, in percent.
    #[ts(type = "string")]
    pub margin: Decimal,

    /// Recipe lines whose material could not be resolved (costed as zero).
    pub unresolved_lines: usize,
}

// =============================================================================
// Consumption
// =============================================================================

/// An amount of one material required or consumed.
///
/// Produced by scaling a recipe; used for stock checks, decrements and the
/// frozen snapshot on a [`Sale`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Consumption {
    pub material_id: String,
    #[ts(type = "string")]
    pub quantity: Decimal,
}

impl Consumption {
    /// Creates a consumption entry.
    pub fn new(material_id: impl Into<String>, quantity: Decimal) -> Self {
        Consumption {
            material_id: material_id.into(),
            quantity,
        }
    }
}

/// Outcome of checking a consumption list against stock on hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockCheck {
    /// True when every requested material is present in sufficient quantity.
    pub ok: bool,

    /// Names of the materials that fall short, in request order.
    pub insufficient_names: Vec<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed transaction. Append-only: never edited, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// Product sold (weak reference; the product may be deleted later).
    pub product_id: String,

    /// Price charged per unit, independent of the reference price.
    pub unit_price: Money,

    /// Units sold (positive integer).
    pub quantity: i64,

    /// When the sale was committed.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Materials consumed, frozen at commit time.
    pub consumption: Vec<Consumption>,
}

impl Sale {
    /// Revenue of this sale (unit price × quantity), or `None` on overflow.
    #[inline]
    pub fn total(&self) -> Option<Money> {
        self.unit_price.checked_multiply_quantity(self.quantity)
    }
}

impl Entity for Sale {
    const KIND: EntityKind = EntityKind::Sale;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Request to sell `quantity` units of a product at `unit_price` each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleInput {
    pub product_id: String,
    pub unit_price: Money,
    pub quantity: i64,
}

/// A sale joined with its product's current name, for history listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,

    /// Current product name, or a placeholder if the product was deleted.
    pub product_name: String,
}

// =============================================================================
// Sale Preview
// =============================================================================

/// Where a sale attempt stands after preview.
///
/// ```text
/// Drafting ──preview()──► Previewed ──commit()──► Committed
///                              │
///                              └── stock short ──► Rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PreviewStatus {
    /// Stock suffices; the sale may be committed.
    Ready,
    /// Stock is short; commit will be refused.
    Rejected,
}

/// One material line of a sale preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ConsumptionDetail {
    pub material_id: String,
    /// Material name, or a placeholder if it no longer exists.
    pub name: String,
    /// `None` when the material no longer exists.
    pub unit: Option<Unit>,
    #[ts(type = "string")]
    pub required: Decimal,
    #[ts(type = "string")]
    pub current_stock: Decimal,
    pub sufficient: bool,
}

/// Advisory summary shown before a sale is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalePreview {
    pub product_id: String,
    pub product_name: String,
    pub reference_price: Money,
    pub unit_price: Money,
    pub quantity: i64,
    /// unit price × quantity.
    pub total: Money,
    /// Recipe cost at current prices × quantity.
    pub total_cost: Money,
    pub lines: Vec<ConsumptionDetail>,
    pub sufficient: bool,
    pub insufficient_names: Vec<String>,
    pub status: PreviewStatus,
}

// =============================================================================
// Statistics
// =============================================================================

/// Best-selling product of a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BestSeller {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
}

/// Dashboard figures for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesStatistics {
    /// Month, 1-12.
    pub month: u32,
    pub year: i32,
    /// Σ unit price × quantity.
    pub revenue: Money,
    /// Σ consumption snapshots valued at CURRENT material costs.
    pub cost: Money,
    /// revenue − cost.
    pub balance: Money,
    pub transactions: usize,
    pub best_seller: Option<BestSeller>,
}

// =============================================================================
// Unit Tests
// =============================================================================
