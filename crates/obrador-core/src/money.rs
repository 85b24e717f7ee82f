//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Recipes make it worse: costs are multiplied by FRACTIONAL quantities  │
//! │    0.3 kg sugar × $30.00/kg + 0.2 kg chocolate × $180.00/kg            │
//! │  Integer cents cannot hold $0.15 × 0.5 ml either.                      │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal (rust_decimal)                           │
//! │    Every sum and product is exact; rounding happens only for display   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use obrador_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let unit_cost = Money::new(Decimal::from(25));          // $25.00 per kg
//! let line_cost = unit_cost.times(Decimal::new(5, 1));    // × 0.5 kg
//! assert_eq!(line_cost, Money::new(Decimal::new(125, 1))); // $12.50
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the bakery's currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: balances may go negative when costs exceed revenue
/// - **Single field tuple struct**: zero-cost wrapper, serialized as a string
/// - **No float constructor**: amounts enter as `Decimal` or integers only
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Material.unit_cost ──► RecipeLine cost ──► Product cost ──► Margin %   │
/// │                                                                         │
/// │  SaleInput.unit_price × quantity ──► Sale total ──► Monthly revenue     │
/// │                                                                         │
/// │  Sale snapshot × current unit costs ──► Monthly cost ──► Balance        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates an amount from a whole number of currency units.
    ///
    /// ## Example
    /// ```rust
    /// use obrador_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_units(450).amount(), Decimal::from(450));
    /// ```
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies the amount by a (possibly fractional) quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Harina: $25.00 per kg
    /// Recipe uses: 0.5 kg
    ///      │
    ///      ▼
    /// times(0.5) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line cost: $12.50
    /// ```
    ///
    /// ## Panics
    /// On decimal overflow. Engine code paths use
    /// [`checked_times`](Self::checked_times).
    #[inline]
    pub fn times(&self, quantity: Decimal) -> Self {
        Money(self.0 * quantity)
    }

    /// Multiplies the amount by a whole count of units sold.
    ///
    /// ## Panics
    /// On decimal overflow, like [`times`](Self::times).
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// `self × quantity`, or `None` on overflow.
    #[inline]
    pub fn checked_times(&self, quantity: Decimal) -> Option<Self> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// `self × qty`, or `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.checked_times(Decimal::from(qty))
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `self − other`, or `None` on overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Sums `amounts`, or `None` if the running total overflows.
    ///
    /// ## Example
    /// ```rust
    /// use obrador_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let total = Money::checked_sum([Money::from_units(2), Money::from_units(3)]);
    /// assert_eq!(total, Some(Money::from_units(5)));
    ///
    /// let max = Money::new(Decimal::MAX);
    /// assert_eq!(Money::checked_sum([max, max]), None);
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }

    /// Rounds to `decimals` places using Bankers Rounding (half to even).
    ///
    /// Only used for display and reports; stored values are never rounded.
    ///
    /// ## Example
    /// ```rust
    /// use obrador_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::new(Decimal::new(12345, 3)); // 12.345
    /// assert_eq!(m.rounded(2).amount(), Decimal::new(1234, 2)); // 12.34
    /// ```
    pub fn rounded(&self, decimals: u32) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with two decimals and a `$` sign.
///
/// ## Note
/// This is for logs and debugging. Presentation code should use the
/// engine's configured currency formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded(2).0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(f, "{}${:.2}", sign, rounded.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a decimal quantity.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, quantity: Decimal) -> Self {
        Money(self.0 * quantity)
    }
}

/// Multiplication by a whole count (units sold).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::new(dec!(10.99))), "$10.99");
        assert_eq!(format!("{}", Money::from_units(5)), "$5.00");
        assert_eq!(format!("{}", Money::new(dec!(-5.5))), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(10);
        let b = Money::new(dec!(2.5));

        assert_eq!(a + b, Money::new(dec!(12.5)));
        assert_eq!(a - b, Money::new(dec!(7.5)));
        assert_eq!(b * 3_i64, Money::new(dec!(7.5)));
        assert_eq!(b * dec!(0.5), Money::new(dec!(1.25)));
    }

    #[test]
    fn test_fractional_quantities_are_exact() {
        // 0.1 + 0.2 must be exactly 0.3
        let total: Money = [Money::new(dec!(0.1)), Money::new(dec!(0.2))].iter().sum();
        assert_eq!(total, Money::new(dec!(0.3)));

        // Vainilla: $0.50 per ml × 10 ml
        assert_eq!(Money::new(dec!(0.5)).times(dec!(10)), Money::from_units(5));
    }

    #[test]
    fn test_checked_arithmetic_reports_overflow() {
        let max = Money::new(Decimal::MAX);

        assert_eq!(max.checked_multiply_quantity(2), None);
        assert_eq!(max.checked_times(dec!(1.5)), None);
        assert_eq!(max.checked_add(Money::from_units(1)), None);
        assert_eq!(Money::new(Decimal::MIN).checked_sub(Money::from_units(1)), None);
        assert_eq!(
            Money::from_units(10_000_000_000).checked_multiply_quantity(i64::MAX),
            None
        );

        let b = Money::new(dec!(2.5));
        assert_eq!(b.checked_multiply_quantity(3), Some(Money::new(dec!(7.5))));
        assert_eq!(b.checked_times(dec!(0.5)), Some(Money::new(dec!(1.25))));
    }

    #[test]
    fn test_bankers_rounding() {
        assert_eq!(Money::new(dec!(0.125)).rounded(2), Money::new(dec!(0.12)));
        assert_eq!(Money::new(dec!(0.135)).rounded(2), Money::new(dec!(0.14)));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::new(dec!(0.01));
        assert!(positive.is_positive());

        let negative = Money::new(dec!(-0.01));
        assert!(negative.is_negative());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(12.5))).unwrap();
        assert_eq!(json, "\"12.5\"");
    }
}
