//! # Money Module
//!
//! Fixed-point amounts for prices, line subtotals and sale totals.
//!
//! ## Representation
//! ```text
//! 10.99 pesos  ──►  Money(1099)
//!
//! unit price   1099
//! × quantity      3
//! = subtotal   3297     exact, no rounding
//! Σ subtotals  total    exact, no rounding
//! ```
//!
//! Binary floats cannot hold 0.10 exactly, so a total summed from float
//! subtotals drifts by fractions of a cent. Amounts are whole cents
//! instead, and rounding happens once: when an external decimal enters the
//! system (half away from zero, two places).
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//! use tlapa_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 3297);
//!
//! // External amounts are rounded half away from zero
//! let parsed = Money::from_decimal(Decimal::from_str("12.345").unwrap()).unwrap();
//! assert_eq!(parsed.cents(), 1235);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

/// Number of decimal places every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.sale_price ──► SaleLine.unit_price ──► SaleLine.subtotal       │
/// │         (copied at transaction time)                 │                  │
/// │                                                      ▼                  │
/// │                                                 Sale.total              │
/// │                                                                         │
/// │  ReceiptEntry.purchase_price / sale_price ──► Product (override)        │
/// │                                                                         │
/// │  NUMERIC(12,2) column ◄──► Money ◄──► JSON number (edges only)         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use tlapa_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Converts an exact decimal amount into cents.
    ///
    /// Rounds to two places with **round half away from zero**:
    ///
    /// ```text
    ///  12.345 →  12.35
    ///  12.344 →  12.34
    /// -12.345 → -12.35
    /// ```
    ///
    /// Returns `None` when the amount does not fit in an `i64` of cents.
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let mut rounded = amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MONEY_SCALE);
        if rounded.scale() != MONEY_SCALE {
            return None;
        }
        i64::try_from(rounded.mantissa()).ok().map(Money)
    }

    /// Converts to an exact decimal with two places (for NUMERIC columns).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    /// Converts to a floating point number of major units.
    ///
    /// ## Note
    /// For JSON responses only. Never feed the result back into arithmetic.
    pub fn to_major_f64(&self) -> f64 {
        self.to_decimal().to_f64().unwrap_or(self.0 as f64 / 100.0)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tlapa_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // $8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs. Localized formatting belongs to the client.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parts() {
        let hammer = Money::from_cents(24_950);
        assert_eq!(hammer.dollars(), 249);
        assert_eq!(hammer.cents_part(), 50);
        assert!(!hammer.is_zero());
        assert!(Money::default().is_zero());
    }

    #[test]
    fn test_display_for_logs() {
        assert_eq!(Money::from_cents(24_950).to_string(), "$249.50");
        assert_eq!(Money::from_cents(7).to_string(), "$0.07");
        assert_eq!(Money::from_cents(-1_205).to_string(), "-$12.05");
    }

    #[test]
    fn test_operators() {
        let mut running = Money::from_cents(1_250);
        running += Money::from_cents(75);
        assert_eq!(running.cents(), 1_325);
        assert_eq!((running - Money::from_cents(325)).cents(), 1_000);
        assert_eq!((Money::from_cents(333) * 3).cents(), 999);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(3000), Money::from_cents(1), Money::from_cents(99)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 3100);
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec("10")).unwrap().cents(), 1000);
        assert_eq!(Money::from_decimal(dec("12.345")).unwrap().cents(), 1235);
        assert_eq!(Money::from_decimal(dec("12.344")).unwrap().cents(), 1234);
        assert_eq!(Money::from_decimal(dec("0.005")).unwrap().cents(), 1);
        assert_eq!(Money::from_decimal(dec("-12.345")).unwrap().cents(), -1235);
        assert_eq!(Money::from_decimal(dec("2.5")).unwrap().cents(), 250);
    }

    #[test]
    fn test_from_decimal_overflow() {
        assert!(Money::from_decimal(Decimal::MAX).is_none());
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(1099).to_decimal(), dec("10.99"));
        assert_eq!(Money::from_cents(1000).to_decimal().scale(), 2);
        assert_eq!(Money::from_cents(3000).to_major_f64(), 30.0);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
        assert!(Money::from_cents(i64::MAX).checked_multiply_quantity(2).is_none());
    }

    /// Chained float math drifts; integer cents do not.
    #[test]
    fn test_no_drift_across_lines() {
        let price = Money::from_decimal(dec("0.1")).unwrap();
        let total: Money = (0..3).map(|_| price).sum();
        assert_eq!(total.to_decimal(), dec("0.30"));
    }
}
