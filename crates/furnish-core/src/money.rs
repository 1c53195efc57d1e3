//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    1500 * 0.18 + 0.1 + 0.2 = 270.30000000000001  ❌                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹1,500.00 = 150000 paise                                             │
//! │    18% GST   = (150000 × 1800 + 5000) / 10000 = 27000 paise            │
//! │    Every intermediate value is an exact integer                        │
//! │    Add / Sub / Mul saturate at the i64 bounds instead of wrapping      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use furnish_core::money::Money;
//!
//! let price = Money::from_major(45_000);      // ₹45,000.00
//! let two = price * 2;                        // ₹90,000.00
//! let total = two + Money::from_minor(20_000); // + ₹200.00 shipping
//! assert_eq!(total.minor(), 9_020_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Minor units per major unit (paise per rupee).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price_minor ──► CartItem.price ──► CartState.total (subtotal) │
/// │                                                   │                     │
/// │                                                   ▼                     │
/// │                           PricingPolicy::quote ──► shipping, tax, total │
/// │                                                   │                     │
/// │                                                   ▼                     │
/// │                                  Order.subtotal/shipping/tax/total      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Serialized as a bare integer of minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (paise).
    ///
    /// ```rust
    /// use furnish_core::money::Money;
    ///
    /// let price = Money::from_minor(4_500_000);
    /// assert_eq!(price.major(), 45_000);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Parses a decimal amount in major units, as typed into a price filter.
    ///
    /// Accepts `"1500"`, `"1499.5"`, `"1499.50"` and surrounding whitespace.
    /// Returns `None` for anything else (empty input, letters, more than two
    /// decimal places), so callers can treat the bound as absent.
    ///
    /// ```rust
    /// use furnish_core::money::Money;
    ///
    /// assert_eq!(Money::parse_major("1500"), Some(Money::from_major(1500)));
    /// assert_eq!(Money::parse_major("1499.5"), Some(Money::from_minor(149_950)));
    /// assert_eq!(Money::parse_major("cheap"), None);
    /// ```
    pub fn parse_major(input: &str) -> Option<Money> {
        let input = input.trim();
        let (negative, digits) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if frac.len() > 2 {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let frac_value: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().ok()? * 10,
            _ => frac.parse().ok()?,
        };

        let minor = whole_value
            .checked_mul(MINOR_PER_MAJOR)?
            .checked_add(frac_value)?;

        Some(Money(if negative { -minor } else { minor }))
    }

    /// Calculates tax on this amount, rounding half up.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`
    /// The +5000 provides rounding (5000/10000 = 0.5)
    ///
    /// ```rust
    /// use furnish_core::money::Money;
    /// use furnish_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_major(1500);
    /// let gst = subtotal.calculate_tax(TaxRate::from_bps(1800));
    /// assert_eq!(gst, Money::from_major(270));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large carts can't overflow the intermediate product
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money(tax as i64)
    }

    /// Multiplies a unit price by a line quantity, saturating at the i64
    /// bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Money {
        Money(self.0.saturating_mul(qty))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as rupees with two decimals, e.g. `₹1970.00`.
///
/// Locale-aware grouping is left to the frontend; see
/// `StorefrontConfig::format_currency` for configured symbols.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_and_parts() {
        let money = Money::from_minor(149_950);
        assert_eq!(money.major(), 1499);
        assert_eq!(money.minor_part(), 50);
        assert_eq!(Money::from_major(200).minor(), 20_000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_major(1970).to_string(), "₹1970.00");
        assert_eq!(Money::from_minor(5).to_string(), "₹0.05");
        assert_eq!(Money::from_minor(-550).to_string(), "-₹5.50");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_major(100);
        let b = Money::from_major(40);
        assert_eq!(a + b, Money::from_major(140));
        assert_eq!(a - b, Money::from_major(60));
        assert_eq!(a * 3, Money::from_major(300));

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total, Money::from_major(180));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_minor(i64::MAX / 10);
        assert_eq!(huge.multiply_quantity(100), Money::from_minor(i64::MAX));
        assert_eq!(huge * 100 + Money::from_major(1), Money::from_minor(i64::MAX));
        assert_eq!(Money::from_minor(i64::MIN) - Money::from_minor(1), Money::from_minor(i64::MIN));

        let total: Money = [huge; 20].into_iter().sum();
        assert_eq!(total, Money::from_minor(i64::MAX));
    }

    #[test]
    fn test_gst_rounding() {
        let rate = TaxRate::from_bps(1800);
        // 0.18 * 1.37 = 0.2466 -> 25 paise
        assert_eq!(Money::from_minor(137).calculate_tax(rate).minor(), 25);
        // 0.18 * 0.25 = 0.045 -> rounds half up to 5 paise
        assert_eq!(Money::from_minor(25).calculate_tax(rate).minor(), 5);
    }

    #[test]
    fn test_parse_major_accepts_decimal_forms() {
        assert_eq!(Money::parse_major("1500"), Some(Money::from_minor(150_000)));
        assert_eq!(Money::parse_major(" 1500 "), Some(Money::from_minor(150_000)));
        assert_eq!(Money::parse_major("1499.5"), Some(Money::from_minor(149_950)));
        assert_eq!(Money::parse_major("1499.05"), Some(Money::from_minor(149_905)));
        assert_eq!(Money::parse_major(".5"), Some(Money::from_minor(50)));
        assert_eq!(Money::parse_major("0"), Some(Money::zero()));
    }

    #[test]
    fn test_parse_major_rejects_garbage() {
        assert_eq!(Money::parse_major(""), None);
        assert_eq!(Money::parse_major("   "), None);
        assert_eq!(Money::parse_major("abc"), None);
        assert_eq!(Money::parse_major("12a"), None);
        assert_eq!(Money::parse_major("1.234"), None);
        assert_eq!(Money::parse_major("."), None);
        assert_eq!(Money::parse_major("99999999999999999999"), None);
    }
}
