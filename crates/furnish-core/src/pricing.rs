//! # Derived Pricing
//!
//! Shipping, GST and grand total as a pure function of the subtotal.
//!
//! ## Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal ──┬──► subtotal ≥ threshold ? ₹0 : flat fee ──► shipping     │
//! │             │                                                           │
//! │             └──► subtotal × tax rate (half-up) ─────────► tax          │
//! │                                                                         │
//! │  total = subtotal + shipping + tax      (shipping is not taxed)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One [`PricingPolicy`] value is shared by the cart view, checkout and the
//! order summary so the three can never disagree.
//!
//! ```rust
//! use furnish_core::pricing::PricingPolicy;
//! use furnish_core::Money;
//!
//! let quote = PricingPolicy::default().quote(Money::from_major(1500));
//! assert_eq!(quote.shipping, Money::from_major(200));
//! assert_eq!(quote.tax, Money::from_major(270));
//! assert_eq!(quote.total, Money::from_major(1970));
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::TaxRate;

/// Orders at or above ₹2,000 ship free.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::from_major(2_000);

/// Flat shipping below the threshold: ₹200.
pub const DEFAULT_FLAT_SHIPPING: Money = Money::from_major(200);

/// GST at 18%.
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(1800);

/// Shipping and tax constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PricingPolicy {
    /// Subtotal at which shipping becomes free (inclusive).
    pub free_shipping_threshold: Money,
    /// Shipping charged below the threshold.
    pub flat_shipping: Money,
    pub tax_rate: TaxRate,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            flat_shipping: DEFAULT_FLAT_SHIPPING,
            tax_rate: DEFAULT_TAX_RATE,
        }
    }
}

/// The four numbers every summary shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub shipping: Money,
    pub tax: Money,
    pub total: Money,
}

impl PricingPolicy {
    /// Shipping for a subtotal: free at or above the threshold, otherwise
    /// the flat fee. A zero subtotal is below the threshold like any other.
    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping
        }
    }

    /// GST on the subtotal.
    pub fn tax_for(&self, subtotal: Money) -> Money {
        subtotal.calculate_tax(self.tax_rate)
    }

    /// Full breakdown for a subtotal.
    pub fn quote(&self, subtotal: Money) -> PriceBreakdown {
        let shipping = self.shipping_for(subtotal);
        let tax = self.tax_for(subtotal);

        PriceBreakdown {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// How much more the customer must add to unlock free shipping.
    ///
    /// Zero once the threshold is reached.
    pub fn amount_to_free_shipping(&self, subtotal: Money) -> Money {
        if subtotal >= self.free_shipping_threshold {
            Money::zero()
        } else {
            self.free_shipping_threshold - subtotal
        }
    }
}
