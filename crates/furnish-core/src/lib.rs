//! # furnish-core: Storefront Rules Without I/O
//!
//! Everything the storefront decides lives here: what the cart holds, what
//! it costs, which products a catalog query selects, when an order can be
//! placed or returned. Nothing in this crate touches a database, a socket
//! or the clock (callers pass `now` in).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Furnish Storefront                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               apps/storefront (axum HTTP API)                   │   │
//! │  │   /api/products ─ /api/carts ─ /api/checkout ─ /api/orders      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ furnish-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌──────────┐ ┌───────┐  │   │
//! │  │   │  cart   │ │ pricing │ │ catalog  │ │ checkout │ │orders │  │   │
//! │  │   │ reducer │ │  quote  │ │  query   │ │  draft   │ │returns│  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └──────────┘ └───────┘  │   │
//! │  │         money • types • validation • error • support           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 furnish-db (SQLite via sqlx)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - Cart actions, the reducer and the store that owns the state
//! - [`pricing`] - Shipping and GST for a subtotal
//! - [`catalog`] - Filter/sort parameters and stale-response gating
//! - [`checkout`] - Checkout form validation and order drafts
//! - [`orders`] - Tracking timeline and returns
//! - [`support`] - Support requests and FAQs
//! - [`money`] - Integer rupee amounts (paise)
//! - [`types`] - Products, orders and their enums
//! - [`validation`] - Field-level checks
//! - [`error`] - Domain errors
//!
//! ## Example Usage
//!
//! ```rust
//! use furnish_core::{CartAction, CartStore, Money, PricingPolicy};
//! use furnish_core::cart::CartProduct;
//!
//! let mut store = CartStore::new();
//! store.dispatch(CartAction::AddItem(CartProduct {
//!     id: "sofa".into(),
//!     name: "Modern Sofa".into(),
//!     price: Money::from_major(1500),
//!     image_url: None,
//! }));
//!
//! let quote = PricingPolicy::default().quote(store.state().total());
//! assert_eq!(quote.shipping, Money::from_major(200));
//! assert_eq!(quote.tax, Money::from_major(270));
//! assert_eq!(quote.total, Money::from_major(1970));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod support;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

pub use cart::{CartAction, CartState, CartStore};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{PriceBreakdown, PricingPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Upper bound on a single line's quantity.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Search text longer than this is cut.
pub const MAX_SEARCH_LENGTH: usize = 100;

/// Days after ordering during which a delivered order can be returned.
pub const RETURN_WINDOW_DAYS: i64 = 30;

/// Estimated delivery is this many days after the order is placed.
pub const DELIVERY_DAYS: i64 = 7;

/// How many products the featured shelf shows.
pub const FEATURED_LIMIT: i64 = 6;

pub const ORDER_NUMBER_PREFIX: &str = "FS";
