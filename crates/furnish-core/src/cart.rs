//! # Cart State Machine
//!
//! The shopping cart as a reducer over [`CartAction`]s.
//!
//! ## States and Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │        ADD_ITEM                          ADD_ITEM / UPDATE_QUANTITY(>0) │
//! │   ┌──────────────┐                      ┌──────────────┐               │
//! │   │              ▼                      │              │               │
//! │  ┌┴────────┐  ADD_ITEM   ┌──────────────┴─┐            │               │
//! │  │  Empty  │ ──────────► │    NonEmpty    │ ◄──────────┘               │
//! │  │ items=∅ │ ◄────────── │   items ≠ ∅    │                            │
//! │  └─────────┘  CLEAR_CART └────────────────┘                            │
//! │       ▲       or last REMOVE_ITEM / UPDATE_QUANTITY(≤0)                 │
//! │       │                                                                 │
//! │       └── CLEAR_CART, REMOVE_ITEM(unknown), UPDATE_QUANTITY(unknown)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one [`CartItem`] per product id
//! - Every quantity is ≥ 1
//! - `item_count = Σ quantity` (not the number of distinct ids)
//! - `total = Σ price × quantity`
//!
//! The aggregates are private and recomputed after every action, so no
//! caller can observe a state where they disagree with `items`.
//!
//! ## Usage
//! ```rust
//! use furnish_core::cart::{CartAction, CartProduct, CartStore};
//! use furnish_core::Money;
//!
//! let sofa = CartProduct {
//!     id: "sofa".into(),
//!     name: "Modern Sofa".into(),
//!     price: Money::from_major(45_000),
//!     image_url: None,
//! };
//!
//! let mut store = CartStore::new();
//! store.dispatch(CartAction::AddItem(sofa.clone()));
//! let state = store.dispatch(CartAction::AddItem(sofa));
//! assert_eq!(state.item_count(), 2);
//! assert_eq!(state.total(), Money::from_major(90_000));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Items
// =============================================================================

/// The product fields the cart needs, as sent with ADD_ITEM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartProduct {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub image_url: Option<String>,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        CartProduct {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price(),
            image_url: product.image_url.clone(),
        }
    }
}

/// A line in the cart.
///
/// Price and name are frozen when the product is first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub image_url: Option<String>,
    /// Always ≥ 1.
    pub quantity: i64,
}

impl CartItem {
    fn from_product(product: CartProduct) -> Self {
        CartItem {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            quantity: 1,
        }
    }

    /// price × quantity
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Everything that can happen to a cart.
///
/// ## Wire Shape
/// ```json
/// {"type": "ADD_ITEM", "payload": {"id": "..", "name": "..", "price": 4500000, "imageUrl": null}}
/// {"type": "REMOVE_ITEM", "payload": "<id>"}
/// {"type": "UPDATE_QUANTITY", "payload": {"id": "..", "quantity": 3}}
/// {"type": "CLEAR_CART"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum CartAction {
    /// Increment the line for this id, or append it with quantity 1.
    AddItem(CartProduct),
    /// Drop the line for this id. Unknown ids are ignored.
    RemoveItem(String),
    /// Replace the quantity. `quantity ≤ 0` removes the line.
    UpdateQuantity { id: String, quantity: i64 },
    /// Empty the cart. Idempotent.
    ClearCart,
}

// =============================================================================
// State
// =============================================================================

/// Which of the two cart states we're in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CartPhase {
    Empty,
    NonEmpty,
}

/// Cart contents plus derived aggregates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    items: Vec<CartItem>,
    item_count: i64,
    total: Money,
}

impl CartState {
    /// The empty cart.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Applies one action and returns the next state.
    ///
    /// Every action is total: there is no error path. Unknown ids are
    /// no-ops, and non-positive quantities mean "remove". Counts and totals
    /// saturate at the i64 bounds.
    pub fn reduce(mut self, action: CartAction) -> CartState {
        self.apply(action);
        self
    }

    fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::AddItem(product) => {
                match self.items.iter_mut().find(|item| item.id == product.id) {
                    Some(item) => item.quantity = item.quantity.saturating_add(1),
                    None => self.items.push(CartItem::from_product(product)),
                }
            }
            CartAction::RemoveItem(id) => {
                self.items.retain(|item| item.id != id);
            }
            CartAction::UpdateQuantity { id, quantity } => {
                if quantity <= 0 {
                    self.items.retain(|item| item.id != id);
                } else if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.quantity = quantity;
                }
            }
            CartAction::ClearCart => {
                self.items.clear();
            }
        }

        self.recompute();
    }

    fn recompute(&mut self) {
        self.item_count = self
            .items
            .iter()
            .fold(0_i64, |count, item| count.saturating_add(item.quantity));
        self.total = self.items.iter().map(CartItem::line_total).sum();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> i64 {
        self.item_count
    }

    /// Sum of line totals, i.e. the subtotal before shipping and tax.
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> CartPhase {
        if self.items.is_empty() {
            CartPhase::Empty
        } else {
            CartPhase::NonEmpty
        }
    }

    /// Quantity held for a product id, 0 if absent.
    pub fn quantity_of(&self, id: &str) -> i64 {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }
}

// =============================================================================
// Store
// =============================================================================

/// An explicitly owned cart.
///
/// The only way to change the state is [`CartStore::dispatch`]; readers
/// borrow the current [`CartState`]. Whoever owns the store decides how it
/// is shared (the storefront keeps one per session behind a mutex).
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    state: CartState,
}

impl CartStore {
    pub fn new() -> Self {
        CartStore::default()
    }

    /// Applies an action and returns the resulting state.
    pub fn dispatch(&mut self, action: CartAction) -> &CartState {
        let current = std::mem::take(&mut self.state);
        self.state = current.reduce(action);
        &self.state
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }
}

// =============================================================================
// Input Coercion
// =============================================================================

/// Turns a raw quantity field into an integer the reducer accepts.
///
/// Numbers are used as given (so `0` or negatives still remove the line),
/// fractional numbers are truncated, numeric strings are parsed by their
/// leading integer, and anything non-numeric becomes 1.
///
/// ```rust
/// use furnish_core::cart::coerce_quantity;
/// use serde_json::json;
///
/// assert_eq!(coerce_quantity(&json!(4)), 4);
/// assert_eq!(coerce_quantity(&json!("7")), 7);
/// assert_eq!(coerce_quantity(&json!("lots")), 1);
/// assert_eq!(coerce_quantity(&json!(0)), 0);
/// ```
pub fn coerce_quantity(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(1),
        Value::String(s) => leading_integer(s).unwrap_or(1),
        _ => 1,
    }
}

fn leading_integer(input: &str) -> Option<i64> {
    let input = input.trim_start();
    let (sign, rest) = match input.as_bytes().first() {
        Some(b'-') => (-1, &input[1..]),
        Some(b'+') => (1, &input[1..]),
        _ => (1, input),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    digits.parse::<i64>().ok().map(|n| sign * n)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: &str, price: i64) -> CartProduct {
        CartProduct {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Money::from_minor(price),
            image_url: None,
        }
    }

    fn run(actions: Vec<CartAction>) -> CartState {
        actions.into_iter().fold(CartState::new(), CartState::reduce)
    }

    #[test]
    fn test_walkthrough() {
        let a = product("A", 100);

        let state = CartState::new().reduce(CartAction::AddItem(a.clone()));
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].quantity, 1);
        assert_eq!(state.item_count(), 1);
        assert_eq!(state.total().minor(), 100);

        let state = state.reduce(CartAction::AddItem(a));
        assert_eq!(state.item_count(), 2);
        assert_eq!(state.total().minor(), 200);

        let state = state.reduce(CartAction::UpdateQuantity {
            id: "A".into(),
            quantity: 5,
        });
        assert_eq!(state.item_count(), 5);
        assert_eq!(state.total().minor(), 500);

        let state = state.reduce(CartAction::RemoveItem("A".into()));
        assert!(state.items().is_empty());
        assert_eq!(state.item_count(), 0);
        assert_eq!(state.total(), Money::zero());
    }

    #[test]
    fn test_item_count_is_sum_of_quantities() {
        let state = run(vec![
            CartAction::AddItem(product("A", 100)),
            CartAction::AddItem(product("B", 250)),
            CartAction::AddItem(product("A", 100)),
            CartAction::AddItem(product("A", 100)),
        ]);

        assert_eq!(state.items().len(), 2);
        assert_eq!(state.item_count(), 4);
        assert_eq!(state.quantity_of("A"), 3);
        assert_eq!(state.quantity_of("B"), 1);
    }

    #[test]
    fn test_total_tracks_interleaved_actions() {
        let state = run(vec![
            CartAction::AddItem(product("A", 4_500_000)),
            CartAction::AddItem(product("B", 1_250_000)),
            CartAction::UpdateQuantity { id: "B".into(), quantity: 3 },
            CartAction::AddItem(product("C", 2_000_000)),
            CartAction::RemoveItem("A".into()),
            CartAction::AddItem(product("C", 2_000_000)),
        ]);

        let expected: i64 = state
            .items()
            .iter()
            .map(|item| item.price.minor() * item.quantity)
            .sum();
        assert_eq!(state.total().minor(), expected);
        assert_eq!(state.total().minor(), 1_250_000 * 3 + 2_000_000 * 2);
        assert_eq!(state.item_count(), 5);
    }

    #[test]
    fn test_add_keeps_first_price() {
        let state = run(vec![
            CartAction::AddItem(product("A", 100)),
            CartAction::AddItem(product("A", 999)),
        ]);
        assert_eq!(state.items()[0].price.minor(), 100);
        assert_eq!(state.total().minor(), 200);
    }

    #[test]
    fn test_update_to_zero_equals_remove() {
        let base = run(vec![
            CartAction::AddItem(product("A", 100)),
            CartAction::AddItem(product("B", 200)),
        ]);

        let updated = base.clone().reduce(CartAction::UpdateQuantity {
            id: "A".into(),
            quantity: 0,
        });
        let removed = base.reduce(CartAction::RemoveItem("A".into()));

        assert_eq!(updated, removed);
    }

    #[test]
    fn test_huge_quantities_saturate_instead_of_panicking() {
        let state = run(vec![
            CartAction::AddItem(product("A", 100)),
            CartAction::AddItem(product("B", 100)),
            CartAction::UpdateQuantity { id: "A".into(), quantity: i64::MAX / 10 },
            CartAction::UpdateQuantity { id: "B".into(), quantity: i64::MAX },
        ]);

        assert_eq!(state.quantity_of("A"), i64::MAX / 10);
        assert_eq!(state.item_count(), i64::MAX);
        assert_eq!(state.total(), Money::from_minor(i64::MAX));

        let state = state.reduce(CartAction::AddItem(product("B", 100)));
        assert_eq!(state.quantity_of("B"), i64::MAX);
        assert_eq!(state.total(), Money::from_minor(i64::MAX));

        let state = state.reduce(CartAction::RemoveItem("B".into()));
        assert_eq!(state.total().minor(), (i64::MAX / 10).saturating_mul(100));
    }

    #[test]
    fn test_negative_quantity_removes() {
        let state = run(vec![
            CartAction::AddItem(product("A", 100)),
            CartAction::UpdateQuantity { id: "A".into(), quantity: -3 },
        ]);
        assert!(state.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let base = run(vec![CartAction::AddItem(product("A", 100))]);

        let after_remove = base.clone().reduce(CartAction::RemoveItem("missing".into()));
        assert_eq!(after_remove, base);

        let after_update = base.clone().reduce(CartAction::UpdateQuantity {
            id: "missing".into(),
            quantity: 4,
        });
        assert_eq!(after_update, base);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let state = run(vec![
            CartAction::AddItem(product("A", 100)),
            CartAction::AddItem(product("B", 300)),
            CartAction::ClearCart,
        ]);
        assert!(state.items().is_empty());
        assert_eq!(state.item_count(), 0);
        assert_eq!(state.total(), Money::zero());

        let again = state.clone().reduce(CartAction::ClearCart);
        assert_eq!(again, state);
        assert_eq!(again, CartState::new());
    }

    #[test]
    fn test_phase_transitions() {
        let mut store = CartStore::new();
        assert_eq!(store.state().phase(), CartPhase::Empty);

        store.dispatch(CartAction::AddItem(product("A", 100)));
        assert_eq!(store.state().phase(), CartPhase::NonEmpty);

        store.dispatch(CartAction::UpdateQuantity { id: "A".into(), quantity: 0 });
        assert_eq!(store.state().phase(), CartPhase::Empty);
    }

    #[test]
    fn test_action_wire_shape() {
        let add: CartAction = serde_json::from_value(json!({
            "type": "ADD_ITEM",
            "payload": {"id": "A", "name": "Sofa", "price": 100, "imageUrl": null}
        }))
        .unwrap();
        assert_eq!(add, CartAction::AddItem(CartProduct {
            id: "A".into(),
            name: "Sofa".into(),
            price: Money::from_minor(100),
            image_url: None,
        }));

        let remove: CartAction =
            serde_json::from_value(json!({"type": "REMOVE_ITEM", "payload": "A"})).unwrap();
        assert_eq!(remove, CartAction::RemoveItem("A".into()));

        let update: CartAction = serde_json::from_value(json!({
            "type": "UPDATE_QUANTITY",
            "payload": {"id": "A", "quantity": 2}
        }))
        .unwrap();
        assert_eq!(update, CartAction::UpdateQuantity { id: "A".into(), quantity: 2 });

        let clear: CartAction = serde_json::from_value(json!({"type": "CLEAR_CART"})).unwrap();
        assert_eq!(clear, CartAction::ClearCart);
        assert_eq!(
            serde_json::to_value(&CartAction::ClearCart).unwrap(),
            json!({"type": "CLEAR_CART"})
        );
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity(&json!(3)), 3);
        assert_eq!(coerce_quantity(&json!(0)), 0);
        assert_eq!(coerce_quantity(&json!(-2)), -2);
        assert_eq!(coerce_quantity(&json!(2.9)), 2);
        assert_eq!(coerce_quantity(&json!("5")), 5);
        assert_eq!(coerce_quantity(&json!(" 12 chairs")), 12);
        assert_eq!(coerce_quantity(&json!("-1")), -1);
        assert_eq!(coerce_quantity(&json!("abc")), 1);
        assert_eq!(coerce_quantity(&json!("")), 1);
        assert_eq!(coerce_quantity(&json!(null)), 1);
        assert_eq!(coerce_quantity(&json!([2])), 1);
    }
}
