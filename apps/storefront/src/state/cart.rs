//! # Cart Sessions
//!
//! One [`CartStore`] per browser session, kept in process memory.
//!
//! ## Thread Safety
//! Every session lives behind a single `Arc<Mutex<..>>`. The lock is held
//! only while one action is dispatched, never across an `.await`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Session Operations                              │
//! │                                                                         │
//! │  HTTP Request                 Session Call            Store Change      │
//! │  ────────────                 ────────────            ────────────      │
//! │                                                                         │
//! │  POST /api/carts ───────────► create() ────────────► new CartStore      │
//! │                                                                         │
//! │  POST .../items ────────────► dispatch(ADD_ITEM) ──► +1 or append       │
//! │                                                                         │
//! │  PUT .../items/{id} ────────► dispatch(UPDATE_QTY) ► set or remove      │
//! │                                                                         │
//! │  DELETE .../items/{id} ─────► dispatch(REMOVE) ────► remove             │
//! │                                                                         │
//! │  GET /api/carts/{id} ───────► snapshot() ──────────► (read only)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use furnish_core::{CartAction, CartState, CartStore};
use uuid::Uuid;

/// Carts keyed by session id.
#[derive(Debug, Clone, Default)]
pub struct CartSessions {
    inner: Arc<Mutex<HashMap<String, CartStore>>>,
}

impl CartSessions {
    pub fn new() -> Self {
        CartSessions::default()
    }

    /// Opens an empty cart and returns its session id.
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.lock().insert(id.clone(), CartStore::new());
        id
    }

    /// Applies one action and returns the resulting state.
    ///
    /// `None` when the session doesn't exist.
    pub fn dispatch(&self, cart_id: &str, action: CartAction) -> Option<CartState> {
        self.with_cart_mut(cart_id, |store| store.dispatch(action).clone())
    }

    /// Copy of the current state.
    pub fn snapshot(&self, cart_id: &str) -> Option<CartState> {
        self.with_cart(cart_id, |state| state.clone())
    }

    /// Executes a function with read access to one cart.
    pub fn with_cart<F, R>(&self, cart_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&CartState) -> R,
    {
        self.lock().get(cart_id).map(|store| f(store.state()))
    }

    /// Executes a function with write access to one cart.
    pub fn with_cart_mut<F, R>(&self, cart_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut CartStore) -> R,
    {
        self.lock().get_mut(cart_id).map(f)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // dispatch swaps in a whole new CartState, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CartStore>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use furnish_core::cart::CartProduct;
    use furnish_core::Money;

    fn chair() -> CartProduct {
        CartProduct {
            id: "office-chair".into(),
            name: "Office Chair".into(),
            price: Money::from_major(15_000),
            image_url: None,
        }
    }

    #[test]
    fn test_sessions_are_independent() {
        let sessions = CartSessions::new();
        let a = sessions.create();
        let b = sessions.create();
        assert_ne!(a, b);
        assert_eq!(sessions.len(), 2);

        sessions.dispatch(&a, CartAction::AddItem(chair())).unwrap();
        sessions.dispatch(&a, CartAction::AddItem(chair())).unwrap();

        assert_eq!(sessions.snapshot(&a).unwrap().item_count(), 2);
        assert!(sessions.snapshot(&b).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_session() {
        let sessions = CartSessions::new();
        assert!(sessions.snapshot("missing").is_none());
        assert!(sessions.dispatch("missing", CartAction::ClearCart).is_none());
    }

    #[test]
    fn test_clones_share_carts() {
        let sessions = CartSessions::new();
        let id = sessions.create();

        let handle = sessions.clone();
        handle.dispatch(&id, CartAction::AddItem(chair())).unwrap();

        let total = sessions.with_cart(&id, |cart| cart.total()).unwrap();
        assert_eq!(total, Money::from_major(15_000));
    }
}
