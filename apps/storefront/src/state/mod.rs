//! # State Module
//!
//! Everything a handler can reach through `State<Arc<AppState>>`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │                        Arc<AppState>                                    │
//! │          ┌──────────────────┼──────────────────┐                        │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐               │
//! │  │   Database   │  │ CartSessions │  │ StorefrontConfig │               │
//! │  │  (SQLite     │  │  Arc<Mutex<  │  │  pricing policy  │               │
//! │  │   pool)      │  │  HashMap>>   │  │  currency        │               │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘               │
//! │                                                                         │
//! │  THREAD SAFETY:                                                         │
//! │  • Database: internal connection pool                                   │
//! │  • CartSessions: one mutex, held per dispatch                           │
//! │  • StorefrontConfig: read-only after startup                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;

pub use cart::CartSessions;

use furnish_core::PricingPolicy;
use furnish_db::Database;

use crate::config::StorefrontConfig;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub carts: CartSessions,
    pub config: StorefrontConfig,
    /// Derived once from `config.pricing`.
    pub pricing: PricingPolicy,
}

impl AppState {
    pub fn new(db: Database, config: StorefrontConfig) -> Self {
        let pricing = config.pricing_policy();
        AppState {
            db,
            carts: CartSessions::new(),
            config,
            pricing,
        }
    }
}
