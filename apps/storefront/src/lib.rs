//! # furnish-storefront: HTTP API
//!
//! JSON endpoints for the storefront pages. Rules come from
//! `furnish-core`, storage from `furnish-db`; this crate wires them to
//! axum and owns the in-memory cart sessions.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                                  liveness + DB ping     │
//! │  GET    /api/config                              store + pricing        │
//! │                                                                         │
//! │  GET    /api/products?category&material&search&minPrice&maxPrice&sortBy│
//! │  GET    /api/products/featured                   newest six             │
//! │  GET    /api/products/{id}                                              │
//! │  GET    /api/categories                          facet counts           │
//! │                                                                         │
//! │  POST   /api/carts                               new session            │
//! │  GET    /api/carts/{cart_id}                                            │
//! │  DELETE /api/carts/{cart_id}                     CLEAR_CART             │
//! │  POST   /api/carts/{cart_id}/items               ADD_ITEM               │
//! │  PUT    /api/carts/{cart_id}/items/{product_id}  UPDATE_QUANTITY        │
//! │  DELETE /api/carts/{cart_id}/items/{product_id}  REMOVE_ITEM            │
//! │  POST   /api/carts/{cart_id}/checkout                                   │
//! │                                                                         │
//! │  GET    /api/pricing/quote?subtotal=                                    │
//! │                                                                         │
//! │  GET    /api/orders                                                     │
//! │  GET    /api/orders/{order_number}                                      │
//! │  POST   /api/orders/{order_number}/returns                              │
//! │                                                                         │
//! │  GET    /api/support/faqs                                               │
//! │  POST   /api/support/requests                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub use config::StorefrontConfig;
pub use error::{ApiError, ErrorCode};
pub use state::{AppState, CartSessions};

/// Default `RUST_LOG` when none is set.
pub const DEFAULT_LOG_FILTER: &str = "info,furnish=debug,furnish_storefront=debug,furnish_db=debug,sqlx=warn";

/// Builds the router with every route, CORS and request tracing.
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/config", get(routes::config::get))
        // Catalog
        .route("/api/products", get(routes::catalog::list))
        .route("/api/products/featured", get(routes::catalog::featured))
        .route("/api/products/{id}", get(routes::catalog::get))
        .route("/api/categories", get(routes::catalog::categories))
        // Cart
        .route("/api/carts", post(routes::cart::create))
        .route(
            "/api/carts/{cart_id}",
            get(routes::cart::get).delete(routes::cart::clear),
        )
        .route("/api/carts/{cart_id}/items", post(routes::cart::add_item))
        .route(
            "/api/carts/{cart_id}/items/{product_id}",
            put(routes::cart::update_quantity).delete(routes::cart::remove_item),
        )
        .route("/api/carts/{cart_id}/checkout", post(routes::checkout::submit))
        .route("/api/pricing/quote", get(routes::pricing::quote))
        // Orders
        .route("/api/orders", get(routes::orders::list))
        .route("/api/orders/{order_number}", get(routes::orders::get))
        .route(
            "/api/orders/{order_number}/returns",
            post(routes::orders::create_return),
        )
        // Support
        .route("/api/support/faqs", get(routes::support::faqs))
        .route("/api/support/requests", post(routes::support::create_request))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides
/// [`DEFAULT_LOG_FILTER`].
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
