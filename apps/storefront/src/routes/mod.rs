//! # Route Handlers
//!
//! One module per storefront page family. Handlers stay thin: pull state,
//! call into `furnish-core` for rules and `furnish-db` for storage, map
//! errors to [`ApiError`](crate::error::ApiError).
//!
//! ## Handler Categories
//! - [`catalog`] - product listing, featured shelf, detail, category counts
//! - [`cart`] - cart sessions and line edits
//! - [`pricing`] - ad-hoc price quotes
//! - [`checkout`] - turn a cart into an order
//! - [`orders`] - order history, tracking, returns
//! - [`support`] - FAQs and help requests
//! - [`config`] - public store settings
//! - [`health`] - liveness

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod health;
pub mod orders;
pub mod pricing;
pub mod support;
