//! # Repositories
//!
//! One repository per aggregate, each holding a clone of the pool.
//!
//! ```text
//! Database ──┬── products()  ──► ProductRepository   catalog reads, seed insert
//!            ├── orders()    ──► OrderRepository     orders, items, returns
//!            └── support()   ──► SupportRepository   help-desk requests
//! ```

pub mod order;
pub mod product;
pub mod support;
