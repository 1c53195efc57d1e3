//! # furnish-db: Database Layer for the Furnish storefront
//!
//! SQLite storage behind a small set of repositories.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (GET /api/products?category=Bedroom)                     │
//! │       │  CatalogQuery::from_params (furnish-core)                      │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    furnish-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ ProductRepo    │    │ 001_products │  │   │
//! │  │   │  SqlitePool   │    │ OrderRepo      │    │ 002_orders   │  │   │
//! │  │   │               │    │ SupportRepo    │    │ 003_requests │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL), or `:memory:` in tests                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use furnish_db::{Database, DbConfig};
//! use furnish_core::catalog::CatalogQuery;
//!
//! let db = Database::new(DbConfig::new("furnish.db")).await?;
//! let sofas = db.products().find(&CatalogQuery {
//!     search: Some("sofa".into()),
//!     ..Default::default()
//! }).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::support::SupportRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, TimeZone, Utc};
    use furnish_core::{Money, Product};

    use crate::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// A product created `minute` minutes after a fixed base time, so a
    /// higher index is newer.
    #[allow(clippy::too_many_arguments)]
    pub fn product(
        id: &str,
        name: &str,
        category: &str,
        material: &str,
        price_major: i64,
        rating: f64,
        minute: i64,
        featured: bool,
    ) -> Product {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap() + Duration::minutes(minute);
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("{} in {}", name, material.to_lowercase()),
            price_minor: Money::from_major(price_major).minor(),
            category: category.to_string(),
            material: material.to_string(),
            dimensions: None,
            color: None,
            brand: Some("TestBrand".to_string()),
            rating,
            review_count: 0,
            featured,
            image_url: None,
            in_stock: true,
            created_at: created,
            updated_at: created,
        }
    }
}
