//! # Product Repository
//!
//! Catalog reads and the seed-time insert.
//!
//! ## Catalog Filter as SQL
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogQuery                      SQL fragment                         │
//! │  ────────────                      ────────────                         │
//! │  category: Some("Bedroom")    ──►  AND category = ?                     │
//! │  material: Some("Wood")       ──►  AND material = ?                     │
//! │  search:   Some("sofa")       ──►  AND (name_search LIKE ? ESCAPE '\'   │
//! │                                         OR description_search LIKE ?    │
//! │                                         OR brand_search LIKE ?)         │
//! │  price.min / price.max        ──►  AND price_minor >= ? / <= ?          │
//! │  sort                         ──►  ORDER BY <key>, id                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every value is bound, never spliced. `%` and `_` typed by the user are
//! escaped so they match literally.
//!
//! The `*_search` columns hold [`fold_for_search`] copies written at insert
//! time. SQLite's own `LOWER()` only folds ASCII, so it is never used for
//! matching.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use furnish_core::catalog::{fold_for_search, CatalogQuery, FacetCount, SortKey};
use furnish_core::Product;

const PRODUCT_COLUMNS: &str = "id, name, description, price_minor, category, material, \
     dimensions, color, brand, rating, review_count, featured, image_url, in_stock, \
     created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Products matching the query, in the query's sort order.
    ///
    /// Same result set and order as [`CatalogQuery::apply`] over the whole
    /// table (ties are broken by id here).
    pub async fn find(&self, query: &CatalogQuery) -> DbResult<Vec<Product>> {
        debug!(
            category = ?query.category,
            material = ?query.material,
            search = ?query.search,
            sort = query.sort.as_str(),
            "Querying catalog"
        );

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM products WHERE 1 = 1", PRODUCT_COLUMNS));

        if let Some(category) = &query.category {
            builder.push(" AND category = ").push_bind(category.clone());
        }

        if let Some(material) = &query.material {
            builder.push(" AND material = ").push_bind(material.clone());
        }

        if let Some(term) = &query.search {
            let pattern = like_pattern(term);
            builder
                .push(" AND (name_search LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR description_search LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\' OR brand_search LIKE ")
                .push_bind(pattern)
                .push(" ESCAPE '\\')");
        }

        if let Some(min) = query.price.min {
            builder.push(" AND price_minor >= ").push_bind(min.minor());
        }

        if let Some(max) = query.price.max {
            builder.push(" AND price_minor <= ").push_bind(max.minor());
        }

        builder.push(" ORDER BY ").push(order_clause(query.sort));

        let products: Vec<Product> = builder.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Catalog query returned products");
        Ok(products)
    }

    /// Looks up one product.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Like [`ProductRepository::get_by_id`] but missing is an error.
    pub async fn require(&self, id: &str) -> DbResult<Product> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// The newest `limit` products, for the home page shelf.
    pub async fn newest(&self, limit: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products ORDER BY created_at DESC, id LIMIT ?1",
            PRODUCT_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Distinct categories, alphabetically.
    pub async fn categories(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT category FROM products ORDER BY category")
                .fetch_all(&self.pool)
                .await?;
        Ok(names)
    }

    /// Distinct materials, alphabetically.
    pub async fn materials(&self) -> DbResult<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT material FROM products ORDER BY material")
                .fetch_all(&self.pool)
                .await?;
        Ok(names)
    }

    /// Product count per category, largest first.
    pub async fn category_counts(&self) -> DbResult<Vec<FacetCount>> {
        let counts = sqlx::query_as::<_, FacetCount>(
            r#"
            SELECT category AS name, COUNT(*) AS count
            FROM products
            GROUP BY category
            ORDER BY count DESC, name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn insert(&self, product: &Product) -> DbResult<Product> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_minor, category, material,
                dimensions, color, brand, rating, review_count, featured,
                image_url, in_stock, created_at, updated_at,
                name_search, description_search, brand_search
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16,
                ?17, ?18, ?19
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_minor)
        .bind(&product.category)
        .bind(&product.material)
        .bind(&product.dimensions)
        .bind(&product.color)
        .bind(&product.brand)
        .bind(product.rating)
        .bind(product.review_count)
        .bind(product.featured)
        .bind(&product.image_url)
        .bind(product.in_stock)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(fold_for_search(&product.name))
        .bind(fold_for_search(&product.description))
        .bind(fold_for_search(product.brand.as_deref().unwrap_or("")))
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &product.id),
            other => other,
        })?;

        Ok(product.clone())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn order_clause(sort: SortKey) -> &'static str {
    match sort {
        SortKey::Newest => "created_at DESC, id",
        SortKey::PriceLow => "price_minor ASC, id",
        SortKey::PriceHigh => "price_minor DESC, id",
        SortKey::Name => "name ASC, id",
        SortKey::Rating => "rating DESC, id",
    }
}

/// `%term%` with LIKE metacharacters escaped, case-folded like the
/// `*_search` columns.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in fold_for_search(term).chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Unit Tests
// =============================================================================
