//! # Catalog Endpoints
//!
//! Product listing with filters, the home-page shelf, product detail and
//! category counts.
//!
//! ## Listing Flow
//! ```text
//! GET /api/products?category=Bedroom&sortBy=price-low&generation=7
//!        │
//!        ▼
//! CatalogParams ──► CatalogQuery::from_params ──► ProductRepository::find
//!                                                       │
//!                        categories() ◄─── try_join ───►│◄─── materials()
//!                                                       ▼
//!                              { products, categories, materials,
//!                                query, count, generation: 7 }
//! ```
//!
//! The `generation` tag is echoed untouched so a client holding a
//! [`ResponseGate`](furnish_core::catalog::ResponseGate) can drop replies
//! that arrive after a newer one.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use furnish_core::catalog::{CatalogParams, CatalogQuery, FacetCount, Generation};
use furnish_core::{Product, FEATURED_LIMIT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Request tag read alongside the filter parameters.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationTag {
    pub generation: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub count: usize,
    /// Filter options, always over the whole catalog.
    pub categories: Vec<String>,
    pub materials: Vec<String>,
    /// The normalized query that produced `products`.
    pub query: CatalogQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<Generation>,
}

/// GET /api/products
#[tracing::instrument(skip(state, params, tag))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogParams>,
    Query(tag): Query<GenerationTag>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let query = CatalogQuery::from_params(&params);
    let started = Instant::now();

    let products_repo = state.db.products();
    let (products, categories, materials) = tokio::try_join!(
        products_repo.find(&query),
        products_repo.categories(),
        products_repo.materials(),
    )?;

    info!(
        count = products.len(),
        sort = query.sort.as_str(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Catalog query served"
    );

    Ok(Json(ProductListResponse {
        count: products.len(),
        products,
        categories,
        materials,
        query,
        generation: tag.generation.map(Generation),
    }))
}

/// GET /api/products/featured: the newest products.
#[tracing::instrument(skip(state))]
pub async fn featured(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.db.products().newest(FEATURED_LIMIT).await?;
    debug!(count = products.len(), "Featured products");
    Ok(Json(products))
}

/// GET /api/products/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state.db.products().require(&id).await?;
    Ok(Json(product))
}

/// GET /api/categories: product count per category, largest first.
#[tracing::instrument(skip(state))]
pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FacetCount>>, ApiError> {
    let counts = state.db.products().category_counts().await?;
    Ok(Json(counts))
}
