//! # Catalog Query Builder
//!
//! Turns the product listing's URL parameters into filter and sort criteria.
//!
//! ## Parameter Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ?category=Bedroom&material=Wood&search=bed&minPrice=1000&sortBy=name  │
//! │        │              │              │           │            │        │
//! │        ▼              ▼              ▼           ▼            ▼        │
//! │  category = ?   material = ?   name/description/   price ≥ ?   ORDER BY │
//! │  (equality)     (equality)     brand LIKE %bed%    (inclusive) name ASC │
//! │                                (case-insensitive)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Empty parameters mean "no constraint". Unknown sort keys fall back to
//! newest-first. Unparseable price bounds are ignored. The SQL rendering of
//! a [`CatalogQuery`] lives in `furnish-db`; [`CatalogQuery::matches`] is the
//! same predicate evaluated in memory.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

use crate::money::Money;
use crate::types::Product;
use crate::validation::normalize_search_query;

// =============================================================================
// Raw Parameters
// =============================================================================

/// Query-string parameters exactly as they arrive.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogParams {
    pub category: Option<String>,
    pub material: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
}

// =============================================================================
// Sort Key
// =============================================================================

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SortKey {
    /// created_at descending.
    #[default]
    Newest,
    /// price ascending.
    PriceLow,
    /// price descending.
    PriceHigh,
    /// name ascending.
    Name,
    /// rating descending.
    Rating,
}

impl SortKey {
    /// Parses a `sortBy` value; anything unrecognized is [`SortKey::Newest`].
    pub fn parse(raw: Option<&str>) -> SortKey {
        match raw.map(str::trim) {
            Some("price-low") => SortKey::PriceLow,
            Some("price-high") => SortKey::PriceHigh,
            Some("name") => SortKey::Name,
            Some("rating") => SortKey::Rating,
            _ => SortKey::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Name => "name",
            SortKey::Rating => "rating",
        }
    }

    /// Orders two products by this key.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::PriceLow => a.price_minor.cmp(&b.price_minor),
            SortKey::PriceHigh => b.price_minor.cmp(&a.price_minor),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// Inclusive price bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct PriceRange {
    pub min: Option<Money>,
    pub max: Option<Money>,
}

impl PriceRange {
    pub fn contains(&self, price: Money) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }

    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Normalized filter and sort criteria.
#[derive(Debug, Clone, PartialEq, Default, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub material: Option<String>,
    /// Trimmed, at most 100 characters.
    pub search: Option<String>,
    pub price: PriceRange,
    pub sort: SortKey,
}

impl CatalogQuery {
    /// Builds criteria from raw parameters.
    ///
    /// ```rust
    /// use furnish_core::catalog::{CatalogParams, CatalogQuery, SortKey};
    ///
    /// let params = CatalogParams {
    ///     category: Some("Bedroom".into()),
    ///     search: Some("   ".into()),
    ///     min_price: Some("abc".into()),
    ///     sort_by: Some("price-low".into()),
    ///     ..Default::default()
    /// };
    /// let query = CatalogQuery::from_params(&params);
    /// assert_eq!(query.category.as_deref(), Some("Bedroom"));
    /// assert_eq!(query.search, None);
    /// assert_eq!(query.price.min, None);
    /// assert_eq!(query.sort, SortKey::PriceLow);
    /// ```
    pub fn from_params(params: &CatalogParams) -> Self {
        CatalogQuery {
            category: non_blank(params.category.as_deref()),
            material: non_blank(params.material.as_deref()),
            search: params.search.as_deref().and_then(normalize_search_query),
            price: PriceRange {
                min: params.min_price.as_deref().and_then(Money::parse_major),
                max: params.max_price.as_deref().and_then(Money::parse_major),
            },
            sort: SortKey::parse(params.sort_by.as_deref()),
        }
    }

    /// True when nothing narrows the result set.
    pub fn is_unfiltered(&self) -> bool {
        self.category.is_none()
            && self.material.is_none()
            && self.search.is_none()
            && self.price.is_open()
    }

    /// Evaluates the filter against one product.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if &product.category != category {
                return false;
            }
        }

        if let Some(material) = &self.material {
            if &product.material != material {
                return false;
            }
        }

        if let Some(term) = &self.search {
            let term = fold_for_search(term);
            let hit = fold_for_search(&product.name).contains(&term)
                || fold_for_search(&product.description).contains(&term)
                || product
                    .brand
                    .as_deref()
                    .is_some_and(|brand| fold_for_search(brand).contains(&term));
            if !hit {
                return false;
            }
        }

        self.price.contains(product.price())
    }

    /// Filters and sorts a product list in memory.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut matched: Vec<Product> = products.iter().filter(|p| self.matches(p)).cloned().collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        matched
    }
}

/// Case fold used for search on both sides of the comparison.
///
/// Full Unicode lowercasing, so `Émile` and `ÉMILE` both fold to `émile`.
/// Storage keeps pre-folded copies of the searchable fields.
pub fn fold_for_search(value: &str) -> String {
    value.to_lowercase()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Facets
// =============================================================================

/// One row of the category page: a category and how many products it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FacetCount {
    pub name: String,
    pub count: i64,
}

// =============================================================================
// Stale Response Guard
// =============================================================================

/// Sequence number attached to a catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Generation(pub u64);

/// Discards catalog responses that arrive out of order.
///
/// ## How It Works
/// ```text
/// issue() → g1 ──► request 1 ───────────────────────┐ (slow)
/// issue() → g2 ──► request 2 ──────┐                │
///                                  ▼                ▼
///                          accept(g2) = true   accept(g1) = false
///                          (render)            (newer already shown)
/// ```
///
/// A response is accepted only when no newer generation has been accepted
/// before it.
#[derive(Debug, Clone, Default)]
pub struct ResponseGate {
    issued: u64,
    accepted: Option<Generation>,
}

impl ResponseGate {
    pub fn new() -> Self {
        ResponseGate::default()
    }

    /// Tags a new request.
    pub fn issue(&mut self) -> Generation {
        self.issued += 1;
        Generation(self.issued)
    }

    /// Records a response; returns `false` when it's stale and should be dropped.
    pub fn accept(&mut self, generation: Generation) -> bool {
        match self.accepted {
            Some(latest) if latest >= generation => false,
            _ => {
                self.accepted = Some(generation);
                true
            }
        }
    }

    /// True when `generation` is the most recently issued request.
    pub fn is_latest(&self, generation: Generation) -> bool {
        generation.0 == self.issued
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn product(name: &str, category: &str, material: &str, price_major: i64, age_days: i64) -> Product {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() - Duration::days(age_days);
        Product {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            description: format!("A {} piece", material.to_lowercase()),
            price_minor: price_major * 100,
            category: category.to_string(),
            material: material.to_string(),
            dimensions: None,
            color: None,
            brand: Some("WoodCraft".to_string()),
            rating: price_major as f64 / 20_000.0,
            review_count: 0,
            featured: false,
            image_url: None,
            in_stock: true,
            created_at: created,
            updated_at: created,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("Modern Sofa", "Living Room", "Fabric", 45_000, 3),
            product("Queen Bed Frame", "Bedroom", "Wood", 35_000, 1),
            product("Office Chair", "Office", "Leather", 15_000, 5),
            product("Bookshelf", "Storage", "Wood", 12_500, 2),
        ]
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse(Some("price-low")), SortKey::PriceLow);
        assert_eq!(SortKey::parse(Some("price-high")), SortKey::PriceHigh);
        assert_eq!(SortKey::parse(Some("name")), SortKey::Name);
        assert_eq!(SortKey::parse(Some("rating")), SortKey::Rating);
        assert_eq!(SortKey::parse(Some("newest")), SortKey::Newest);
        assert_eq!(SortKey::parse(Some("popularity")), SortKey::Newest);
        assert_eq!(SortKey::parse(None), SortKey::Newest);
    }

    #[test]
    fn test_blank_params_are_absent() {
        let params = CatalogParams {
            category: Some("".into()),
            material: Some("  ".into()),
            search: Some("\t".into()),
            min_price: Some("".into()),
            max_price: Some("lots".into()),
            sort_by: None,
        };
        let query = CatalogQuery::from_params(&params);
        assert!(query.is_unfiltered());
        assert_eq!(query.sort, SortKey::Newest);
    }

    #[test]
    fn test_default_order_is_newest_first() {
        let result = CatalogQuery::default().apply(&catalog());
        assert_eq!(
            names(&result),
            vec!["Queen Bed Frame", "Bookshelf", "Modern Sofa", "Office Chair"]
        );
    }

    #[test]
    fn test_material_filter_with_price_sort() {
        let query = CatalogQuery::from_params(&CatalogParams {
            material: Some("Wood".into()),
            sort_by: Some("price-low".into()),
            ..Default::default()
        });
        assert_eq!(names(&query.apply(&catalog())), vec!["Bookshelf", "Queen Bed Frame"]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let by_name = CatalogQuery {
            search: Some("SOFA".into()),
            ..Default::default()
        };
        assert_eq!(names(&by_name.apply(&catalog())), vec!["Modern Sofa"]);

        let by_description = CatalogQuery {
            search: Some("leather piece".into()),
            ..Default::default()
        };
        assert_eq!(names(&by_description.apply(&catalog())), vec!["Office Chair"]);

        let by_brand = CatalogQuery {
            search: Some("woodcraft".into()),
            ..Default::default()
        };
        assert_eq!(by_brand.apply(&catalog()).len(), 4);
    }

    #[test]
    fn test_search_folds_non_ascii_letters() {
        let mut armchair = product("Émile Armchair", "Living Room", "Velvet", 22_000, 0);
        armchair.brand = Some("Öland".to_string());
        let products = vec![armchair];

        for term in ["Émile", "ÉMILE", "émile", "öland"] {
            let query = CatalogQuery {
                search: Some(term.into()),
                ..Default::default()
            };
            assert_eq!(query.apply(&products).len(), 1, "term {}", term);
        }
        assert_eq!(fold_for_search("ÉMILE Armchair"), "émile armchair");
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let query = CatalogQuery::from_params(&CatalogParams {
            min_price: Some("12500".into()),
            max_price: Some("35000.00".into()),
            sort_by: Some("price-high".into()),
            ..Default::default()
        });
        assert_eq!(
            names(&query.apply(&catalog())),
            vec!["Queen Bed Frame", "Office Chair", "Bookshelf"]
        );
    }

    #[test]
    fn test_sort_by_name_and_rating() {
        let by_name = CatalogQuery {
            sort: SortKey::Name,
            ..Default::default()
        };
        assert_eq!(
            names(&by_name.apply(&catalog())),
            vec!["Bookshelf", "Modern Sofa", "Office Chair", "Queen Bed Frame"]
        );

        let by_rating = CatalogQuery {
            sort: SortKey::Rating,
            ..Default::default()
        };
        assert_eq!(names(&by_rating.apply(&catalog()))[0], "Modern Sofa");
    }

    #[test]
    fn test_response_gate_drops_stale_responses() {
        let mut gate = ResponseGate::new();
        let first = gate.issue();
        let second = gate.issue();

        assert!(gate.is_latest(second));
        assert!(!gate.is_latest(first));

        // second resolves first, then the slow first request lands
        assert!(gate.accept(second));
        assert!(!gate.accept(first));

        // in-order responses are all accepted
        let third = gate.issue();
        assert!(gate.accept(third));
    }

    #[test]
    fn test_response_gate_in_order() {
        let mut gate = ResponseGate::new();
        let a = gate.issue();
        let b = gate.issue();
        assert!(gate.accept(a));
        assert!(gate.accept(b));
        assert!(!gate.accept(b));
    }
}
