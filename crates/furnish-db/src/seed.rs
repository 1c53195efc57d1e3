//! # Demo Data
//!
//! The furniture catalog and three sample orders used in development and
//! by the storefront's integration tests.
//!
//! Products get slug ids (`modern-sofa`) so links stay stable across
//! reseeds. Creation times are one minute apart in list order, which makes
//! the last entry the newest.

use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use furnish_core::{
    Money, Order, OrderItem, OrderStatus, PaymentMethod, PricingPolicy, Product,
};

const IMAGE_SUFFIX: &str = "?w=500&h=400&fit=crop";

struct CatalogEntry {
    name: &'static str,
    description: &'static str,
    price_major: i64,
    category: &'static str,
    material: &'static str,
    dimensions: &'static str,
    color: &'static str,
    brand: &'static str,
    rating: f64,
    review_count: i64,
    featured: bool,
    photo: &'static str,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Modern Sofa",
        description: "Comfortable 3-seater sofa with premium fabric upholstery",
        price_major: 45_000,
        category: "Living Room",
        material: "Fabric",
        dimensions: "200x90x85 cm",
        color: "Grey",
        brand: "ComfortPlus",
        rating: 4.5,
        review_count: 128,
        featured: true,
        photo: "photo-1555041469-a586c61ea9bc",
    },
    CatalogEntry {
        name: "Dining Table Set",
        description: "Elegant wooden dining table with 6 chairs",
        price_major: 65_000,
        category: "Dining Room",
        material: "Wood",
        dimensions: "180x90x75 cm",
        color: "Brown",
        brand: "WoodCraft",
        rating: 4.3,
        review_count: 89,
        featured: true,
        photo: "photo-1449247709967-d4461a6a6103",
    },
    CatalogEntry {
        name: "Queen Bed Frame",
        description: "Solid wood queen size bed frame with headboard",
        price_major: 35_000,
        category: "Bedroom",
        material: "Wood",
        dimensions: "160x200x120 cm",
        color: "Natural",
        brand: "SleepWell",
        rating: 4.7,
        review_count: 156,
        featured: false,
        photo: "photo-1505693416388-ac5ce068fe85",
    },
    CatalogEntry {
        name: "Office Chair",
        description: "Ergonomic office chair with lumbar support",
        price_major: 15_000,
        category: "Office",
        material: "Leather",
        dimensions: "65x65x110 cm",
        color: "Black",
        brand: "ErgoMax",
        rating: 4.2,
        review_count: 203,
        featured: false,
        photo: "photo-1541558869434-2840d308329a",
    },
    CatalogEntry {
        name: "Coffee Table",
        description: "Glass top coffee table with metal legs",
        price_major: 20_000,
        category: "Living Room",
        material: "Glass",
        dimensions: "120x60x45 cm",
        color: "Clear",
        brand: "ModernHome",
        rating: 4.0,
        review_count: 67,
        featured: false,
        photo: "photo-1506439773649-6e0eb8cfb237",
    },
    CatalogEntry {
        name: "Bookshelf",
        description: "5-tier wooden bookshelf for storage and display",
        price_major: 12_500,
        category: "Storage",
        material: "Wood",
        dimensions: "80x30x180 cm",
        color: "White",
        brand: "StoragePro",
        rating: 4.4,
        review_count: 94,
        featured: false,
        photo: "photo-1507003211169-0a1dd7228f2d",
    },
    CatalogEntry {
        name: "Leather Recliner",
        description: "Premium leather recliner with massage function",
        price_major: 55_000,
        category: "Living Room",
        material: "Leather",
        dimensions: "90x95x105 cm",
        color: "Brown",
        brand: "LuxurySeats",
        rating: 4.8,
        review_count: 45,
        featured: true,
        photo: "photo-1586023492125-27b2c045efd7",
    },
    CatalogEntry {
        name: "Metal Wardrobe",
        description: "Spacious 3-door metal wardrobe with mirror",
        price_major: 28_000,
        category: "Bedroom",
        material: "Metal",
        dimensions: "150x60x200 cm",
        color: "Silver",
        brand: "MetalCraft",
        rating: 4.1,
        review_count: 72,
        featured: false,
        photo: "photo-1558618666-fcd25c85cd64",
    },
];

/// "Modern Sofa" → "modern-sofa"
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// The demo catalog, oldest first, created relative to `now`.
pub fn demo_products(now: DateTime<Utc>) -> Vec<Product> {
    let count = CATALOG.len() as i64;

    CATALOG
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let created = now - Duration::minutes(count - index as i64);
            Product {
                id: slug(entry.name),
                name: entry.name.to_string(),
                description: entry.description.to_string(),
                price_minor: Money::from_major(entry.price_major).minor(),
                category: entry.category.to_string(),
                material: entry.material.to_string(),
                dimensions: Some(entry.dimensions.to_string()),
                color: Some(entry.color.to_string()),
                brand: Some(entry.brand.to_string()),
                rating: entry.rating,
                review_count: entry.review_count,
                featured: entry.featured,
                image_url: Some(image_url(entry.photo)),
                in_stock: true,
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
}

fn image_url(photo: &str) -> String {
    format!("https://images.unsplash.com/{}{}", photo, IMAGE_SUFFIX)
}

struct DemoOrder {
    order_number: &'static str,
    status: OrderStatus,
    method: PaymentMethod,
    placed: (i32, u32, u32),
    tracking: Option<&'static str>,
    /// (catalog index, quantity)
    lines: &'static [(usize, i64)],
}

const DEMO_ORDERS: &[DemoOrder] = &[
    DemoOrder {
        order_number: "FS123456",
        status: OrderStatus::Delivered,
        method: PaymentMethod::Upi,
        placed: (2024, 1, 15),
        tracking: Some("TRK789012345"),
        lines: &[(0, 1)],
    },
    DemoOrder {
        order_number: "FS123457",
        status: OrderStatus::Shipped,
        method: PaymentMethod::Card,
        placed: (2024, 1, 20),
        tracking: Some("TRK789012346"),
        lines: &[(1, 1), (4, 1)],
    },
    DemoOrder {
        order_number: "FS123458",
        status: OrderStatus::Processing,
        method: PaymentMethod::Cod,
        placed: (2024, 1, 25),
        tracking: None,
        lines: &[(2, 1)],
    },
];

/// Sample order history for John Doe, priced with `policy`.
pub fn demo_orders(policy: &PricingPolicy) -> Vec<(Order, Vec<OrderItem>)> {
    DEMO_ORDERS
        .iter()
        .filter_map(|demo| {
            let (y, m, d) = demo.placed;
            let created_at = Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).single()?;
            let order_id = format!("order-{}", demo.order_number.to_lowercase());

            let items: Vec<OrderItem> = demo
                .lines
                .iter()
                .filter_map(|&(index, quantity)| {
                    let entry = CATALOG.get(index)?;
                    let unit = Money::from_major(entry.price_major);
                    Some(OrderItem {
                        id: format!("{}-{}", order_id, index),
                        order_id: order_id.clone(),
                        product_id: slug(entry.name),
                        name_snapshot: entry.name.to_string(),
                        image_url: Some(image_url(entry.photo)),
                        unit_price_minor: unit.minor(),
                        quantity,
                        line_total_minor: unit.multiply_quantity(quantity).minor(),
                    })
                })
                .collect();

            let subtotal: Money = items.iter().map(OrderItem::line_total).sum();
            let quote = policy.quote(subtotal);

            let order = Order {
                id: order_id,
                order_number: demo.order_number.to_string(),
                status: demo.status,
                payment_method: demo.method,
                payment_status: demo.method.initial_status(),
                customer_name: "John Doe".to_string(),
                customer_email: "john@example.com".to_string(),
                customer_phone: "+91 9876543210".to_string(),
                shipping_address: "123 Main Street, Bangalore, Karnataka 560001".to_string(),
                subtotal_minor: quote.subtotal.minor(),
                shipping_minor: quote.shipping.minor(),
                tax_minor: quote.tax.minor(),
                total_minor: quote.total.minor(),
                tracking_number: demo.tracking.map(str::to_string),
                created_at,
                estimated_delivery: Some(created_at + Duration::days(furnish_core::DELIVERY_DAYS)),
            };

            Some((order, items))
        })
        .collect()
}

/// What [`seed_demo`] inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub products: usize,
    pub orders: usize,
}

/// Inserts the demo catalog and orders unless products already exist.
pub async fn seed_demo(db: &Database, policy: &PricingPolicy) -> DbResult<SeedReport> {
    let existing = db.products().count().await?;
    if existing > 0 {
        info!(existing, "Catalog already populated, skipping seed");
        return Ok(SeedReport::default());
    }

    let mut report = SeedReport::default();

    for product in demo_products(Utc::now()) {
        db.products().insert(&product).await?;
        report.products += 1;
    }

    for (order, items) in demo_orders(policy) {
        db.orders().insert(&order, &items).await?;
        report.orders += 1;
    }

    info!(products = report.products, orders = report.orders, "Seeded demo data");
    Ok(report)
}
