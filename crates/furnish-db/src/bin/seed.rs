//! # Seed Data Loader
//!
//! Fills a database with the demo furniture catalog and order history.
//!
//! ## Usage
//! ```bash
//! cargo run -p furnish-db --bin seed
//! cargo run -p furnish-db --bin seed -- --db ./data/furnish.db
//! ```

use std::env;

use furnish_core::PricingPolicy;
use furnish_db::seed::seed_demo;
use furnish_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./furnish_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Furnish Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./furnish_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Furnish Seed Data Loader");
    println!("===========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let start = std::time::Instant::now();
    let report = seed_demo(&db, &PricingPolicy::default()).await?;

    if report.products == 0 {
        println!("⚠ Database already has products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!(
        "✓ Inserted {} products and {} orders in {:?}",
        report.products,
        report.orders,
        start.elapsed()
    );

    let categories = db.products().category_counts().await?;
    for facet in categories {
        println!("  {:<12} {}", facet.name, facet.count);
    }

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
