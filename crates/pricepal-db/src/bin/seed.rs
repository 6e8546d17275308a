//! # Seed Data Generator
//!
//! Populates the database with demo shops and a demo account for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed ./pricepal_dev.db
//! cargo run -p pricepal-db --bin seed
//!
//! # Specify database path
//! cargo run -p pricepal-db --bin seed -- --db ./data/pricepal.db
//! ```
//!
//! ## Generated Data
//! - Three shops, each pricing the same catalogue differently
//! - `demo@pricepal.dev` / `pricepal` owning the first shop

use std::env;

use pricepal_core::{ItemRecord, UserProfile, SHOPS_COLLECTION, USERS_COLLECTION};
use pricepal_db::{Database, DbConfig, DbError, Document};

/// Catalogue: (barcode, name, base price in cents)
const CATALOGUE: &[(&str, &str, u32)] = &[
    ("012345678905", "Whole Milk 1L", 129),
    ("4006381333931", "Ballpoint Pen", 99),
    ("5449000000996", "Cola 330ml", 85),
    ("8711000530085", "Instant Coffee 100g", 499),
    ("96385074", "Chewing Gum", 65),
    ("7622210449283", "Chocolate Biscuits", 219),
    ("5000112548167", "Sparkling Water 1.5L", 110),
    ("SKU-BREAD-01", "Sourdough Loaf", 349),
    ("SKU-EGGS-12", "Free Range Eggs x12", 389),
    ("3017620422003", "Hazelnut Spread 400g", 459),
];

/// Shops with a price multiplier in percent.
const SHOPS: &[(&str, u32)] = &[
    ("Corner Store", 100),
    ("Station Kiosk", 125),
    ("Market Hall", 90),
];

const DEMO_EMAIL: &str = "demo@pricepal.dev";
const DEMO_PASSWORD: &str = "pricepal";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./pricepal_dev.db");

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
                println!("PricePal Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./pricepal_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 PricePal Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.documents().shop_names().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} shops", existing.len());
        println!("  Skipping seed to avoid overwriting prices.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating shops...");

    let documents = db.documents();
    for (shop, multiplier) in SHOPS {
        let mut fields = Document::new();
        for (barcode, name, cents) in CATALOGUE {
            let record = ItemRecord::new(*name, format_price(cents * multiplier / 100));
            fields.insert(barcode.to_string(), record.to_value());
        }
        documents
            .set_fields(SHOPS_COLLECTION, shop, &fields)
            .await?;
        println!("  ✓ {} ({} items)", shop, fields.len());
    }

    println!();
    println!("Creating demo account...");

    let account = match db.accounts().create(DEMO_EMAIL, DEMO_PASSWORD).await {
        Ok(account) => account,
        Err(DbError::EmailInUse(email)) => {
            println!("  ⚠ {} already registered, leaving it as is", email);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let profile = UserProfile {
        email: account.email.clone(),
        shop_name: SHOPS[0].0.to_string(),
    };
    let fields: Document = profile
        .to_fields()
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect();
    documents
        .set_fields(USERS_COLLECTION, &account.uid, &fields)
        .await?;

    println!("  ✓ {} / {}", DEMO_EMAIL, DEMO_PASSWORD);
    println!();
    println!("Done.");

    Ok(())
}

/// Formats cents as a price string the inventory form would accept.
fn format_price(cents: u32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}
