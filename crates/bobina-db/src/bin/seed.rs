//! # Reference Data Seeder
//!
//! Creates the database, applies migrations and inserts default reference
//! data.
//!
//! ## Usage
//! ```bash
//! # Canonical tax names, national ICMS table, empty configuration row
//! cargo run -p bobina-db --bin seed
//!
//! # Also insert demo materials, tax rates and services
//! cargo run -p bobina-db --bin seed -- --demo
//!
//! # Specify database path
//! cargo run -p bobina-db --bin seed -- --db ./data/bobina.db
//! ```
//!
//! Safe to run repeatedly: defaults use `INSERT OR IGNORE` and demo data is
//! skipped when materials already exist.

use std::env;

use bobina_core::{Configuration, Money, Percent};
use bobina_db::{Database, DbConfig};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

/// Demo fabric grades: (name, cost per cm, roll height, inter-state ICMS).
const DEMO_MATERIALS: &[(&str, i64, Option<i64>, Option<i64>)] = &[
    ("TNT 30g", 95, Some(95), Some(12)),
    ("TNT 40g", 137, Some(95), Some(12)),
    ("TNT 60g", 198, Some(140), Some(12)),
    ("TNT 80g", 265, Some(140), Some(7)),
    ("TNT 100g", 330, None, None),
];

/// Demo fixed tax rates in hundredths of a percent.
const DEMO_TAX_RATES: &[(&str, i64)] = &[("PIS", 165), ("COFINS", 760), ("CSLL", 108), ("IRPJ", 120)];

/// Demo services: (name, unit price in cents, tax %).
const DEMO_SERVICES: &[(&str, i64, i64)] = &[("Silk 1 cor", 20, 5), ("Silk 2 cores", 35, 5)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/bobina.db".to_string());
    let mut demo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--demo" => demo = true,
            "--help" | "-h" => {
                println!("Bobina Reference Data Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./data/bobina.db)");
                println!("      --demo         Insert demo materials, taxes and services");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    println!("Bobina Reference Data Seeder");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let inserted = db.ensure_defaults().await?;
    println!("✓ Defaults ensured ({} new rows)", inserted);

    if demo {
        seed_demo(&db).await?;
    }

    let materials = db.materials().list().await?;
    let taxes = db.fixed_taxes().applicable().await?;
    let states = db.state_taxes().list().await?;

    println!();
    println!("Summary:");
    println!("  Materials:   {}", materials.len());
    println!("  Fixed taxes: {}", taxes.len());
    println!("  ICMS states: {}", states.len());

    db.close().await;
    Ok(())
}

async fn seed_demo(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    if !db.materials().list().await?.is_empty() {
        println!("⚠ Materials already present, skipping demo data");
        return Ok(());
    }

    for (name, cost_ten_thousandths, roll_height, state_rate) in DEMO_MATERIALS {
        db.materials()
            .insert(
                name,
                Money::new(Decimal::new(*cost_ten_thousandths, 4)),
                roll_height.map(Decimal::from),
                state_rate.map(|r| Percent::new(Decimal::from(r))),
            )
            .await?;
    }

    for (name, hundredths) in DEMO_TAX_RATES {
        db.fixed_taxes()
            .upsert(name, Percent::new(Decimal::new(*hundredths, 2)))
            .await?;
    }

    for (name, cents, tax) in DEMO_SERVICES {
        db.services()
            .insert(name, Money::new(Decimal::new(*cents, 2)), Percent::new(Decimal::from(*tax)))
            .await?;
    }

    db.configuration()
        .save(&Configuration {
            margin: Percent::new(Decimal::from(20)),
            other_costs: Percent::new(Decimal::from(2)),
            calibration_loss_units: 50,
            service_unit_price: Money::new(Decimal::new(15, 2)),
            handle_size_cm: Decimal::from(6),
        })
        .await?;

    println!("✓ Demo data inserted");
    Ok(())
}
