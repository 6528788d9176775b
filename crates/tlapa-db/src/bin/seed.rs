//! # Seed Data Generator
//!
//! Populates a development database with users, categories, suppliers and
//! hardware-store products.
//!
//! ## Usage
//! ```bash
//! # Uses DATABASE_URL (from the environment or .env), 500 products
//! cargo run -p tlapa-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p tlapa-db --bin seed -- --count 2000
//!
//! # Explicit database
//! cargo run -p tlapa-db --bin seed -- --url postgres://localhost/tlapa_dev
//! ```
//!
//! Each product has:
//! - Unique code: `{CATEGORY}-{NNNNN}`
//! - Unique barcode (EAN-13 shape, checksum not valid)
//! - Sale price $5.00 - $504.99, purchase price 55-75% of it
//! - Stock 0 - 60, minimum 5, maximum 100

use std::env;

use tlapa_core::{Money, NewProduct};
use tlapa_db::migrations::migration_status;
use tlapa_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Category code, category name, product names.
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "HER",
        "Herramientas",
        &[
            "Martillo de uña",
            "Desarmador plano",
            "Desarmador de cruz",
            "Pinza de electricista",
            "Llave Stillson",
            "Llave perica",
            "Flexómetro",
            "Nivel de burbuja",
            "Serrucho",
            "Segueta",
        ],
    ),
    (
        "FIJ",
        "Fijación",
        &[
            "Clavo estándar",
            "Tornillo para madera",
            "Tornillo para tablaroca",
            "Taquete de plástico",
            "Pija autorroscante",
            "Tuerca hexagonal",
            "Rondana plana",
            "Ancla expansiva",
        ],
    ),
    (
        "ELE",
        "Eléctrico",
        &[
            "Cable THW",
            "Apagador sencillo",
            "Contacto doble",
            "Foco LED",
            "Cinta de aislar",
            "Centro de carga",
            "Pastilla termomagnética",
            "Clavija",
        ],
    ),
    (
        "PLO",
        "Plomería",
        &[
            "Tubo PVC",
            "Codo PVC",
            "Cople de cobre",
            "Llave de paso",
            "Cinta teflón",
            "Pegamento PVC",
            "Manguera",
            "Regadera",
        ],
    ),
    (
        "PIN",
        "Pintura",
        &[
            "Pintura vinílica",
            "Esmalte",
            "Thinner",
            "Brocha",
            "Rodillo",
            "Lija de agua",
            "Sellador",
            "Impermeabilizante",
        ],
    ),
];

/// Size variants for products
const SIZES: &[&str] = &["Chico", "Mediano", "Grande", "1/4\"", "1/2\"", "3/4\"", "1 L", "4 L", "19 L"];

const USERS: &[(&str, &str, &str)] = &[
    ("admin", "Administrador", "admin"),
    ("caja1", "Cajero Uno", "cashier"),
    ("caja2", "Cajero Dos", "cashier"),
];

const SUPPLIERS: &[&str] = &["Truper", "Urrea", "Pretul", "Comex", "Rotoplas"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 500;
    let mut url = env::var("DATABASE_URL").ok();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--url" | "-u" => {
                if i + 1 < args.len() {
                    url = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tlapa POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 500)");
                println!("  -u, --url <URL>    PostgreSQL URL (default: $DATABASE_URL)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let url = url.ok_or("DATABASE_URL is not set and --url was not given")?;

    info!(count, "Seeding database");

    let db = Database::new(DbConfig::new(url)).await?;
    if !db.health_check().await {
        return Err("database is not answering queries".into());
    }

    let (total, applied) = migration_status(db.pool()).await?;
    info!(total, applied, "Migration status");

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        db.close().await;
        return Ok(());
    }

    for (username, full_name, role) in USERS {
        sqlx::query(
            "INSERT INTO users (username, full_name, role) VALUES ($1, $2, $3) ON CONFLICT (username) DO NOTHING",
        )
        .bind(username)
        .bind(full_name)
        .bind(role)
        .execute(db.pool())
        .await?;
    }

    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for name in SUPPLIERS {
        let id: i64 = sqlx::query_scalar("INSERT INTO suppliers (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(db.pool())
            .await?;
        supplier_ids.push(id);
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    'outer: for (code, name, products) in CATEGORIES {
        let category_id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name) VALUES ($1) \
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name RETURNING id",
        )
        .bind(name)
        .fetch_one(db.pool())
        .await?;

        for (product_idx, product_name) in products.iter().enumerate() {
            for size in SIZES {
                if generated >= count {
                    break 'outer;
                }

                let seed = generated + product_idx;
                let product = generate_product(
                    code,
                    product_name,
                    size,
                    generated,
                    seed,
                    category_id,
                    supplier_ids[seed % supplier_ids.len()],
                );

                if let Err(e) = db.products().insert(&product).await {
                    warn!(code = %product.code, error = %e, "Failed to insert product");
                    continue;
                }

                generated += 1;

                if generated % 100 == 0 {
                    info!(generated, "Seeding products");
                }
            }
        }
    }

    let elapsed = start.elapsed();
    info!(
        generated,
        elapsed_ms = elapsed.as_millis() as u64,
        low_stock = db.products().list_low_stock().await?.len(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Generates a single product with deterministic data.
fn generate_product(
    category: &str,
    name: &str,
    size: &str,
    index: usize,
    seed: usize,
    category_id: i64,
    supplier_id: i64,
) -> NewProduct {
    let sale_cents = 500 + ((seed * 7919) % 50_000) as i64;
    let purchase_pct = 55 + (seed % 21) as i64;

    NewProduct {
        code: format!("{}-{:05}", category, index),
        barcode: Some(format!("750{:010}", index)),
        description: format!("{} {}", name, size),
        location: Some(format!("Pasillo {}", 1 + seed % 12)),
        stock: (seed % 61) as i64,
        min_stock: 5,
        max_stock: 100,
        purchase_price: Money::from_cents(sale_cents * purchase_pct / 100),
        sale_price: Money::from_cents(sale_cents),
        category_id: Some(category_id),
        supplier_id: Some(supplier_id),
        image: None,
    }
}
