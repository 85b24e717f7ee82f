//! # Sample Catalog Loader
//!
//! Loads the sample bakery into an in-memory engine and prints what it
//! looks like afterwards.
//!
//! ## Usage
//! ```bash
//! # Human-readable report
//! cargo run -p obrador-engine --bin seed
//!
//! # Costed products as JSON
//! cargo run -p obrador-engine --bin seed -- --json
//!
//! # Different calendar and currency
//! OBRADOR_UTC_OFFSET_MINUTES=-360 OBRADOR_CURRENCY_SYMBOL=MX$ cargo run -p obrador-engine --bin seed
//! ```

use std::env;

use chrono::{Datelike, Utc};
use obrador_engine::seed::load_sample_catalog;
use obrador_engine::{init_tracing, Bakery, EngineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut json = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" | "-j" => json = true,
            "--help" | "-h" => {
                println!("Obrador Sample Catalog Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -j, --json    Print costed products as JSON");
                println!("  -h, --help    Show this help message");
                return Ok(());
            }
            _ => {}
        }
    }

    init_tracing();

    let config = EngineConfig::from_env();
    let bakery = Bakery::new(config.clone());
    let catalog = load_sample_catalog(&bakery)?;

    if json {
        let costed = bakery.list_products_with_costing()?;
        println!("{}", serde_json::to_string_pretty(&costed)?);
        return Ok(());
    }

    println!("🥐 {} - Sample Catalog", config.business_name);
    println!("================================");
    println!("✓ {} materials", catalog.materials.len());
    println!("✓ {} products", catalog.products.len());
    println!("✓ {} sales", catalog.sales.len());
    println!();

    println!("Inventory (value {}):", config.format_currency(bakery.total_inventory_value()?));
    for material in bakery.list_materials()? {
        println!(
            "  {:<20} {:>8} {:<4} @ {}",
            material.name,
            material.quantity,
            material.unit.symbol(),
            config.format_currency(material.unit_cost)
        );
    }
    println!();

    let low = bakery.low_stock()?;
    if !low.is_empty() {
        println!("⚠ Low stock (≤ {}):", config.low_stock_threshold);
        for material in low {
            println!("  {} ({} {})", material.name, material.quantity, material.unit);
        }
        println!();
    }

    println!("Products:");
    for costed in bakery.list_products_with_costing()? {
        println!(
            "  {:<20} price {:>10}  cost {:>10}  margin {:>6}%",
            costed.product.name,
            config.format_currency(costed.product.reference_price),
            config.format_currency(costed.total_cost),
            costed.margin.round_dp(2)
        );
    }
    println!();

    let now = Utc::now().with_timezone(&config.utc_offset());
    let stats = bakery.statistics(now.month(), now.year())?;
    println!("This month:");
    println!("  Revenue:      {}", config.format_currency(stats.revenue));
    println!("  Cost:         {}", config.format_currency(stats.cost));
    println!("  Balance:      {}", config.format_currency(stats.balance));
    println!("  Transactions: {}", stats.transactions);
    if let Some(best) = stats.best_seller {
        println!("  Best seller:  {} ({} sold)", best.name, best.quantity);
    }

    Ok(())
}
