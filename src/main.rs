use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::Path;

use receipt_processor::{PointsScorer, Receipt, ScoringPolicy, VERSION};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("score") => {
            let Some(path) = args.get(2) else {
                bail!("Usage: receipt-processor score <receipt.json> [--strict]");
            };
            let policy = if args.iter().any(|a| a == "--strict") {
                ScoringPolicy::Strict
            } else {
                ScoringPolicy::Lenient
            };
            run_score(Path::new(path), policy)?;
        }
        Some("version") => println!("receipt-processor {}", VERSION),
        _ => print_usage(),
    }

    Ok(())
}

fn run_score(path: &Path, policy: ScoringPolicy) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read receipt file: {:?}", path))?;
    let receipt: Receipt = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse receipt JSON: {:?}", path))?;

    let breakdown = PointsScorer::new(policy)
        .breakdown(&receipt)
        .with_context(|| format!("Receipt rejected under {} scoring", policy))?;

    println!("🧾 {} ({} {})", receipt.retailer, receipt.purchase_date, receipt.purchase_time);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Retailer name:      {:>4}", breakdown.retailer);
    println!("  Item pairs:         {:>4}", breakdown.item_pairs);
    println!("  Item descriptions:  {:>4}", breakdown.item_descriptions);
    println!("  Total:              {:>4}", breakdown.total);
    println!("  Purchase date/time: {:>4}", breakdown.purchase_datetime);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Points:             {:>4}", breakdown.points());

    if breakdown.is_degraded() {
        println!("\n⚠️  Scored with degraded values:");
        for error in &breakdown.tolerated {
            println!("   - [{}] {}", error.rule(), error);
        }
    }

    Ok(())
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  receipt-processor score <receipt.json> [--strict]");
    eprintln!("  receipt-processor version");
    eprintln!("\nTo serve the HTTP API: cargo run --bin receipt-server");
}
