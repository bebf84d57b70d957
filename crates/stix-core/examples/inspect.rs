//! Simple inspector for STIX JSON files.
//!
//! Reads a bundle or a JSON array, validates every object and prints it.
//!
//! ```text
//! RUST_LOG=debug cargo run --example inspect -- bundle.json
//! ```

use std::collections::BTreeMap;
use std::fs;

use stix_core::codec::{decode_collection_with_options, DecodeOptions};
use stix_core::render::render;
use stix_core::validate::validate;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bundle.json".to_string());
    let lenient = std::env::args().any(|a| a == "--lenient");

    println!("Reading: {}", path);
    let data = fs::read(&path).expect("Failed to read file");
    println!("File size: {} bytes", data.len());

    let options = DecodeOptions::new().lenient(lenient);
    let results = decode_collection_with_options(&data, &options).expect("Failed to decode");

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut rejected = 0;
    let mut invalid = 0;

    println!("\n=== Objects ({}) ===", results.len());
    for (i, result) in results.iter().enumerate() {
        let object = match result {
            Ok(object) => object,
            Err(e) => {
                println!("\n[{}] REJECTED: {}", i, e);
                rejected += 1;
                continue;
            }
        };
        *counts.entry(object.kind().to_string()).or_default() += 1;

        println!("\n[{}] {}", i, object.id());
        print!("{}", render(object, 1));
        if let Err(errors) = validate(object) {
            invalid += 1;
            println!("  INVALID:");
            for e in errors.errors() {
                println!("    {}", e);
            }
        }
    }

    println!("\n=== Summary ===");
    for (kind, count) in &counts {
        println!("{:>24}: {}", kind, count);
    }
    println!("Rejected: {}", rejected);
    println!("Invalid:  {}", invalid);
}
