//! File logging example
//!
//! Demonstrates a configuration-driven logger writing to a file, and a
//! per-request child logger that extends the shared context.
//!
//! Run with: cargo run --example file_logging

use astro_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Astro Logger - File Logging Example ===\n");

    let config = LoggerConfig::from_json(
        r#"{
            "level": "info",
            "output": { "file": "application.log" },
            "fields": { "app": "file_logging", "version": "0.1.0" }
        }"#,
    )?;
    let logger = config.build()?;

    println!("1. Logging to file:");
    logger.info().msg("Application started")?;
    logger.debug().msg("Loading configuration...")?;
    logger.info().msg("Configuration loaded successfully")?;
    logger.warn().msg("Using default settings for some options")?;

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        let request = logger.child([options::extend(move |e| {
            e.int("item", i);
        })]);
        request.info().msg("Processing item")?;
        if i == 3 {
            request.warn().uint("elapsed_ms", 1250).msg("Item took longer than expected")?;
        }
    }

    logger.info().msg("All operations completed")?;
    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");

    Ok(())
}
