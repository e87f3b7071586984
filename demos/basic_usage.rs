//! Basic logger usage example
//!
//! Demonstrates option-based construction, context fields, hooks and
//! different log levels.
//!
//! Run with: cargo run --example basic_usage

use astro_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Astro Logger - Basic Usage Example ===\n");

    // Errors and worse go to stderr, everything else to stdout
    let logger = Logger::new([
        options::writer(ConsoleWriter::split()),
        options::level(LogLevel::Debug),
        options::with(|e| {
            e.str("service", "demo").int("pid", i64::from(std::process::id()));
        }),
        options::add_hook(LevelHook::new().error(HookFunc::new(|e, _level, _msg| {
            e.bool("page_oncall", true);
        }))),
    ]);

    println!("1. Logging at different levels:");
    logger.debug().msg("This is a debug message")?;
    logger.info().str("user", "alice").msg("This is an info message")?;
    logger.warn().float("load", 0.93).msg("This is a warning message")?;
    logger.error().msg("This is an error message")?;
    logger.log().msg("This record has no level")?;

    println!("\n2. Child logger with a higher minimum level:");
    let quiet = logger.child([options::level(LogLevel::Warn)]);
    quiet.debug().msg("Debug message (hidden)")?;
    quiet.info().msg("Info message (hidden)")?;
    quiet.warn().msg("Warning message (visible)")?;

    println!("\n3. Errors and timestamps:");
    let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    logger.err(&err).timestamp().msg("Request failed")?;

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
