//! Basic logger usage example
//!
//! Demonstrates levels, fields, derived loggers and output formats.
//!
//! Run with: cargo run --example basic_usage

use bayaan::prelude::*;
use bayaan::{global, info, warn};

fn main() -> Result<()> {
    println!("=== bayaan - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .level(LogLevel::Info)
        .field("fake", "fake")
        .build()?;

    println!("1. Logging with fields:");
    logger.info("Hello, world!", [("key", "value")]);
    logger.warn("Hello, world!", [("key", "value")]);
    let err = logger.error("Hello, world!", [("key", "value")]);
    println!("   error() handed back: {}", err);

    println!("\n2. Below the minimum level (hidden):");
    logger.debug("Debug message (hidden)", Fields::new());

    println!("\n3. Derived logger with request fields, as JSON:");
    let request = logger.with([("request_id", "r-17"), ("user", "amina")]);
    request.set_format(OutputFormat::Json);
    info!(request, { "latency_ms" => 12 }, "served {} bytes", 2048);
    warn!(request, "slow upstream");

    // Entries are written by a background thread; close drains them
    logger.close()?;

    println!("\n4. Global logger from the environment:");
    global::setup(LoggerBuilder::from_env()?.format(OutputFormat::Logfmt))?;
    global::info("configured from APP_NAME, APP_ENV, LOG_FILE and LOG_LEVEL", Fields::new());
    global::close()?;

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
