//! Basic logger usage example
//!
//! Opens two targets, logs at several levels, writes a JSON record and shuts
//! the registry down so every queued line reaches disk.
//!
//! Run with: cargo run --example basic_usage

use rust_rotating_logger::prelude::*;
use rust_rotating_logger::{debug, error, info, infof, warnf};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Rotating Logger - Basic Usage Example ===\n");

    let dir = std::env::temp_dir().join("rust_rotating_logger_demo");

    let mut registry = Registry::builder()
        .retention_days(3)
        .on_failure(Arc::new(|failure: &WriteFailure| {
            eprintln!("lost {} bytes for {}: {}", failure.bytes, failure.target.display(), failure.error);
        }))
        .build()?;

    // Daily files: <dir>/app.YYYYMMDD
    let app = registry.open_target(dir.join("app"), LogLevel::Info)?;
    info!(app, "server", "started", "on port", 8080)?;
    debug!(app, "hidden below INFO")?;
    warnf!(app, "retry {} of {}", 3, 5)?;
    error!(app, "upstream", "timeout", true)?;

    // Hourly files without the timestamp/caller prefix: <dir>/audit.YYYYMMDDHH
    let audit = registry.open_target(dir.join("audit"), LogLevel::All)?;
    audit.set_rotation(RotationMode::Hourly);
    audit.set_metadata(false);
    audit.write_json(&serde_json::json!({"user": "alice", "action": "login"}))?;
    infof!(audit, "{} records today", 1)?;

    if !registry.shutdown(Duration::from_secs(5)) {
        eprintln!("some lines did not reach disk in time");
    }

    let metrics = registry.metrics();
    println!("Written: {}", metrics.written());
    println!("Failed:  {}", metrics.failed_writes());
    for target in [&app, &audit] {
        if let Some(suffix) = target.current_suffix() {
            println!("{}.{}", target.path().display(), suffix);
        }
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
