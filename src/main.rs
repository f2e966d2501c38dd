//! KayaCloud - robot self-geometry point cloud daemon
//!
//! Reads resolved link poses from the state channel, transforms every
//! collision mesh vertex of the robot model into the world frame, and
//! publishes the resulting cloud frames over UDP.

use kaya_cloud::app::CloudApp;
use kaya_cloud::config::Config;
use kaya_cloud::error::Result;
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Parse config path from command line arguments.
///
/// Supports:
/// - `kaya-cloud <path>` (positional)
/// - `kaya-cloud --config <path>` (flag-based)
/// - `kaya-cloud -c <path>` (short flag)
///
/// Defaults to `/etc/kayacloud.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    // Default path
    "/etc/kayacloud.toml".to_string()
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("KayaCloud v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = parse_config_path();
    log::info!("Using config: {}", config_path);
    let config = Config::from_file(&config_path)?;

    // Set up shutdown signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);

    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| kaya_cloud::Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    // Wire up and run; a missing model description is fatal here.
    let mut app = CloudApp::new(config, running)?;

    log::info!("KayaCloud running. Press Ctrl-C to stop.");
    app.run()?;

    log::info!("KayaCloud stopped");
    Ok(())
}
