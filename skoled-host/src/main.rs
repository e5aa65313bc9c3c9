//! skoled
//!
//! Shows Signal K values on a 128x64 SSD1306 OLED.
//!
//! # Usage
//! ```bash
//! # Built-in configuration, deltas from a Signal K server
//! websocat ws://localhost:3000/signalk/v1/stream | skoled
//!
//! # Custom configuration
//! skoled /etc/skoled.toml < deltas.ndjson
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn};
use tokio::io::BufReader;

use skoled_display::Ssd1306Opener;
use skoled_hal_linux::LinuxI2cProvider;
use skoled_host::{config, pump_deltas, Controller, SignalKStore};

/// Signal K values on an SSD1306 OLED
#[derive(Parser, Debug)]
#[command(name = "skoled")]
#[command(about = "Show Signal K values on an SSD1306 OLED", long_about = None)]
struct Args {
    /// TOML configuration file (built-in defaults when omitted)
    config: Option<PathBuf>,

    /// Device node prefix for I2C buses
    #[arg(long, default_value = "/dev/i2c-")]
    i2c_prefix: String,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let plugin_config = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_default()?,
    };

    if args.print_config {
        let text = toml::to_string_pretty(&plugin_config).context("Failed to render configuration")?;
        println!("{}", text);
        return Ok(());
    }

    info!("Starting skoled v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(SignalKStore::new());
    let opener = Ssd1306Opener::new(LinuxI2cProvider::with_prefix(&args.i2c_prefix));
    let mut controller = Controller::new(Arc::clone(&store), opener);

    controller
        .activate(plugin_config)
        .await
        .map_err(|e| anyhow!("Activation failed: {}", e))?;

    let reader_store = Arc::clone(&store);
    let mut reader = tokio::spawn(async move {
        pump_deltas(&reader_store, BufReader::new(tokio::io::stdin())).await
    });
    let reader_abort = reader.abort_handle();
    controller.hold_subscription(move || reader_abort.abort());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        },
        result = &mut reader => {
            match result {
                Ok(Ok(stored)) => info!("Delta stream ended after {} values, shutting down...", stored),
                Ok(Err(e)) => warn!("Delta stream failed: {}", e),
                Err(e) => warn!("Delta reader stopped: {}", e),
            }
        },
    }

    controller.deactivate().await;
    Ok(())
}
