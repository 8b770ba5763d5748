//! castline viewer — entry point.
//!
//! ```text
//! castline-viewer                    Connect to 127.0.0.1 (AV :3200, Input :3201)
//! castline-viewer --host <addr>      Connect to a remote host
//! castline-viewer --config <path>    Load a custom config TOML
//! castline-viewer --gen-config       Write default config to stdout
//! castline-viewer --demo-input       Relay synthetic demo events
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use castline_viewer::config::ViewerConfig;
use castline_viewer::service::ViewerService;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "castline-viewer", about = "castline remote screen viewer")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "castline-viewer.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Override the host address.
    #[arg(long)]
    host: Option<String>,

    /// Override the AV channel port.
    #[arg(long)]
    av_port: Option<u16>,

    /// Override the Input channel port.
    #[arg(long)]
    input_port: Option<u16>,

    /// Relay synthetic demo input instead of polling a real device.
    #[arg(long)]
    demo_input: bool,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&ViewerConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let mut config = ViewerConfig::load(&cli.config);
    if let Some(host) = cli.host {
        config.network.host_addr = host;
    }
    if let Some(port) = cli.av_port {
        config.network.av_port = port;
    }
    if let Some(port) = cli.input_port {
        config.network.input_port = port;
    }
    if cli.demo_input {
        config.input.demo = true;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("castline-viewer v{}", env!("CARGO_PKG_VERSION"));
    info!("host: {}", config.network.host_addr);
    info!("av port: {}", config.network.av_port);
    info!("input port: {}", config.network.input_port);
    info!(
        "surface: {}x{}, demo input: {}",
        config.display.width, config.display.height, config.input.demo
    );

    let service = ViewerService::new(config);
    let cancel = service.cancel_handle();

    // Ctrl-C cancels both loops.
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received — shutting down");
        cancel.cancel();
    });

    service.run().await
}
