//! castline host — entry point.
//!
//! ```text
//! castline-host                    Run with defaults (AV :3200, Input :3201)
//! castline-host --config <path>   Load a custom config TOML
//! castline-host --gen-config      Write default config to stdout
//! castline-host --av-port <p>     Override the AV channel port
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use castline_host::config::HostConfig;
use castline_host::service::HostService;

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "castline-host", about = "castline screen-streaming host")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "castline-host.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    /// Override the bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Override the AV channel port.
    #[arg(long)]
    av_port: Option<u16>,

    /// Override the Input channel port.
    #[arg(long)]
    input_port: Option<u16>,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.gen_config {
        let text = toml::to_string_pretty(&HostConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let mut config = HostConfig::load(&cli.config);
    if let Some(bind) = cli.bind {
        config.network.bind_addr = bind;
    }
    if let Some(port) = cli.av_port {
        config.network.av_port = port;
    }
    if let Some(port) = cli.input_port {
        config.network.input_port = port;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("castline-host v{}", env!("CARGO_PKG_VERSION"));
    info!("bind address: {}", config.network.bind_addr);
    info!("av port: {}", config.network.av_port);
    info!("input port: {}", config.network.input_port);
    info!(
        "video: {}x{} @ {} fps, zstd level {}",
        config.video.width, config.video.height, config.video.fps, config.video.compression_level
    );

    let service = HostService::new(config);
    let cancel = service.cancel_handle();

    // Ctrl-C cancels both loops.
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Ctrl-C received — shutting down");
        cancel.cancel();
    });

    service.run().await
}
