//! remoted - Player Remote Daemon
//!
//! HTTP gateway in front of the player controller.
//!
//! Usage:
//!   remoted [--config remoted.toml] [--port N] [--json]
//!
//! If no config file is provided, runs against a mock controller for demo
//! purposes.

use clap::Parser;
use remoted::{build_app, DaemonConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "remoted")]
#[command(about = "HTTP gateway in front of the player controller")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the listen port from the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "remoted=info,remote_api=info,remote_core=debug".into());
    if args.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting remoted (Player Remote Daemon)");

    let mut config = match args.config {
        Some(ref path) => {
            tracing::info!("Loading config from: {}", path);
            DaemonConfig::load(path)?
        }
        None => {
            tracing::info!("No config file provided, using mock controller");
            DaemonConfig::default()
        }
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let app = build_app(&config).await?;
    let link = app.link.clone();

    let addr = config.server.socket_addr()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal(link.clone()))
        .await?;

    if !link.is_connected() {
        anyhow::bail!("Controller link lost");
    }

    tracing::info!("Shut down");
    Ok(())
}

/// Resolves on Ctrl-C or when the controller link closes
async fn shutdown_signal(link: std::sync::Arc<dyn remote_core::ControllerLink>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
            tracing::info!("Received Ctrl-C, shutting down");
        }
        _ = link.closed() => {
            tracing::error!("Controller link closed, shutting down");
        }
    }
}
