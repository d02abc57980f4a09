//! remoted - wires the controller link, config store and REST API together
//!
//! The binary in `main.rs` only parses arguments and sets up logging; this
//! library part is what integration tests drive.

pub mod config;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use remote_api::{create_router, AppState};
use remote_core::{create_link, create_store, CommandGateway, ControllerLink, EventBridge};

pub use config::{DaemonConfig, ServerConfig};

/// A ready-to-serve application
pub struct App {
    pub router: Router,
    /// Kept so the daemon can stop when the controller goes away
    pub link: Arc<dyn ControllerLink>,
}

/// Connect to the controller and build the router for `config`
pub async fn build_app(config: &DaemonConfig) -> anyhow::Result<App> {
    let link = create_link(&config.controller)
        .await
        .context("Failed to connect to controller")?;
    tracing::info!(controller = ?config.controller, "Controller link established");

    let store = create_store(&config.store);
    let bridge = Arc::new(EventBridge::new(link.clone()));
    let gateway = CommandGateway::new(bridge, store, config.gateway.reply_timeout());
    tracing::info!(
        reply_timeout_ms = config.gateway.reply_timeout_ms,
        store = ?config.store,
        "Command gateway ready"
    );

    Ok(App {
        router: create_router(AppState::new(gateway)),
        link,
    })
}
