//! Application state for the REST API

use std::sync::Arc;

use remote_core::CommandGateway;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<CommandGateway>,
}

impl AppState {
    pub fn new(gateway: CommandGateway) -> Self {
        Self::from_arc(Arc::new(gateway))
    }

    /// Create AppState around a gateway shared with other owners
    pub fn from_arc(gateway: Arc<CommandGateway>) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &CommandGateway {
        &self.gateway
    }
}
