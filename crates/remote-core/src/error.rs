//! Error types for the bridge, the config store and the gateway

use std::time::Duration;

use thiserror::Error;

use crate::link::LinkError;

/// Result type for event bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors raised by the event bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The controller link is unavailable
    #[error(transparent)]
    Link(#[from] LinkError),

    /// No reply arrived within the bound; the command may still have been applied
    #[error("No reply on '{event}' within {timeout:?}")]
    Timeout { event: String, timeout: Duration },

    /// A waiter is already registered for this reply event
    #[error("A reply on '{0}' is already awaited")]
    AlreadyPending(String),

    /// The waiter was discarded before a reply arrived
    #[error("Reply channel for '{0}' closed")]
    Closed(String),
}

/// Errors raised while reading controller-owned state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse store: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed store entry: {0}")]
    Malformed(String),
}

/// Errors raised by the command gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Referenced preset is not part of the current snapshot
    #[error("name should be one of {}", allowed.join(","))]
    UnknownPreset { name: String, allowed: Vec<String> },

    /// The store holds no value for the requested domain
    ///
    /// Surfaced over HTTP as 404, not as an empty 200.
    #[error("No state stored for '{0}'")]
    DomainNotFound(String),
}

impl GatewayError {
    /// Whether the error was caused by the caller rather than the gateway or controller
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GatewayError::UnknownPreset { .. } | GatewayError::DomainNotFound(_)
        )
    }
}
