//! Configuration types for controller links, stores and the gateway

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// =============================================================================
// Link Configuration
// =============================================================================

/// How the gateway reaches the controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LinkConfig {
    /// Newline-delimited JSON events over TCP
    Tcp(TcpLinkConfig),
    /// In-process controller for testing and demos
    Mock(MockConfig),
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::Mock(MockConfig::default())
    }
}

/// TCP link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcpLinkConfig {
    /// Controller address, e.g. "127.0.0.1:3101"
    pub address: String,
    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

impl TcpLinkConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

fn default_connect_timeout() -> u64 {
    3000
}

/// Mock link configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockConfig {
    /// Delay before auto-replies are emitted (milliseconds, 0 = immediately)
    #[serde(default)]
    pub reply_delay_ms: u64,
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Where controller-owned state is read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// The controller's JSON settings file, re-read on every lookup
    File { path: PathBuf },
    /// In-memory store seeded with default presets
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Memory
    }
}

// =============================================================================
// Gateway Configuration
// =============================================================================

/// Command gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Upper bound on every query-mode wait (milliseconds)
    #[serde(default = "default_reply_timeout")]
    pub reply_timeout_ms: u64,
}

impl GatewayConfig {
    pub fn reply_timeout(&self) -> Duration {
        Duration::from_millis(self.reply_timeout_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            reply_timeout_ms: default_reply_timeout(),
        }
    }
}

fn default_reply_timeout() -> u64 {
    5000
}
