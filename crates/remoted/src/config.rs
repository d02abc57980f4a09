//! Daemon configuration file

use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use remote_core::{GatewayConfig, LinkConfig, StoreConfig};
use serde::{Deserialize, Serialize};

/// Top-level `remoted.toml`
///
/// Every section is optional; an empty file yields the demo setup (mock
/// controller, in-memory store with default presets).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub controller: LinkConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_config_is_demo_mode() {
        let config = DaemonConfig::parse("").unwrap();

        assert_eq!(config.server.port, 3100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(matches!(config.controller, LinkConfig::Mock(_)));
        assert!(matches!(config.store, StoreConfig::Memory));
        assert_eq!(config.gateway.reply_timeout_ms, 5000);
    }

    #[test]
    fn test_full_config() {
        let config = DaemonConfig::parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [controller]
            type = "tcp"
            address = "127.0.0.1:3101"

            [gateway]
            reply_timeout_ms = 750

            [store]
            type = "file"
            path = "/var/lib/player/config.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.socket_addr().unwrap().port(), 8080);
        match &config.controller {
            LinkConfig::Tcp(tcp) => {
                assert_eq!(tcp.address, "127.0.0.1:3101");
                assert_eq!(tcp.connect_timeout_ms, 3000);
            }
            other => panic!("unexpected controller config: {:?}", other),
        }
        assert_eq!(config.gateway.reply_timeout_ms, 750);
        match &config.store {
            StoreConfig::File { path } => {
                assert_eq!(path, &PathBuf::from("/var/lib/player/config.json"));
            }
            other => panic!("unexpected store config: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_controller_type_is_rejected() {
        let err = DaemonConfig::parse("[controller]\ntype = \"serial\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 4000").unwrap();

        let config = DaemonConfig::load(file.path()).unwrap();
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = DaemonConfig::load("/nonexistent/remoted.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/remoted.toml"));
    }
}
