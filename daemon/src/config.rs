//! Daemon configuration with TOML file support.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use agora_governance::GovernanceParams;
use agora_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::error::DaemonError;

/// Configuration for the Agora daemon.
///
/// Can be loaded from a TOML file via [`DaemonConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the RPC server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// RPC port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// LMDB map size in megabytes.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Upper bound on a proposal description, in bytes.
    #[serde(default = "default_max_description_bytes")]
    pub max_description_bytes: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./agora_data")
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    7080
}

fn default_map_size_mb() -> usize {
    64
}

fn default_max_description_bytes() -> usize {
    agora_governance::params::DEFAULT_MAX_DESCRIPTION_BYTES
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, DaemonError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DaemonError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DaemonError> {
        toml::from_str(s).map_err(|e| DaemonError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DaemonError> {
        toml::to_string_pretty(self).map_err(|e| DaemonError::Config(e.to_string()))
    }

    /// The socket address the RPC server listens on.
    pub fn rpc_addr(&self) -> Result<SocketAddr, DaemonError> {
        let ip: IpAddr = self.bind_address.parse().map_err(|_| {
            DaemonError::Config(format!("invalid bind address: {}", self.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.rpc_port))
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn log_format(&self) -> Result<LogFormat, DaemonError> {
        self.log_format.parse().map_err(DaemonError::Config)
    }

    pub fn governance_params(&self) -> GovernanceParams {
        GovernanceParams {
            max_description_bytes: self.max_description_bytes,
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind_address: default_bind_address(),
            rpc_port: default_rpc_port(),
            map_size_mb: default_map_size_mb(),
            max_description_bytes: default_max_description_bytes(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaemonConfig::default();
        let toml_str = config.to_toml_string().expect("serializable");
        let parsed = DaemonConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc_port, 7080);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.data_dir, PathBuf::from("./agora_data"));
        assert_eq!(config.max_description_bytes, 4096);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            rpc_port = 9999
            log_format = "json"
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.rpc_port, 9999);
        assert_eq!(config.log_format().expect("valid"), LogFormat::Json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn missing_file_returns_config_error() {
        let err = DaemonConfig::from_toml_file(Path::new("/nonexistent/agora.toml")).unwrap_err();
        assert!(matches!(err, DaemonError::Config(_)));
    }

    #[test]
    fn file_on_disk_is_loaded() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("agora.toml");
        std::fs::write(&path, "map_size_mb = 8\n").expect("write");
        let config = DaemonConfig::from_toml_file(&path).expect("load");
        assert_eq!(config.map_size_bytes(), 8 * 1024 * 1024);
    }

    #[test]
    fn rpc_addr_rejects_garbage() {
        let config = DaemonConfig {
            bind_address: "not-an-ip".into(),
            ..Default::default()
        };
        assert!(matches!(config.rpc_addr(), Err(DaemonError::Config(_))));

        let config = DaemonConfig::default();
        assert_eq!(config.rpc_addr().expect("valid").port(), 7080);
    }

    #[test]
    fn unknown_log_format_is_config_error() {
        let config = DaemonConfig {
            log_format: "xml".into(),
            ..Default::default()
        };
        assert!(matches!(config.log_format(), Err(DaemonError::Config(_))));
    }
}
