//! Usechain Exporter Configuration Module
//!
//! This module provides the constants and configuration types shared by the
//! RPC client, the block collector and the exporter daemon.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Number of block intervals sampled per collection cycle
pub const WINDOW_SIZE: u64 = 100;

/// Prefix shared by every exported metric name
pub const METRIC_NAMESPACE: &str = "usechain";

/// Default node endpoint
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
/// JSON-RPC method namespace exposed by Usechain nodes (`use_blockNumber`, ...)
pub const DEFAULT_RPC_NAMESPACE: &str = "use";
/// Default HTTP timeout applied by the RPC client
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Default exporter listen address
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 9100);
/// Default scrape path
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Name under which the block collector is registered
pub const BLOCK_COLLECTOR_NAME: &str = "block";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`ExporterConfig`]
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Metric type attached to the nine block statistics.
///
/// `legacy` reproduces the exposition of the original exporter, where every
/// statistic carries `# TYPE ... counter`. Switching an existing deployment
/// from `legacy` to `gauge` changes the type line of all nine metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MetricKindPolicy {
    /// Every statistic is an instantaneous gauge
    #[default]
    Gauge,
    /// Every statistic is tagged as a counter, as older dashboards expect
    #[serde(alias = "counter")]
    Legacy,
}

impl fmt::Display for MetricKindPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKindPolicy::Gauge => write!(f, "gauge"),
            MetricKindPolicy::Legacy => write!(f, "legacy"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// Compact single-line format
    Compact,
    /// JSON format for machine parsing
    Json,
}

/// Node RPC endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcSettings {
    pub url: String,
    pub namespace: String,
    pub timeout_secs: u64,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            namespace: DEFAULT_RPC_NAMESPACE.to_string(),
            timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
            user: None,
            password: None,
        }
    }
}

/// HTTP exposition configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen: SocketAddr,
    pub metrics_path: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN_ADDR,
            metrics_path: DEFAULT_METRICS_PATH.to_string(),
        }
    }
}

/// Block collector options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BlockCollectorSettings {
    pub kind_policy: MetricKindPolicy,
    /// Emit `usechain_fetchFailures` after the nine block statistics
    pub expose_fetch_failures: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    pub color: bool,
    pub include_target: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            color: true,
            include_target: true,
        }
    }
}

/// Exporter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExporterConfig {
    pub rpc: RpcSettings,
    pub server: ServerSettings,
    /// Per-collector enable/disable overrides keyed by registration name
    pub collectors: BTreeMap<String, bool>,
    pub block: BlockCollectorSettings,
    pub logging: LoggingSettings,
}

impl ExporterConfig {
    /// Parses a TOML document. Missing sections fall back to their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: ExporterConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration file at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded exporter configuration");
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> ConfigResult<()> {
        self.rpc_url()?;
        if self.rpc.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "rpc.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.rpc.namespace.is_empty() {
            return Err(ConfigError::Invalid("rpc.namespace must not be empty".to_string()));
        }
        if !self.server.metrics_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server.metrics_path must start with '/': {}",
                self.server.metrics_path
            )));
        }
        Ok(())
    }

    /// Parsed node endpoint.
    pub fn rpc_url(&self) -> ConfigResult<Url> {
        Url::parse(&self.rpc.url)
            .map_err(|e| ConfigError::Invalid(format!("rpc.url {}: {}", self.rpc.url, e)))
    }
}
