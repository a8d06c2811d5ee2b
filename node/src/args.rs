use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use usechain_config::ExporterConfig;

/// Command-line arguments for the exporter daemon
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "usechain-exporter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Prometheus exporter for Usechain block statistics"
)]
pub struct Args {
    /// Specifies the config file
    #[arg(short = 'c', long = "config", value_name = "FILE", env = "USECHAIN_EXPORTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint of the node
    #[arg(long = "rpc-url", value_name = "URL")]
    pub rpc_url: Option<String>,

    /// Address the metrics server listens on
    #[arg(long = "listen", value_name = "ADDR")]
    pub listen: Option<SocketAddr>,

    /// Log level or filter directive
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Enables a collector
    #[arg(long = "collector", value_name = "NAME")]
    pub enable: Vec<String>,

    /// Disables a collector
    #[arg(long = "no-collector", value_name = "NAME")]
    pub disable: Vec<String>,
}

impl Args {
    /// Applies the flags on top of `config`. Flags win over the file and
    /// `--no-collector` wins over `--collector`.
    pub fn apply(&self, config: &mut ExporterConfig) {
        if let Some(url) = &self.rpc_url {
            config.rpc.url = url.clone();
        }
        if let Some(listen) = self.listen {
            config.server.listen = listen;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        for name in &self.enable {
            config.collectors.insert(name.clone(), true);
        }
        for name in &self.disable {
            config.collectors.insert(name.clone(), false);
        }
    }
}
