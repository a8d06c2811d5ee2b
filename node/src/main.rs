//! Usechain Exporter
//!
//! Serves windowed block statistics of a Usechain node in the Prometheus
//! text format. Every scrape of the metrics path queries the node over
//! JSON-RPC and recomputes the statistics from scratch.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use usechain_config::ExporterConfig;
use usechain_monitoring::{BlockCollectorOptions, CollectorContext, CollectorRegistry};
use usechain_rpc_client::{RpcClient, RpcClientHooks, RpcRequestOutcome};

mod args;
mod logging;
mod server;

use args::Args;
use server::Exporter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ExporterConfig::load_or_default(args.config.as_deref())
        .context("failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    logging::init_logging(&config.logging)?;

    run(config).await
}

async fn run(config: ExporterConfig) -> Result<()> {
    let client = rpc_client(&config)?;
    info!(
        rpc_url = %client.url(),
        namespace = %config.rpc.namespace,
        kind_policy = %config.block.kind_policy,
        "starting usechain exporter"
    );

    let ctx = CollectorContext {
        source: Arc::new(client),
        block: BlockCollectorOptions::from(&config.block),
    };
    let collectors = CollectorRegistry::with_defaults()
        .build(&config.collectors, &ctx)
        .context("failed to build collectors")?;
    if collectors.is_empty() {
        warn!("no collectors enabled, scrapes will be empty");
    }

    let exporter = Arc::new(Exporter::new(collectors, &config.server.metrics_path)?);
    let metrics_path = exporter.metrics_path().to_string();
    let (addr, server) = server::bind(exporter, config.server.listen, shutdown_signal())
        .with_context(|| format!("failed to bind {}", config.server.listen))?;
    info!(address = %addr, path = %metrics_path, "serving metrics");

    server.await.context("metrics server failed")?;
    info!("usechain exporter stopped");
    Ok(())
}

fn rpc_client(config: &ExporterConfig) -> Result<RpcClient> {
    let hooks = RpcClientHooks::new().with_observer(|outcome: &RpcRequestOutcome| {
        debug!(
            method = %outcome.method,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            success = outcome.success,
            error_code = ?outcome.error_code,
            "rpc request"
        );
    });

    let client = RpcClient::builder(config.rpc_url()?)
        .namespace(config.rpc.namespace.clone())
        .timeout(Duration::from_secs(config.rpc.timeout_secs))
        .with_optional_auth(config.rpc.user.clone(), config.rpc.password.clone())
        .hooks(hooks)
        .build()?;
    Ok(client)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
