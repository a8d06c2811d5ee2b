//! # usechain-exporter
//!
//! Prometheus collector that samples the last [`WINDOW_SIZE`] blocks of a
//! Usechain node over JSON-RPC and exports throughput and latency statistics.
//!
//! The workspace is organized into:
//!
//! - [`config`] - constants and TOML configuration types
//! - [`rpc`] - JSON-RPC client for the node
//! - [`monitoring`] - the windowed block statistics collector and its registry
//!
//! The `usechain-exporter` daemon in `node/` wires these together behind an
//! HTTP `/metrics` endpoint.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub use usechain_config as config;
pub use usechain_monitoring as monitoring;
pub use usechain_rpc_client as rpc;

pub use usechain_config::WINDOW_SIZE;

/// Commonly used types.
pub mod prelude {
    pub use usechain_config::{ExporterConfig, WINDOW_SIZE};
    pub use usechain_monitoring::{
        AggregateStats, BlockCollector, BlockSource, CollectError, Collector, CollectorRegistry,
        MetricSample, MetricSink,
    };
    pub use usechain_rpc_client::{RpcClient, RpcError};
}
