//! Collector error types

use thiserror::Error;
use usechain_rpc_client::RpcError;

/// Errors that abort a collection cycle
#[derive(Debug, Error)]
pub enum CollectError {
    /// The head height could not be fetched; nothing is emitted this cycle
    #[error("Failed to fetch head height: {0}")]
    HeadHeight(#[source] RpcError),

    /// A metric descriptor or sample was rejected by the prometheus model
    #[error("Invalid metric: {0}")]
    Metric(#[from] prometheus::Error),

    /// The host stopped receiving samples
    #[error("Metric sink closed")]
    SinkClosed,
}

/// Errors raised while registering or instantiating collectors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A collector with this name is already registered
    #[error("Collector already registered: {0}")]
    Duplicate(String),

    /// An enable/disable override names no registered collector
    #[error("Unknown collector: {0}")]
    Unknown(String),

    /// The collector factory failed
    #[error("Failed to build collector {name}: {source}")]
    Build {
        /// Registration name
        name: String,
        /// Underlying failure
        #[source]
        source: CollectError,
    },
}

/// Result type for collection operations
pub type CollectResult<T> = Result<T, CollectError>;
