//! Usechain Monitoring
//!
//! Windowed block statistics for a Usechain node. Each collection cycle
//! reads the chain head, fetches the last [`WINDOW_SIZE`] blocks one call at
//! a time, folds them into throughput, delay and size statistics and emits
//! nine samples:
//!
//! | metric | value |
//! |---|---|
//! | `usechain_height` | chain head height |
//! | `usechain_totalTx` | transactions in the window |
//! | `usechain_totalTime` | seconds spanned by the window |
//! | `usechain_tps` | `totalTx / totalTime` |
//! | `usechain_avgDelay` | `totalTime / slot` |
//! | `usechain_maxDelay` | largest gap between consecutive blocks |
//! | `usechain_avgSize` | mean block size |
//! | `usechain_maxSize` | largest block size |
//! | `usechain_avgTxperBlock` | `totalTx / slot` |
//!
//! Ratios use truncating integer division and read `0` when their
//! denominator is zero.

pub mod aggregate;
pub mod collector;
pub mod descriptor;
pub mod emit;
mod error;
pub mod registry;
pub mod scrape;
pub mod source;
pub mod window;

pub use aggregate::{aggregate, AggregateStats};
pub use collector::{BlockCollector, BlockCollectorOptions, Collector};
pub use descriptor::{BlockDescriptors, MetricDescriptor};
pub use emit::{into_families, MetricKind, MetricSample, MetricSink};
pub use error::{CollectError, CollectResult, RegistryError};
pub use registry::{CollectorContext, CollectorFactory, CollectorRegistry, NamedCollector};
pub use scrape::{scrape, ScrapeDescriptors};
pub use source::{BlockRecord, BlockSource};
pub use window::{fetch_window, FetchedWindow, Window, WindowSample};

pub use usechain_config::WINDOW_SIZE;
