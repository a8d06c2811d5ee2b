//! The block collector.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};
use usechain_config::{BlockCollectorSettings, MetricKindPolicy, METRIC_NAMESPACE};

use crate::aggregate::{aggregate, AggregateStats};
use crate::descriptor::BlockDescriptors;
use crate::emit::{emit_stats, MetricKind, MetricSample, MetricSink};
use crate::error::CollectResult;
use crate::source::BlockSource;
use crate::window::{fetch_window, FetchedWindow};

/// A source of metric samples, invoked once per scrape.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Runs one collection cycle, writing samples to `sink`. An error means
    /// nothing further is emitted for this cycle.
    async fn update(&self, sink: &mut dyn MetricSink) -> CollectResult<()>;
}

/// Options fixed at collector construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCollectorOptions {
    pub namespace: String,
    pub kind_policy: MetricKindPolicy,
    pub expose_fetch_failures: bool,
}

impl Default for BlockCollectorOptions {
    fn default() -> Self {
        Self {
            namespace: METRIC_NAMESPACE.to_string(),
            kind_policy: MetricKindPolicy::default(),
            expose_fetch_failures: false,
        }
    }
}

impl From<&BlockCollectorSettings> for BlockCollectorOptions {
    fn from(settings: &BlockCollectorSettings) -> Self {
        Self {
            namespace: METRIC_NAMESPACE.to_string(),
            kind_policy: settings.kind_policy,
            expose_fetch_failures: settings.expose_fetch_failures,
        }
    }
}

/// Samples the last [`WINDOW_SIZE`](usechain_config::WINDOW_SIZE) blocks
/// and exports their throughput, delay and size statistics.
pub struct BlockCollector {
    source: Arc<dyn BlockSource>,
    descriptors: BlockDescriptors,
    options: BlockCollectorOptions,
}

impl BlockCollector {
    /// Builds the collector and its descriptors.
    pub fn new(source: Arc<dyn BlockSource>, options: BlockCollectorOptions) -> CollectResult<Self> {
        let descriptors = BlockDescriptors::new(&options.namespace)?;
        Ok(Self {
            source,
            descriptors,
            options,
        })
    }

    /// Fetches and aggregates the current window without emitting anything.
    pub async fn sample(&self) -> CollectResult<(FetchedWindow, AggregateStats)> {
        let fetched = fetch_window(self.source.as_ref()).await?;
        let stats = aggregate(&fetched);
        Ok((fetched, stats))
    }
}

#[async_trait]
impl Collector for BlockCollector {
    #[instrument(name = "block_collector", skip_all)]
    async fn update(&self, sink: &mut dyn MetricSink) -> CollectResult<()> {
        let (fetched, stats) = self.sample().await?;
        debug!(
            height = stats.height,
            total_tx = stats.total_tx,
            failures = fetched.fetch_failures,
            "block window aggregated"
        );

        emit_stats(
            &self.descriptors,
            &stats,
            MetricKind::for_policy(self.options.kind_policy),
            sink,
        )?;

        if self.options.expose_fetch_failures {
            sink.emit(MetricSample::new(
                self.descriptors.fetch_failures.clone(),
                MetricKind::Gauge,
                fetched.fetch_failures as f64,
            ))?;
        }

        Ok(())
    }
}
