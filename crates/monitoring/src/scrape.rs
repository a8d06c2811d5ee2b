//! One scrape: every enabled collector in turn, plus per-collector
//! duration and success gauges.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::descriptor::MetricDescriptor;
use crate::emit::{MetricKind, MetricSample, MetricSink};
use crate::error::CollectResult;
use crate::registry::NamedCollector;

/// Descriptors of the scrape meta-metrics.
#[derive(Debug, Clone)]
pub struct ScrapeDescriptors {
    duration: Arc<MetricDescriptor>,
    success: Arc<MetricDescriptor>,
}

impl ScrapeDescriptors {
    pub fn new(namespace: &str) -> CollectResult<Self> {
        let labels = || vec!["collector".to_string()];
        Ok(Self {
            duration: Arc::new(MetricDescriptor::with_labels(
                format!("{namespace}_scrape_collector_duration_seconds"),
                "usechain_exporter: Duration of a collector scrape.",
                labels(),
            )?),
            success: Arc::new(MetricDescriptor::with_labels(
                format!("{namespace}_scrape_collector_success"),
                "usechain_exporter: Whether a collector succeeded.",
                labels(),
            )?),
        })
    }
}

/// Runs `collectors` one after another. A failing collector contributes only
/// its meta-metrics; the others are unaffected.
pub async fn scrape(
    collectors: &[NamedCollector],
    meta: &ScrapeDescriptors,
    sink: &mut dyn MetricSink,
) -> CollectResult<()> {
    for named in collectors {
        let start = Instant::now();
        let mut buffered: Vec<MetricSample> = Vec::new();
        let result = named.collector.update(&mut buffered).await;
        let elapsed = start.elapsed().as_secs_f64();

        let success = match result {
            Ok(()) => {
                debug!(collector = %named.name, duration_seconds = elapsed, "collector succeeded");
                for sample in buffered {
                    sink.emit(sample)?;
                }
                1.0
            }
            Err(err) => {
                error!(collector = %named.name, duration_seconds = elapsed, error = %err, "collector failed");
                0.0
            }
        };

        let label = vec![named.name.clone()];
        sink.emit(MetricSample::with_label_values(
            meta.duration.clone(),
            MetricKind::Gauge,
            elapsed,
            label.clone(),
        )?)?;
        sink.emit(MetricSample::with_label_values(
            meta.success.clone(),
            MetricKind::Gauge,
            success,
            label,
        )?)?;
    }
    Ok(())
}
