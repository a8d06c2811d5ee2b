//! Metric samples and the sinks that receive them.

use std::collections::HashMap;
use std::sync::Arc;

use prometheus::proto::{self, MetricFamily, MetricType};
use tokio::sync::mpsc::UnboundedSender;
use usechain_config::MetricKindPolicy;

use crate::aggregate::AggregateStats;
use crate::descriptor::{BlockDescriptors, MetricDescriptor};
use crate::error::{CollectError, CollectResult};

/// Exposition type of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    /// Kind used for the nine block statistics under `policy`.
    pub fn for_policy(policy: MetricKindPolicy) -> Self {
        match policy {
            MetricKindPolicy::Gauge => MetricKind::Gauge,
            MetricKindPolicy::Legacy => MetricKind::Counter,
        }
    }
}

/// One instantaneous value paired with its descriptor.
#[derive(Debug, Clone)]
pub struct MetricSample {
    descriptor: Arc<MetricDescriptor>,
    kind: MetricKind,
    value: f64,
    label_values: Vec<String>,
}

impl MetricSample {
    /// Sample for a descriptor without labels.
    pub fn new(descriptor: Arc<MetricDescriptor>, kind: MetricKind, value: f64) -> Self {
        Self {
            descriptor,
            kind,
            value,
            label_values: Vec::new(),
        }
    }

    /// Sample carrying one value per descriptor label, in order.
    pub fn with_label_values(
        descriptor: Arc<MetricDescriptor>,
        kind: MetricKind,
        value: f64,
        label_values: Vec<String>,
    ) -> CollectResult<Self> {
        let expected = descriptor.label_names().len();
        if label_values.len() != expected {
            return Err(prometheus::Error::InconsistentCardinality {
                expect: expected,
                got: label_values.len(),
            }
            .into());
        }
        Ok(Self {
            descriptor,
            kind,
            value,
            label_values,
        })
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    fn to_metric(&self) -> proto::Metric {
        let mut metric = proto::Metric::default();
        for (name, value) in self.descriptor.label_names().iter().zip(&self.label_values) {
            let mut pair = proto::LabelPair::default();
            pair.set_name(name.clone());
            pair.set_value(value.clone());
            metric.mut_label().push(pair);
        }
        match self.kind {
            MetricKind::Counter => {
                let mut counter = proto::Counter::default();
                counter.set_value(self.value);
                metric.set_counter(counter);
            }
            MetricKind::Gauge => {
                let mut gauge = proto::Gauge::default();
                gauge.set_value(self.value);
                metric.set_gauge(gauge);
            }
        }
        metric
    }

    /// Single-sample family, ready for a prometheus encoder.
    pub fn to_family(&self) -> MetricFamily {
        let mut family = MetricFamily::default();
        family.set_name(self.descriptor.name().to_string());
        family.set_help(self.descriptor.help().to_string());
        family.set_field_type(match self.kind {
            MetricKind::Counter => MetricType::COUNTER,
            MetricKind::Gauge => MetricType::GAUGE,
        });
        family.mut_metric().push(self.to_metric());
        family
    }
}

/// Groups samples into families by name, keeping first-seen order.
pub fn into_families(samples: &[MetricSample]) -> Vec<MetricFamily> {
    let mut families: Vec<MetricFamily> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sample in samples {
        match index.get(sample.name()) {
            Some(&at) => families[at].mut_metric().push(sample.to_metric()),
            None => {
                index.insert(sample.name(), families.len());
                families.push(sample.to_family());
            }
        }
    }

    families
}

/// Receives samples as they are produced.
pub trait MetricSink: Send {
    fn emit(&mut self, sample: MetricSample) -> CollectResult<()>;
}

impl MetricSink for Vec<MetricSample> {
    fn emit(&mut self, sample: MetricSample) -> CollectResult<()> {
        self.push(sample);
        Ok(())
    }
}

impl MetricSink for UnboundedSender<MetricSample> {
    fn emit(&mut self, sample: MetricSample) -> CollectResult<()> {
        self.send(sample).map_err(|_| CollectError::SinkClosed)
    }
}

/// Writes the nine statistics to `sink` in their fixed order.
pub fn emit_stats(
    descriptors: &BlockDescriptors,
    stats: &AggregateStats,
    kind: MetricKind,
    sink: &mut dyn MetricSink,
) -> CollectResult<()> {
    for (descriptor, value) in descriptors.in_emit_order().into_iter().zip(stats.in_emit_order()) {
        sink.emit(MetricSample::new(descriptor.clone(), kind, value as f64))?;
    }
    Ok(())
}
