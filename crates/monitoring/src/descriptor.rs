//! Metric identities, built once per collector.

use std::collections::HashMap;
use std::sync::Arc;

use prometheus::core::Desc;

use crate::error::CollectResult;

/// Name, help text and variable label names of one metric.
#[derive(Debug, Clone)]
pub struct MetricDescriptor {
    desc: Desc,
}

impl MetricDescriptor {
    /// Validates and builds a descriptor without labels.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> CollectResult<Self> {
        Self::with_labels(name, help, Vec::new())
    }

    /// Validates and builds a descriptor whose samples carry `labels`.
    pub fn with_labels(
        name: impl Into<String>,
        help: impl Into<String>,
        labels: Vec<String>,
    ) -> CollectResult<Self> {
        let desc = Desc::new(name.into(), help.into(), labels, HashMap::new())?;
        Ok(Self { desc })
    }

    pub fn name(&self) -> &str {
        &self.desc.fq_name
    }

    pub fn help(&self) -> &str {
        &self.desc.help
    }

    pub fn label_names(&self) -> &[String] {
        &self.desc.variable_labels
    }
}

/// The nine block statistics plus the optional fetch-failure gauge.
#[derive(Debug, Clone)]
pub struct BlockDescriptors {
    pub height: Arc<MetricDescriptor>,
    pub total_tx: Arc<MetricDescriptor>,
    pub total_time: Arc<MetricDescriptor>,
    pub tps: Arc<MetricDescriptor>,
    pub avg_delay: Arc<MetricDescriptor>,
    pub max_delay: Arc<MetricDescriptor>,
    pub avg_size: Arc<MetricDescriptor>,
    pub max_size: Arc<MetricDescriptor>,
    pub avg_tx_per_block: Arc<MetricDescriptor>,
    pub fetch_failures: Arc<MetricDescriptor>,
}

impl BlockDescriptors {
    /// Builds every descriptor under `namespace`.
    pub fn new(namespace: &str) -> CollectResult<Self> {
        let desc = |suffix: &str, help: &str| -> CollectResult<Arc<MetricDescriptor>> {
            MetricDescriptor::new(format!("{namespace}_{suffix}"), help).map(Arc::new)
        };

        Ok(Self {
            height: desc("height", "Usechain block height")?,
            total_tx: desc("totalTx", "Usechain totalTx in recent 100 blocks")?,
            total_time: desc("totalTime", "Usechain totalTime in recent 100 blocks")?,
            tps: desc("tps", "Usechain tps in recent 100 blocks")?,
            avg_delay: desc("avgDelay", "Usechain average block delay in recent 100 blocks")?,
            max_delay: desc("maxDelay", "Usechain maximum block delay in recent 100 blocks")?,
            avg_size: desc("avgSize", "Usechain average block size in recent 100 blocks")?,
            max_size: desc("maxSize", "Usechain maximum block size in recent 100 blocks")?,
            avg_tx_per_block: desc("avgTxperBlock", "Usechain average tx number per block")?,
            fetch_failures: desc(
                "fetchFailures",
                "Usechain block fetches that failed during the last collection",
            )?,
        })
    }

    /// The nine statistic descriptors in emission order.
    pub fn in_emit_order(&self) -> [&Arc<MetricDescriptor>; 9] {
        [
            &self.height,
            &self.total_tx,
            &self.total_time,
            &self.tps,
            &self.avg_delay,
            &self.max_delay,
            &self.avg_size,
            &self.max_size,
            &self.avg_tx_per_block,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_namespace() {
        let descriptors = BlockDescriptors::new("usechain").unwrap();
        let names: Vec<_> = descriptors
            .in_emit_order()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "usechain_height",
                "usechain_totalTx",
                "usechain_totalTime",
                "usechain_tps",
                "usechain_avgDelay",
                "usechain_maxDelay",
                "usechain_avgSize",
                "usechain_maxSize",
                "usechain_avgTxperBlock",
            ]
        );
        assert_eq!(descriptors.fetch_failures.name(), "usechain_fetchFailures");
        assert!(descriptors.height.label_names().is_empty());
    }

    #[test]
    fn invalid_namespace_is_rejected() {
        assert!(BlockDescriptors::new("use-chain").is_err());
        assert!(MetricDescriptor::new("ok_name", "").is_err());
    }

    #[test]
    fn labelled_descriptor_keeps_label_names() {
        let desc = MetricDescriptor::with_labels(
            "usechain_scrape_collector_success",
            "Whether a collector succeeded.",
            vec!["collector".to_string()],
        )
        .unwrap();
        assert_eq!(desc.label_names().to_vec(), vec!["collector".to_string()]);
    }
}
