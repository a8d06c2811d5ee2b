//! Named collector registrations with per-collector enable flags.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;
use usechain_config::BLOCK_COLLECTOR_NAME;

use crate::collector::{BlockCollector, BlockCollectorOptions, Collector};
use crate::error::{CollectResult, RegistryError};
use crate::source::BlockSource;

/// Shared inputs handed to every collector factory.
#[derive(Clone)]
pub struct CollectorContext {
    pub source: Arc<dyn BlockSource>,
    pub block: BlockCollectorOptions,
}

/// Builds one collector from the shared context.
pub type CollectorFactory =
    Box<dyn Fn(&CollectorContext) -> CollectResult<Box<dyn Collector>> + Send + Sync>;

struct Registration {
    name: String,
    default_enabled: bool,
    factory: CollectorFactory,
}

/// An instantiated, enabled collector.
pub struct NamedCollector {
    pub name: String,
    pub collector: Box<dyn Collector>,
}

impl fmt::Debug for NamedCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedCollector").field("name", &self.name).finish()
    }
}

/// Collectors known to the exporter.
#[derive(Default)]
pub struct CollectorRegistry {
    entries: Vec<Registration>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in collectors: `block`, enabled by default.
    pub fn with_defaults() -> Self {
        let block: CollectorFactory = Box::new(|ctx: &CollectorContext| {
            let collector = BlockCollector::new(ctx.source.clone(), ctx.block.clone())?;
            Ok(Box::new(collector) as Box<dyn Collector>)
        });
        Self {
            entries: vec![Registration {
                name: BLOCK_COLLECTOR_NAME.to_string(),
                default_enabled: true,
                factory: block,
            }],
        }
    }

    /// Adds a collector under `name`.
    pub fn register(
        &mut self,
        name: &str,
        default_enabled: bool,
        factory: CollectorFactory,
    ) -> Result<(), RegistryError> {
        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        self.entries.push(Registration {
            name: name.to_string(),
            default_enabled,
            factory,
        });
        Ok(())
    }

    /// Registered names with their default state, in registration order.
    pub fn names(&self) -> Vec<(&str, bool)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.default_enabled))
            .collect()
    }

    /// Instantiates every enabled collector. `overrides` maps registration
    /// names to an explicit enabled flag.
    pub fn build(
        &self,
        overrides: &BTreeMap<String, bool>,
        ctx: &CollectorContext,
    ) -> Result<Vec<NamedCollector>, RegistryError> {
        if let Some(unknown) = overrides
            .keys()
            .find(|name| !self.entries.iter().any(|entry| &entry.name == *name))
        {
            return Err(RegistryError::Unknown(unknown.clone()));
        }

        let mut collectors = Vec::new();
        for entry in &self.entries {
            let enabled = overrides
                .get(&entry.name)
                .copied()
                .unwrap_or(entry.default_enabled);
            info!(collector = %entry.name, enabled, "collector state");
            if !enabled {
                continue;
            }

            let collector = (entry.factory)(ctx).map_err(|source| RegistryError::Build {
                name: entry.name.clone(),
                source,
            })?;
            collectors.push(NamedCollector {
                name: entry.name.clone(),
                collector,
            });
        }
        Ok(collectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::MetricSink;
    use crate::source::MockBlockSource;
    use async_trait::async_trait;

    struct Silent;

    #[async_trait]
    impl Collector for Silent {
        async fn update(&self, _sink: &mut dyn MetricSink) -> CollectResult<()> {
            Ok(())
        }
    }

    fn silent_factory() -> CollectorFactory {
        Box::new(|_ctx: &CollectorContext| Ok(Box::new(Silent) as Box<dyn Collector>))
    }

    fn context() -> CollectorContext {
        CollectorContext {
            source: Arc::new(MockBlockSource::new()),
            block: BlockCollectorOptions::default(),
        }
    }

    #[test]
    fn defaults_register_block_enabled() {
        let registry = CollectorRegistry::with_defaults();
        assert_eq!(registry.names(), vec![("block", true)]);

        let built = registry.build(&BTreeMap::new(), &context()).unwrap();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].name, "block");
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = CollectorRegistry::with_defaults();
        let err = registry.register("block", false, silent_factory()).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(name) if name == "block"));
    }

    #[test]
    fn overrides_enable_and_disable() {
        let mut registry = CollectorRegistry::with_defaults();
        registry.register("silent", false, silent_factory()).unwrap();

        let mut overrides = BTreeMap::new();
        overrides.insert("block".to_string(), false);
        overrides.insert("silent".to_string(), true);

        let built = registry.build(&overrides, &context()).unwrap();
        let names: Vec<_> = built.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["silent"]);
    }

    #[test]
    fn unknown_override_is_rejected() {
        let registry = CollectorRegistry::with_defaults();
        let mut overrides = BTreeMap::new();
        overrides.insert("peers".to_string(), true);

        let err = registry.build(&overrides, &context()).unwrap_err();
        assert!(matches!(err, RegistryError::Unknown(name) if name == "peers"));
    }

    #[test]
    fn factory_failure_names_the_collector() {
        let registry = CollectorRegistry::with_defaults();
        let ctx = CollectorContext {
            block: BlockCollectorOptions {
                namespace: "bad-namespace".to_string(),
                ..BlockCollectorOptions::default()
            },
            ..context()
        };

        let err = registry.build(&BTreeMap::new(), &ctx).unwrap_err();
        assert!(matches!(err, RegistryError::Build { name, .. } if name == "block"));
    }
}
