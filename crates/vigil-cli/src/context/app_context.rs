use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use vigil_audit::{AuditJobs, AuditSettings, KindRegistry};
use vigil_catalog::build_registry;
use vigil_config::VigilConfig;
use vigil_store::{DocumentStore, MemoryStore, jsonl};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: VigilConfig,
    pub registry: Arc<KindRegistry>,
}

impl AppContext {
    /// Build the catalog registry. The snapshot itself is loaded on demand
    /// by the commands that audit it.
    pub fn init(config: VigilConfig) -> anyhow::Result<Self> {
        let registry = build_registry().context("failed to build the kind catalog")?;
        Ok(Self {
            config,
            registry: Arc::new(registry),
        })
    }

    /// Load every `<Kind>.jsonl` file under `dir` into a fresh store that
    /// already knows every registered kind.
    pub fn load_store(&self, dir: &Path) -> anyhow::Result<Arc<MemoryStore>> {
        let store = MemoryStore::with_kinds(self.registry.kinds());
        let summary = jsonl::load_dir(&store, dir)
            .with_context(|| format!("failed to load snapshot from {}", dir.display()))?;
        tracing::info!(
            dir = %dir.display(),
            kinds = summary.kinds,
            entities = summary.entities,
            "snapshot loaded"
        );
        Ok(Arc::new(store))
    }

    /// A job table over `store` using the configured engine settings.
    pub fn jobs(&self, store: Arc<MemoryStore>) -> AuditJobs {
        let store: Arc<dyn DocumentStore> = store;
        AuditJobs::new(
            store,
            Arc::clone(&self.registry),
            AuditSettings::from(&self.config.audit),
        )
    }
}
