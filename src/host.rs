//! Application context tying the pipeline to the dispatcher
//!
//! The host owns the handler catalog, the discovery walker, the dispatcher
//! and the shared registry reference. Dispatch reads an immutable snapshot;
//! reload builds a complete new registry off to the side and swaps the
//! reference, so no in-flight dispatch ever observes a partial registry.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::HandlerCatalog;
use crate::config::Config;
use crate::discovery::Walker;
use crate::dispatch::Dispatcher;
use crate::interaction::{GatewayEventName, GatewayPayload, InboundEvent, Responder};
use crate::loader;
use crate::registry::{LoadCounts, Registry};

/// Owns the registry and routes events against its latest snapshot
pub struct Host {
    walker: Walker,
    catalog: HandlerCatalog,
    dispatcher: Dispatcher,
    strict: bool,
    registry: RwLock<Arc<Registry>>,
}

impl Host {
    /// Create a host with an empty registry
    #[must_use]
    pub fn new(config: &Config, catalog: HandlerCatalog) -> Self {
        Self {
            walker: Walker::new(config.base_dir.clone(), config.extensions_dir.clone()),
            catalog,
            dispatcher: Dispatcher::new(config.text_prefix.clone()),
            strict: config.strict_registration,
            registry: RwLock::new(Arc::new(Registry::default())),
        }
    }

    /// Discover, validate and register all handlers, then swap the registry
    ///
    /// Loading is sequential so registration order is reproducible. Returns
    /// the per-kind counters of the new registry.
    pub async fn load_all(&self) -> LoadCounts {
        let registry = loader::build_registry(&self.walker, &self.catalog, self.strict);
        let counts = *registry.counts();
        tracing::info!(total = counts.total(), "loaded: {counts}");

        *self.registry.write().await = Arc::new(registry);
        counts
    }

    /// Rebuild the registry from current on-disk state and swap it in
    ///
    /// Equivalent to a fresh [`Self::load_all`]: the new registry is built
    /// completely before the swap, never patched incrementally.
    pub async fn reload(&self) -> LoadCounts {
        tracing::info!("reloading handler registry");
        self.load_all().await
    }

    /// The current registry snapshot
    pub async fn snapshot(&self) -> Arc<Registry> {
        self.registry.read().await.clone()
    }

    /// Dispatch one inbound event against the current snapshot
    pub async fn dispatch(&self, event: &InboundEvent, responder: &dyn Responder) {
        let registry = self.snapshot().await;
        self.dispatcher.dispatch(&registry, event, responder).await;
    }

    /// Emit a lifecycle event to the current snapshot's bindings
    pub async fn emit(&self, event: GatewayEventName, payload: &GatewayPayload) {
        let registry = self.snapshot().await;
        registry.events().emit(event, payload).await;
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("walker", &self.walker)
            .field("catalog", &self.catalog.len())
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{CommandExec, InteractionCtx};
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;

    struct Noop;

    #[async_trait]
    impl CommandExec for Noop {
        async fn execute(&self, _cx: InteractionCtx<'_>) -> crate::Result<()> {
            Ok(())
        }
    }

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn test_config(root: &Path) -> Config {
        Config {
            base_dir: root.join("bot"),
            extensions_dir: root.join("extensions"),
            ..Default::default()
        }
    }

    fn test_catalog() -> HandlerCatalog {
        let mut catalog = HandlerCatalog::new();
        catalog.register_command("cmd", std::sync::Arc::new(Noop));
        catalog
    }

    #[tokio::test]
    async fn starts_empty_until_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let host = Host::new(&test_config(dir.path()), test_catalog());

        assert!(host.snapshot().await.command("ping").is_none());
    }

    #[tokio::test]
    async fn reload_swaps_in_fresh_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let manifest = config.base_dir.join("commands/slash/ping.toml");
        write(&manifest, "name = \"ping\"\nentry = \"cmd\"\n");

        let host = Host::new(&config, test_catalog());
        host.load_all().await;

        let before = host.snapshot().await;
        assert!(before.command("ping").is_some());

        write(&manifest, "name = \"pong\"\nentry = \"cmd\"\n");
        let counts = host.reload().await;
        assert_eq!(counts.commands, 1);

        // Old snapshot is untouched; the new one sees the change
        assert!(before.command("ping").is_some());
        let after = host.snapshot().await;
        assert!(after.command("ping").is_none());
        assert!(after.command("pong").is_some());
    }
}
