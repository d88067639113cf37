//! Handler catalog — the compile-time implementation table
//!
//! Manifests declare *where* a handler is deployed and under which key it
//! routes; the behavior itself is registered here at bootstrap, keyed by the
//! manifest's `entry` string. The registrar resolves entries during loading
//! and rejects candidates whose entry is missing or of the wrong kind, so
//! dispatch never meets an unresolved handler.

use std::collections::HashMap;
use std::sync::Arc;

use crate::handlers::{CommandExec, ComponentExec, LifecycleExec, MessageExec};

/// A registered handler implementation
#[derive(Clone)]
pub enum HandlerImpl {
    /// Slash command behavior
    Command(Arc<dyn CommandExec>),
    /// Button, modal or menu behavior
    Component(Arc<dyn ComponentExec>),
    /// Message trigger behavior
    Trigger(Arc<dyn MessageExec>),
    /// Lifecycle event behavior
    Lifecycle(Arc<dyn LifecycleExec>),
}

impl HandlerImpl {
    /// Label used in kind-mismatch diagnostics
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Component(_) => "component",
            Self::Trigger(_) => "message trigger",
            Self::Lifecycle(_) => "event",
        }
    }
}

impl std::fmt::Debug for HandlerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HandlerImpl::{}", self.label())
    }
}

/// Catalog of handler implementations keyed by entry name
#[derive(Debug, Default)]
pub struct HandlerCatalog {
    entries: HashMap<String, HandlerImpl>,
}

impl HandlerCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a slash command implementation
    pub fn register_command(&mut self, entry: &str, exec: Arc<dyn CommandExec>) {
        self.insert(entry, HandlerImpl::Command(exec));
    }

    /// Register a button/modal/menu implementation
    pub fn register_component(&mut self, entry: &str, exec: Arc<dyn ComponentExec>) {
        self.insert(entry, HandlerImpl::Component(exec));
    }

    /// Register a message trigger implementation
    pub fn register_trigger(&mut self, entry: &str, exec: Arc<dyn MessageExec>) {
        self.insert(entry, HandlerImpl::Trigger(exec));
    }

    /// Register a lifecycle event implementation
    pub fn register_lifecycle(&mut self, entry: &str, exec: Arc<dyn LifecycleExec>) {
        self.insert(entry, HandlerImpl::Lifecycle(exec));
    }

    fn insert(&mut self, entry: &str, implementation: HandlerImpl) {
        if self
            .entries
            .insert(entry.to_string(), implementation)
            .is_some()
        {
            tracing::debug!(entry, "catalog entry replaced");
        }
    }

    /// Look up an implementation by entry key
    #[must_use]
    pub fn get(&self, entry: &str) -> Option<&HandlerImpl> {
        self.entries.get(entry)
    }

    /// Number of registered entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{InteractionCtx, MessageCtx};
    use crate::interaction::GatewayPayload;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl CommandExec for Noop {
        async fn execute(&self, _cx: InteractionCtx<'_>) -> crate::Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl MessageExec for Noop {
        async fn execute(&self, _cx: MessageCtx<'_>) -> crate::Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl LifecycleExec for Noop {
        async fn execute(&self, _payload: &GatewayPayload) -> crate::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn lookup_by_entry_key() {
        let mut catalog = HandlerCatalog::new();
        catalog.register_command("builtin:ping", Arc::new(Noop));

        assert_eq!(catalog.len(), 1);
        assert!(matches!(
            catalog.get("builtin:ping"),
            Some(HandlerImpl::Command(_))
        ));
        assert!(catalog.get("builtin:missing").is_none());
    }

    #[test]
    fn later_registration_replaces() {
        let mut catalog = HandlerCatalog::new();
        catalog.register_trigger("x", Arc::new(Noop));
        catalog.register_lifecycle("x", Arc::new(Noop));

        assert_eq!(catalog.len(), 1);
        assert!(matches!(catalog.get("x"), Some(HandlerImpl::Lifecycle(_))));
    }
}
