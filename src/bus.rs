//! Lifecycle event bus
//!
//! Validated lifecycle handlers are bound directly onto this bus, indexed
//! by gateway event name. One-shot bindings fire at most once per registry
//! lifetime; handler errors are logged and never interrupt emission.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::handlers::LifecycleHandler;
use crate::interaction::{GatewayEventName, GatewayPayload};

struct Binding {
    handler: Arc<LifecycleHandler>,
    fired: AtomicBool,
}

/// Event bus holding lifecycle bindings in registration order
#[derive(Default)]
pub struct EventBus {
    bindings: HashMap<GatewayEventName, Vec<Binding>>,
}

impl EventBus {
    /// Build a bus from validated lifecycle handlers, preserving order
    #[must_use]
    pub fn bind(handlers: Vec<Arc<LifecycleHandler>>) -> Self {
        let mut bindings: HashMap<GatewayEventName, Vec<Binding>> = HashMap::new();
        for handler in handlers {
            bindings.entry(handler.event).or_default().push(Binding {
                handler,
                fired: AtomicBool::new(false),
            });
        }
        Self { bindings }
    }

    /// Emit a gateway event to every matching binding
    ///
    /// Handlers run sequentially in registration order. A failing handler
    /// is logged and does not stop the others.
    pub async fn emit(&self, event: GatewayEventName, payload: &GatewayPayload) {
        let Some(bindings) = self.bindings.get(&event) else {
            return;
        };

        for binding in bindings {
            if binding.handler.once && binding.fired.swap(true, Ordering::SeqCst) {
                continue;
            }

            if let Err(e) = binding.handler.exec.execute(payload).await {
                tracing::error!(
                    event = %event,
                    source = %binding.handler.source.display(),
                    error = %e,
                    "lifecycle handler failed"
                );
            }
        }
    }

    /// Number of bindings across all events
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Whether no handlers are bound
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("bindings", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::LifecycleExec;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl LifecycleExec for Counting {
        async fn execute(&self, _payload: &GatewayPayload) -> crate::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl LifecycleExec for Failing {
        async fn execute(&self, _payload: &GatewayPayload) -> crate::Result<()> {
            Err(crate::Error::Handler("boom".to_string()))
        }
    }

    fn handler(once: bool, exec: Arc<dyn LifecycleExec>) -> Arc<LifecycleHandler> {
        Arc::new(LifecycleHandler {
            event: GatewayEventName::Ready,
            once,
            source: PathBuf::from("events/ready.toml"),
            exec,
        })
    }

    #[tokio::test]
    async fn recurring_binding_fires_every_time() {
        let count = Arc::new(AtomicUsize::new(0));
        let bus = EventBus::bind(vec![handler(false, Arc::new(Counting(count.clone())))]);

        let payload = GatewayPayload::Ready {
            username: "herald".to_string(),
        };
        bus.emit(GatewayEventName::Ready, &payload).await;
        bus.emit(GatewayEventName::Ready, &payload).await;

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn once_binding_fires_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let bus = EventBus::bind(vec![handler(true, Arc::new(Counting(count.clone())))]);

        let payload = GatewayPayload::Ready {
            username: "herald".to_string(),
        };
        bus.emit(GatewayEventName::Ready, &payload).await;
        bus.emit(GatewayEventName::Ready, &payload).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_handler_does_not_stop_siblings() {
        let count = Arc::new(AtomicUsize::new(0));
        let bus = EventBus::bind(vec![
            handler(false, Arc::new(Failing)),
            handler(false, Arc::new(Counting(count.clone()))),
        ]);

        let payload = GatewayPayload::Ready {
            username: "herald".to_string(),
        };
        bus.emit(GatewayEventName::Ready, &payload).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unbound_event_is_a_no_op() {
        let bus = EventBus::bind(Vec::new());
        bus.emit(
            GatewayEventName::MessageCreate,
            &GatewayPayload::Interaction {
                id: "1".to_string(),
                key: "x".to_string(),
            },
        )
        .await;
        assert!(bus.is_empty());
    }
}
