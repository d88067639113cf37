//! Shared test fixtures: recording handlers and a mock reply surface

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use herald_gateway::{
    CommandExec, ComponentExec, HandlerCatalog, InteractionCtx, MessageCtx, MessageExec, Notice,
    Responder,
};

/// Shared log of handler invocations, in execution order
pub type InvocationLog = Arc<Mutex<Vec<String>>>;

/// Handler implementation that records its tag and optionally fails
pub struct RecordingExec {
    tag: String,
    log: InvocationLog,
    fail: bool,
}

impl RecordingExec {
    pub fn new(tag: &str, log: InvocationLog) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.to_string(),
            log,
            fail: false,
        })
    }

    pub fn failing(tag: &str, log: InvocationLog) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.to_string(),
            log,
            fail: true,
        })
    }

    async fn record(&self) -> herald_gateway::Result<()> {
        self.log.lock().await.push(self.tag.clone());
        if self.fail {
            Err(herald_gateway::Error::Handler(format!(
                "synthetic failure in {}",
                self.tag
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CommandExec for RecordingExec {
    async fn execute(&self, _cx: InteractionCtx<'_>) -> herald_gateway::Result<()> {
        self.record().await
    }
}

#[async_trait]
impl ComponentExec for RecordingExec {
    async fn execute(&self, _cx: InteractionCtx<'_>) -> herald_gateway::Result<()> {
        self.record().await
    }
}

#[async_trait]
impl MessageExec for RecordingExec {
    async fn execute(&self, _cx: MessageCtx<'_>) -> herald_gateway::Result<()> {
        self.record().await
    }
}

/// Mock reply surface recording every outbound notice
pub struct RecordingResponder {
    deferred: AtomicBool,
    replied: AtomicBool,
    fail_sends: bool,
    /// `(surface, notice)` pairs in send order
    pub sent: Mutex<Vec<(&'static str, Notice)>>,
}

impl Default for RecordingResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingResponder {
    pub fn new() -> Self {
        Self {
            deferred: AtomicBool::new(false),
            replied: AtomicBool::new(false),
            fail_sends: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A responder whose event was already deferred
    pub fn deferred() -> Self {
        let responder = Self::new();
        responder.deferred.store(true, Ordering::SeqCst);
        responder
    }

    /// A responder whose event was already fully replied to
    pub fn replied() -> Self {
        let responder = Self::new();
        responder.replied.store(true, Ordering::SeqCst);
        responder
    }

    /// A responder whose every send fails
    pub fn broken() -> Self {
        let mut responder = Self::new();
        responder.fail_sends = true;
        responder
    }

    pub async fn outbox(&self) -> Vec<(&'static str, Notice)> {
        self.sent.lock().await.clone()
    }

    async fn push(&self, surface: &'static str, notice: Notice) -> herald_gateway::Result<()> {
        if self.fail_sends {
            return Err(herald_gateway::Error::Channel("send failed".to_string()));
        }
        self.sent.lock().await.push((surface, notice));
        Ok(())
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    fn is_deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }

    fn is_replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    async fn defer(&self) -> herald_gateway::Result<()> {
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn reply(&self, notice: Notice) -> herald_gateway::Result<()> {
        self.push("reply", notice).await?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn edit_reply(&self, notice: Notice) -> herald_gateway::Result<()> {
        self.push("edit", notice).await?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn follow_up(&self, notice: Notice) -> herald_gateway::Result<()> {
        self.push("follow_up", notice).await
    }
}

/// Write a manifest file, creating parent directories
pub fn write_manifest(path: &Path, contents: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// Catalog with recording implementations under well-known entry keys
pub fn recording_catalog(log: &InvocationLog) -> HandlerCatalog {
    let mut catalog = HandlerCatalog::new();
    catalog.register_command("test:command", RecordingExec::new("command", log.clone()));
    catalog.register_command(
        "test:command-b",
        RecordingExec::new("command-b", log.clone()),
    );
    catalog.register_component("test:literal", RecordingExec::new("literal", log.clone()));
    catalog.register_component(
        "test:predicate",
        RecordingExec::new("predicate", log.clone()),
    );
    catalog.register_trigger("test:trigger", RecordingExec::new("trigger", log.clone()));
    catalog
}
