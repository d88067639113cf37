//! Handler descriptors — the shared vocabulary of the loading pipeline
//!
//! Each capability kind has its own record type with a typed execution
//! trait. Validation lives in the registrar, which builds these records
//! from raw manifests; nothing downstream ever probes optional fields.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;
use crate::interaction::{GatewayEventName, GatewayPayload, InteractionEvent, MessageEvent, Responder};

/// Capability kind — the category of a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Slash command, addressed by literal name
    Command,
    /// Button click handler, addressed by custom ID
    Button,
    /// Modal submit handler, addressed by custom ID
    Modal,
    /// Select menu handler, addressed by custom ID
    Menu,
    /// Prefix-gated plain-message trigger
    MessageTrigger,
    /// Lifecycle event binding
    LifecycleEvent,
}

impl HandlerKind {
    /// All kinds, in the order the pipeline loads them
    pub const LOAD_ORDER: [Self; 6] = [
        Self::Button,
        Self::Command,
        Self::MessageTrigger,
        Self::LifecycleEvent,
        Self::Menu,
        Self::Modal,
    ];

    /// Well-known sub-path searched under the base tree and each extension
    #[must_use]
    pub const fn sub_path(self) -> &'static str {
        match self {
            Self::Command => "commands/slash",
            Self::MessageTrigger => "commands/messages",
            Self::Button => "handlers/buttons",
            Self::Modal => "handlers/modals",
            Self::Menu => "handlers/menus",
            Self::LifecycleEvent => "events",
        }
    }

    /// Keyword table a manifest may nest its descriptor under
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Command | Self::MessageTrigger => "command",
            Self::Button => "button",
            Self::Modal => "modal",
            Self::Menu => "menu",
            Self::LifecycleEvent => "event",
        }
    }

    /// Human-readable label used in logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Button => "button",
            Self::Modal => "modal",
            Self::Menu => "menu",
            Self::MessageTrigger => "message trigger",
            Self::LifecycleEvent => "event",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Dynamic match rule over a candidate custom ID
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Component identifier: a literal key or a dynamic match rule
#[derive(Clone)]
pub enum CustomId {
    /// Exact-match identifier, used as the registry key
    Literal(String),
    /// Predicate over the incoming identifier, matched in registration order
    Predicate(Predicate),
}

impl CustomId {
    /// Build a predicate variant from a closure
    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Whether this identifier matches an incoming custom ID
    #[must_use]
    pub fn matches(&self, id: &str) -> bool {
        match self {
            Self::Literal(key) => key == id,
            Self::Predicate(pred) => pred(id),
        }
    }

    /// The literal key, if this is a literal identifier
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Literal(key) => Some(key.as_str()),
            Self::Predicate(_) => None,
        }
    }
}

impl fmt::Debug for CustomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(key) => f.debug_tuple("Literal").field(key).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for CustomId {
    fn from(key: &str) -> Self {
        Self::Literal(key.to_string())
    }
}

/// Execution context for command and component handlers
pub struct InteractionCtx<'a> {
    /// The originating event
    pub event: &'a InteractionEvent,
    /// Reply surface for the originating event
    pub responder: &'a dyn Responder,
}

/// Execution context for message triggers
pub struct MessageCtx<'a> {
    /// The originating message
    pub message: &'a MessageEvent,
    /// Reply surface for the originating message
    pub responder: &'a dyn Responder,
}

/// Slash command behavior
#[async_trait]
pub trait CommandExec: Send + Sync {
    /// Run the command against the originating interaction
    ///
    /// # Errors
    ///
    /// Returns an error when the command fails; the dispatcher contains it
    /// and sends a sanitized notice.
    async fn execute(&self, cx: InteractionCtx<'_>) -> Result<()>;
}

/// Button, modal or menu behavior
#[async_trait]
pub trait ComponentExec: Send + Sync {
    /// Run the component handler against the originating interaction
    ///
    /// # Errors
    ///
    /// Returns an error when the handler fails; the dispatcher contains it
    /// and sends a sanitized notice.
    async fn execute(&self, cx: InteractionCtx<'_>) -> Result<()>;
}

/// Message trigger behavior
#[async_trait]
pub trait MessageExec: Send + Sync {
    /// Run the trigger against the originating message
    ///
    /// # Errors
    ///
    /// Returns an error when the trigger fails; the dispatcher contains it
    /// and sends a sanitized notice.
    async fn execute(&self, cx: MessageCtx<'_>) -> Result<()>;
}

/// Lifecycle event behavior
#[async_trait]
pub trait LifecycleExec: Send + Sync {
    /// Run the handler for an emitted gateway event
    ///
    /// # Errors
    ///
    /// Returns an error when the handler fails; the event bus logs it and
    /// keeps emitting.
    async fn execute(&self, payload: &GatewayPayload) -> Result<()>;
}

/// A validated slash command, registered under its literal name
#[derive(Clone)]
pub struct CommandHandler {
    /// Command name, used verbatim as the registry key
    pub name: String,
    /// Short description
    pub description: String,
    /// Manifest the command was loaded from
    pub source: PathBuf,
    /// Command behavior
    pub exec: Arc<dyn CommandExec>,
}

/// A validated button, modal or menu handler
#[derive(Clone)]
pub struct ComponentHandler {
    /// Registry key: the literal custom ID, or a path-derived surrogate for
    /// predicate identifiers
    pub key: String,
    /// Identifier matched against incoming custom IDs
    pub custom_id: CustomId,
    /// Manifest the handler was loaded from
    pub source: PathBuf,
    /// Handler behavior
    pub exec: Arc<dyn ComponentExec>,
}

/// A validated message trigger, gated by `prefix + name`
#[derive(Clone)]
pub struct TriggerHandler {
    /// Trigger name; matching is case-insensitive
    pub name: String,
    /// Gateway event the trigger listens on (always `messageCreate`)
    pub event: GatewayEventName,
    /// Manifest the trigger was loaded from
    pub source: PathBuf,
    /// Trigger behavior
    pub exec: Arc<dyn MessageExec>,
}

/// A validated lifecycle event binding
#[derive(Clone)]
pub struct LifecycleHandler {
    /// Gateway event to bind to
    pub event: GatewayEventName,
    /// One-shot binding: run at most once per registry lifetime
    pub once: bool,
    /// Manifest the handler was loaded from
    pub source: PathBuf,
    /// Handler behavior
    pub exec: Arc<dyn LifecycleExec>,
}

impl fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHandler")
            .field("name", &self.name)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for ComponentHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandler")
            .field("key", &self.key)
            .field("custom_id", &self.custom_id)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for TriggerHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerHandler")
            .field("name", &self.name)
            .field("event", &self.event)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for LifecycleHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHandler")
            .field("event", &self.event)
            .field("once", &self.once)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_exactly() {
        let id = CustomId::from("confirm");
        assert!(id.matches("confirm"));
        assert!(!id.matches("confirm_42"));
        assert_eq!(id.literal(), Some("confirm"));
    }

    #[test]
    fn predicate_matches_dynamically() {
        let id = CustomId::predicate(|s| s.starts_with("confirm_"));
        assert!(id.matches("confirm_42"));
        assert!(!id.matches("confirm"));
        assert!(id.literal().is_none());
    }

    #[test]
    fn sub_paths_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for kind in HandlerKind::LOAD_ORDER {
            assert!(seen.insert(kind.sub_path()));
        }
    }
}
