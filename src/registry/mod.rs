//! Registry store — keyed tables populated by the loading pipeline
//!
//! Literal identifiers live in hash tables; predicate identifiers live in
//! ordered lists so registration order stays load-bearing. The registry is
//! immutable once built: reload constructs a fresh one and the host swaps
//! the shared reference.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::bus::EventBus;
use crate::handlers::{
    CommandHandler, ComponentHandler, CustomId, HandlerKind, LifecycleHandler, TriggerHandler,
};
use crate::{Error, Result};

/// Per-kind load counters
///
/// Counters track successful registrations, so an overwritten duplicate
/// still counts as loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadCounts {
    /// Buttons registered
    pub buttons: u32,
    /// Slash commands registered
    pub commands: u32,
    /// Message triggers registered
    pub triggers: u32,
    /// Lifecycle events bound
    pub events: u32,
    /// Menus registered
    pub menus: u32,
    /// Modals registered
    pub modals: u32,
}

impl LoadCounts {
    /// Total registrations across all kinds
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.buttons + self.commands + self.triggers + self.events + self.menus + self.modals
    }
}

impl fmt::Display for LoadCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} buttons, {} commands, {} message triggers, {} events, {} menus, {} modals",
            self.buttons, self.commands, self.triggers, self.events, self.menus, self.modals
        )
    }
}

/// Component table: literal hash map plus ordered predicate list
#[derive(Default)]
pub struct ComponentTable {
    literal: HashMap<String, Arc<ComponentHandler>>,
    predicates: Vec<Arc<ComponentHandler>>,
}

impl ComponentTable {
    /// Insert a handler, returning the literal entry it displaced (if any)
    fn insert(&mut self, handler: Arc<ComponentHandler>) -> Option<Arc<ComponentHandler>> {
        match &handler.custom_id {
            CustomId::Literal(key) => self.literal.insert(key.clone(), handler),
            CustomId::Predicate(_) => {
                self.predicates.push(handler);
                None
            }
        }
    }

    /// Resolve an incoming custom ID
    ///
    /// The literal table is consulted first; on a miss the predicate list
    /// is scanned in registration order and the first match wins.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&Arc<ComponentHandler>> {
        self.literal
            .get(id)
            .or_else(|| self.predicates.iter().find(|h| h.custom_id.matches(id)))
    }

    /// Look up an entry by its registry key (literal or surrogate)
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Arc<ComponentHandler>> {
        self.literal
            .get(key)
            .or_else(|| self.predicates.iter().find(|h| h.key == key))
    }

    /// Number of registered entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.literal.len() + self.predicates.len()
    }

    /// Whether the table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literal.is_empty() && self.predicates.is_empty()
    }
}

impl fmt::Debug for ComponentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentTable")
            .field("literal", &self.literal.len())
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Process-wide handler registry, built once per (re)load
#[derive(Debug, Default)]
pub struct Registry {
    commands: HashMap<String, Arc<CommandHandler>>,
    buttons: ComponentTable,
    modals: ComponentTable,
    menus: ComponentTable,
    triggers: HashMap<String, Arc<TriggerHandler>>,
    events: EventBus,
    counts: LoadCounts,
}

impl Registry {
    /// Look up a slash command by its literal name
    #[must_use]
    pub fn command(&self, name: &str) -> Option<&Arc<CommandHandler>> {
        self.commands.get(name)
    }

    /// The button table
    #[must_use]
    pub const fn buttons(&self) -> &ComponentTable {
        &self.buttons
    }

    /// The modal table
    #[must_use]
    pub const fn modals(&self) -> &ComponentTable {
        &self.modals
    }

    /// The menu table
    #[must_use]
    pub const fn menus(&self) -> &ComponentTable {
        &self.menus
    }

    /// Look up a message trigger by lower-cased name
    #[must_use]
    pub fn trigger(&self, name: &str) -> Option<&Arc<TriggerHandler>> {
        self.triggers.get(name)
    }

    /// The lifecycle event bus
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// Per-kind load counters
    #[must_use]
    pub const fn counts(&self) -> &LoadCounts {
        &self.counts
    }
}

/// Accumulates validated handlers into a new [`Registry`]
#[derive(Debug)]
pub struct RegistryBuilder {
    commands: HashMap<String, Arc<CommandHandler>>,
    buttons: ComponentTable,
    modals: ComponentTable,
    menus: ComponentTable,
    triggers: HashMap<String, Arc<TriggerHandler>>,
    lifecycle: Vec<Arc<LifecycleHandler>>,
    counts: LoadCounts,
    strict: bool,
}

impl RegistryBuilder {
    /// Create an empty builder
    ///
    /// In strict mode a duplicate literal key rejects the later candidate
    /// instead of silently overwriting the earlier one.
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self {
            commands: HashMap::new(),
            buttons: ComponentTable::default(),
            modals: ComponentTable::default(),
            menus: ComponentTable::default(),
            triggers: HashMap::new(),
            lifecycle: Vec::new(),
            counts: LoadCounts::default(),
            strict,
        }
    }

    /// Register a slash command under its literal name
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`Error::DuplicateKey`] when the name is
    /// already registered; the candidate is dropped.
    pub fn register_command(&mut self, handler: CommandHandler) -> Result<()> {
        let name = handler.name.clone();
        if self.strict && self.commands.contains_key(&name) {
            return Err(Error::DuplicateKey(name));
        }
        if let Some(prior) = self.commands.insert(name.clone(), Arc::new(handler)) {
            tracing::debug!(
                name = %name,
                prior = %prior.source.display(),
                "command overwritten by later registration"
            );
        }
        self.counts.commands += 1;
        Ok(())
    }

    /// Register a button, modal or menu handler
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`Error::DuplicateKey`] when a literal
    /// custom ID is already registered; the candidate is dropped.
    pub fn register_component(&mut self, kind: HandlerKind, handler: ComponentHandler) -> Result<()> {
        let table = match kind {
            HandlerKind::Button => &mut self.buttons,
            HandlerKind::Modal => &mut self.modals,
            HandlerKind::Menu => &mut self.menus,
            _ => return Err(Error::Handler(format!("{kind} is not a component kind"))),
        };

        if self.strict {
            if let Some(key) = handler.custom_id.literal() {
                if table.literal.contains_key(key) {
                    return Err(Error::DuplicateKey(key.to_string()));
                }
            }
        }

        let key = handler.key.clone();
        if let Some(prior) = table.insert(Arc::new(handler)) {
            tracing::debug!(
                key = %key,
                prior = %prior.source.display(),
                "component overwritten by later registration"
            );
        }

        match kind {
            HandlerKind::Button => self.counts.buttons += 1,
            HandlerKind::Modal => self.counts.modals += 1,
            HandlerKind::Menu => self.counts.menus += 1,
            _ => {}
        }
        Ok(())
    }

    /// Register a message trigger under its lower-cased name
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`Error::DuplicateKey`] when the name is
    /// already registered; the candidate is dropped.
    pub fn register_trigger(&mut self, handler: TriggerHandler) -> Result<()> {
        let key = handler.name.to_lowercase();
        if self.strict && self.triggers.contains_key(&key) {
            return Err(Error::DuplicateKey(key));
        }
        if let Some(prior) = self.triggers.insert(key.clone(), Arc::new(handler)) {
            tracing::debug!(
                name = %key,
                prior = %prior.source.display(),
                "message trigger overwritten by later registration"
            );
        }
        self.counts.triggers += 1;
        Ok(())
    }

    /// Bind a lifecycle handler
    pub fn register_lifecycle(&mut self, handler: LifecycleHandler) {
        self.lifecycle.push(Arc::new(handler));
        self.counts.events += 1;
    }

    /// Finish the build, producing an immutable registry
    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            commands: self.commands,
            buttons: self.buttons,
            modals: self.modals,
            menus: self.menus,
            triggers: self.triggers,
            events: EventBus::bind(self.lifecycle),
            counts: self.counts,
        }
    }
}
