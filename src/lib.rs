//! Herald Gateway - Discord bot host with manifest-driven handler dispatch
//!
//! This library provides the core functionality for the Herald bot host:
//! - Handler manifest discovery across a base tree and extension subtrees
//! - Typed validation and registration by capability kind
//! - Event dispatch with per-invocation error containment
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Discord Gateway                      │
//! │   slash commands │ components │ modals │ messages   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Herald Host                         │
//! │   Discovery  │  Loader  │  Registry  │  Dispatcher  │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │               Handler Catalog                        │
//! │   bundled + application-registered implementations   │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod builtin;
pub mod bus;
pub mod catalog;
pub mod channel;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod host;
pub mod interaction;
pub mod loader;
pub mod registry;
pub mod util;

pub use catalog::{HandlerCatalog, HandlerImpl};
pub use channel::DiscordGateway;
pub use config::Config;
pub use discovery::Walker;
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use handlers::{
    CommandExec, CommandHandler, ComponentExec, ComponentHandler, CustomId, HandlerKind,
    InteractionCtx, LifecycleExec, LifecycleHandler, MessageCtx, MessageExec, TriggerHandler,
};
pub use host::Host;
pub use interaction::{
    GatewayEventName, GatewayPayload, InboundEvent, InteractionEvent, MessageEvent, Notice,
    Responder,
};
pub use loader::build_registry;
pub use loader::registrar::ValidationError;
pub use registry::{ComponentTable, LoadCounts, Registry, RegistryBuilder};
