//! Per-kind validation and descriptor construction
//!
//! One total constructor per capability kind: raw manifest fields go in, a
//! typed handler descriptor or a kind-specific rejection comes out. A
//! rejected candidate is dropped with a warning by the pipeline and never
//! reaches a registry.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::{HandlerCatalog, HandlerImpl};
use crate::handlers::{
    CommandHandler, ComponentHandler, CustomId, HandlerKind, LifecycleHandler, TriggerHandler,
};
use crate::interaction::GatewayEventName;
use crate::loader::manifest::RawDescriptor;

/// Rejection reasons for a handler candidate
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is absent
    #[error("{kind} manifest {}: missing required field `{field}`", .path.display())]
    MissingField {
        /// Capability kind being validated
        kind: HandlerKind,
        /// Manifest path
        path: PathBuf,
        /// Name of the absent field
        field: &'static str,
    },

    /// Both `custom_id` and `custom_id_pattern` were given
    #[error(
        "{kind} manifest {}: `custom_id` and `custom_id_pattern` are mutually exclusive",
        .path.display()
    )]
    AmbiguousCustomId {
        /// Capability kind being validated
        kind: HandlerKind,
        /// Manifest path
        path: PathBuf,
    },

    /// `custom_id_pattern` is not a valid regular expression
    #[error("{kind} manifest {}: invalid custom_id_pattern: {source}", .path.display())]
    InvalidPattern {
        /// Capability kind being validated
        kind: HandlerKind,
        /// Manifest path
        path: PathBuf,
        /// Underlying regex error
        source: regex::Error,
    },

    /// `entry` names no catalog implementation
    #[error("{kind} manifest {}: entry `{entry}` is not in the catalog", .path.display())]
    UnknownEntry {
        /// Capability kind being validated
        kind: HandlerKind,
        /// Manifest path
        path: PathBuf,
        /// Entry key that failed to resolve
        entry: String,
    },

    /// `entry` resolves to an implementation of another kind
    #[error(
        "{kind} manifest {}: entry `{entry}` is registered as a {found} implementation",
        .path.display()
    )]
    EntryKindMismatch {
        /// Capability kind being validated
        kind: HandlerKind,
        /// Manifest path
        path: PathBuf,
        /// Entry key
        entry: String,
        /// Label of the implementation actually registered
        found: &'static str,
    },

    /// `event` is not a recognized gateway event
    #[error("{kind} manifest {}: unsupported event `{event}`", .path.display())]
    UnknownEvent {
        /// Capability kind being validated
        kind: HandlerKind,
        /// Manifest path
        path: PathBuf,
        /// Event name as written
        event: String,
    },
}

fn require<'a>(
    field: &'static str,
    value: Option<&'a str>,
    kind: HandlerKind,
    path: &Path,
) -> Result<&'a str, ValidationError> {
    value.ok_or_else(|| ValidationError::MissingField {
        kind,
        path: path.to_path_buf(),
        field,
    })
}

/// Build a slash command descriptor
///
/// # Errors
///
/// Rejects candidates missing `name` or `entry`, or whose entry does not
/// resolve to a command implementation.
pub fn command(
    raw: &RawDescriptor,
    path: &Path,
    catalog: &HandlerCatalog,
) -> Result<CommandHandler, ValidationError> {
    let kind = HandlerKind::Command;
    let name = require("name", raw.name.as_deref(), kind, path)?;
    let entry = require("entry", raw.entry.as_deref(), kind, path)?;

    match lookup(catalog, entry, kind, path)? {
        HandlerImpl::Command(exec) => Ok(CommandHandler {
            name: name.to_string(),
            description: raw.description.clone().unwrap_or_default(),
            source: path.to_path_buf(),
            exec: exec.clone(),
        }),
        other => Err(mismatch(kind, path, entry, other)),
    }
}

/// Build a button, modal or menu descriptor
///
/// The registry key is the literal custom ID, or the caller-supplied
/// path-derived surrogate for pattern identifiers.
///
/// # Errors
///
/// Rejects candidates missing an identifier or `entry`, carrying both
/// identifier forms, an invalid pattern, or a non-component entry.
pub fn component(
    kind: HandlerKind,
    raw: &RawDescriptor,
    path: &Path,
    surrogate: String,
    catalog: &HandlerCatalog,
) -> Result<ComponentHandler, ValidationError> {
    let (key, custom_id) = match (raw.custom_id.as_deref(), raw.custom_id_pattern.as_deref()) {
        (Some(_), Some(_)) => {
            return Err(ValidationError::AmbiguousCustomId {
                kind,
                path: path.to_path_buf(),
            });
        }
        (Some(literal), None) => (literal.to_string(), CustomId::Literal(literal.to_string())),
        (None, Some(pattern)) => {
            let re = regex::Regex::new(pattern).map_err(|source| {
                ValidationError::InvalidPattern {
                    kind,
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            (
                surrogate,
                CustomId::predicate(move |id| re.is_match(id)),
            )
        }
        (None, None) => {
            return Err(ValidationError::MissingField {
                kind,
                path: path.to_path_buf(),
                field: "custom_id",
            });
        }
    };

    let entry = require("entry", raw.entry.as_deref(), kind, path)?;
    match lookup(catalog, entry, kind, path)? {
        HandlerImpl::Component(exec) => Ok(ComponentHandler {
            key,
            custom_id,
            source: path.to_path_buf(),
            exec: exec.clone(),
        }),
        other => Err(mismatch(kind, path, entry, other)),
    }
}

/// Build a message trigger descriptor
///
/// # Errors
///
/// Rejects candidates missing `name`, `event` or `entry`, binding to an
/// event other than `messageCreate`, or with a non-trigger entry.
pub fn trigger(
    raw: &RawDescriptor,
    path: &Path,
    catalog: &HandlerCatalog,
) -> Result<TriggerHandler, ValidationError> {
    let kind = HandlerKind::MessageTrigger;
    let name = require("name", raw.name.as_deref(), kind, path)?;
    let event_name = require("event", raw.event.as_deref(), kind, path)?;

    let event = GatewayEventName::parse(event_name).ok_or_else(|| ValidationError::UnknownEvent {
        kind,
        path: path.to_path_buf(),
        event: event_name.to_string(),
    })?;
    if event != GatewayEventName::MessageCreate {
        return Err(ValidationError::UnknownEvent {
            kind,
            path: path.to_path_buf(),
            event: event_name.to_string(),
        });
    }

    let entry = require("entry", raw.entry.as_deref(), kind, path)?;
    match lookup(catalog, entry, kind, path)? {
        HandlerImpl::Trigger(exec) => Ok(TriggerHandler {
            name: name.to_string(),
            event,
            source: path.to_path_buf(),
            exec: exec.clone(),
        }),
        other => Err(mismatch(kind, path, entry, other)),
    }
}

/// Build a lifecycle event descriptor
///
/// # Errors
///
/// Rejects candidates missing `name` or `entry`, naming an unknown gateway
/// event, or with a non-lifecycle entry.
pub fn lifecycle(
    raw: &RawDescriptor,
    path: &Path,
    catalog: &HandlerCatalog,
) -> Result<LifecycleHandler, ValidationError> {
    let kind = HandlerKind::LifecycleEvent;
    let name = require("name", raw.name.as_deref(), kind, path)?;

    let event = GatewayEventName::parse(name).ok_or_else(|| ValidationError::UnknownEvent {
        kind,
        path: path.to_path_buf(),
        event: name.to_string(),
    })?;

    let entry = require("entry", raw.entry.as_deref(), kind, path)?;
    match lookup(catalog, entry, kind, path)? {
        HandlerImpl::Lifecycle(exec) => Ok(LifecycleHandler {
            event,
            once: raw.once.unwrap_or(false),
            source: path.to_path_buf(),
            exec: exec.clone(),
        }),
        other => Err(mismatch(kind, path, entry, other)),
    }
}

fn lookup<'a>(
    catalog: &'a HandlerCatalog,
    entry: &str,
    kind: HandlerKind,
    path: &Path,
) -> Result<&'a HandlerImpl, ValidationError> {
    catalog.get(entry).ok_or_else(|| ValidationError::UnknownEntry {
        kind,
        path: path.to_path_buf(),
        entry: entry.to_string(),
    })
}

fn mismatch(
    kind: HandlerKind,
    path: &Path,
    entry: &str,
    found: &HandlerImpl,
) -> ValidationError {
    ValidationError::EntryKindMismatch {
        kind,
        path: path.to_path_buf(),
        entry: entry.to_string(),
        found: found.label(),
    }
}
