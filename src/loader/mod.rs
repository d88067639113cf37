//! Loading pipeline: discovery → manifest parse → validation → registration
//!
//! Loading is sequential and ordered so registration order (load-bearing
//! for predicate matching) is reproducible across runs. Every failure is
//! contained to its candidate: a bad manifest contributes zero handlers and
//! never aborts its siblings.

pub mod manifest;
pub mod registrar;

use std::path::Path;

use crate::Result;
use crate::catalog::HandlerCatalog;
use crate::discovery::Walker;
use crate::handlers::HandlerKind;
use crate::registry::{Registry, RegistryBuilder};

use self::manifest::RawDescriptor;

/// Build a complete registry from the configured handler trees
///
/// Reads every manifest fresh from disk: there is no module cache, so a
/// rebuild always observes current on-disk content.
#[must_use]
pub fn build_registry(walker: &Walker, catalog: &HandlerCatalog, strict: bool) -> Registry {
    let mut builder = RegistryBuilder::new(strict);

    for kind in HandlerKind::LOAD_ORDER {
        for path in walker.discover(kind) {
            load_candidate(kind, &path, walker, catalog, &mut builder);
        }
    }

    builder.build()
}

/// Load one manifest and register it, containing any failure
fn load_candidate(
    kind: HandlerKind,
    path: &Path,
    walker: &Walker,
    catalog: &HandlerCatalog,
    builder: &mut RegistryBuilder,
) {
    let raw = match read_manifest(path, kind) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "failed to load handler manifest"
            );
            return;
        }
    };

    let registered = match kind {
        HandlerKind::Command => registrar::command(&raw, path, catalog)
            .map_err(|e| tracing::warn!("{e}"))
            .map(|handler| builder.register_command(handler)),
        HandlerKind::Button | HandlerKind::Modal | HandlerKind::Menu => {
            registrar::component(kind, &raw, path, walker.surrogate_key(path), catalog)
                .map_err(|e| tracing::warn!("{e}"))
                .map(|handler| builder.register_component(kind, handler))
        }
        HandlerKind::MessageTrigger => registrar::trigger(&raw, path, catalog)
            .map_err(|e| tracing::warn!("{e}"))
            .map(|handler| builder.register_trigger(handler)),
        HandlerKind::LifecycleEvent => registrar::lifecycle(&raw, path, catalog)
            .map_err(|e| tracing::warn!("{e}"))
            .map(|handler| {
                builder.register_lifecycle(handler);
                Ok::<(), crate::Error>(())
            }),
    };

    match registered {
        Ok(Ok(())) => {
            tracing::debug!(path = %path.display(), kind = %kind, "handler registered");
        }
        Ok(Err(e)) => {
            // Strict-mode duplicate rejection
            tracing::error!(path = %path.display(), error = %e, "handler registration rejected");
        }
        Err(()) => {
            // Validation failure already logged with field and path
        }
    }
}

/// Read and parse a single manifest, bypassing any cache
fn read_manifest(path: &Path, kind: HandlerKind) -> Result<RawDescriptor> {
    let text = std::fs::read_to_string(path)?;
    Ok(manifest::parse_manifest(&text, kind)?)
}
