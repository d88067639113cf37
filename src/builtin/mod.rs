//! Bundled handler implementations
//!
//! These back the manifests shipped with the default bot tree. Real
//! deployments register their own implementations on the catalog before
//! constructing the host.

mod ping;
mod ready;
mod uptime;

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::HandlerCatalog;

pub use ping::PingCommand;
pub use ready::ReadyEvent;
pub use uptime::UptimeTrigger;

/// Catalog pre-populated with the bundled implementations
///
/// `started` anchors the uptime reports; pass the process start time.
#[must_use]
pub fn catalog(started: Instant) -> HandlerCatalog {
    let mut catalog = HandlerCatalog::new();
    catalog.register_command("builtin:ping", Arc::new(PingCommand::new(started)));
    catalog.register_trigger("builtin:uptime", Arc::new(UptimeTrigger::new(started)));
    catalog.register_lifecycle("builtin:ready", Arc::new(ReadyEvent));
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_entries_present() {
        let catalog = catalog(Instant::now());
        assert!(catalog.get("builtin:ping").is_some());
        assert!(catalog.get("builtin:uptime").is_some());
        assert!(catalog.get("builtin:ready").is_some());
    }
}
