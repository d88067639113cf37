//! Handler manifest format
//!
//! A manifest is a small TOML file deployed under one of the well-known
//! sub-paths. Its descriptor fields may sit at the document root, inside a
//! `[handler]` table, or inside a table named after the capability keyword
//! (`[command]`, `[button]`, ...). The raw descriptor is permissive on
//! purpose; the registrar enforces the per-kind shape afterwards.

use serde::Deserialize;
use toml::Table;

use crate::handlers::HandlerKind;

/// Raw descriptor fields as they appear in a manifest
///
/// Every field is optional here; validation happens per kind in the
/// registrar. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDescriptor {
    /// Command/trigger name or lifecycle event name
    #[serde(default)]
    pub name: Option<String>,

    /// Short human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Literal component custom ID
    #[serde(default)]
    pub custom_id: Option<String>,

    /// Regular expression matched against incoming custom IDs
    #[serde(default)]
    pub custom_id_pattern: Option<String>,

    /// Gateway event name (message triggers)
    #[serde(default)]
    pub event: Option<String>,

    /// One-shot lifecycle binding
    #[serde(default)]
    pub once: Option<bool>,

    /// Catalog entry key naming the handler implementation
    #[serde(default)]
    pub entry: Option<String>,
}

/// Parse a manifest document and resolve its descriptor table
///
/// Resolution order mirrors module export lookup: a `[handler]` table's own
/// nested `handler` table, then the `[handler]` table itself, then the
/// kind-keyword table, then the document root.
///
/// # Errors
///
/// Returns a TOML error when the document does not parse or the resolved
/// table has fields of the wrong type.
pub fn parse_manifest(text: &str, kind: HandlerKind) -> Result<RawDescriptor, toml::de::Error> {
    let doc: Table = toml::from_str(text)?;
    resolve_export(&doc, kind).clone().try_into()
}

/// Pick the table holding the descriptor fields
fn resolve_export(doc: &Table, kind: HandlerKind) -> &Table {
    if let Some(toml::Value::Table(handler)) = doc.get("handler") {
        if let Some(toml::Value::Table(inner)) = handler.get("handler") {
            return inner;
        }
        return handler;
    }

    if let Some(toml::Value::Table(keyed)) = doc.get(kind.keyword()) {
        return keyed;
    }

    doc
}
