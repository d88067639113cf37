//! Manifest discovery — scan the base tree and extension subtrees
//!
//! Each capability kind owns a well-known sub-path. The walker visits the
//! base tree's sub-path first, then the same sub-path inside every
//! immediate subdirectory of the extensions root, in lexical order.
//! Traversal order is load-bearing: it fixes predicate registration order,
//! so directory entries are always visited sorted by file name.

use std::path::{Path, PathBuf};

use crate::handlers::HandlerKind;

/// File extension recognized as a handler manifest
pub const MANIFEST_EXTENSION: &str = "toml";

/// Discovers handler manifests under a base tree and extension subtrees
#[derive(Debug, Clone)]
pub struct Walker {
    base_dir: PathBuf,
    extensions_dir: PathBuf,
}

impl Walker {
    /// Create a walker over the given base and extensions directories
    #[must_use]
    pub const fn new(base_dir: PathBuf, extensions_dir: PathBuf) -> Self {
        Self {
            base_dir,
            extensions_dir,
        }
    }

    /// Roots searched for a kind: base sub-path, then per-extension sub-paths
    ///
    /// The base sub-path is always returned (the caller warns when it is
    /// missing); extension sub-paths are filtered to those that exist, since
    /// each extension contributes sub-paths optionally.
    #[must_use]
    pub fn roots(&self, kind: HandlerKind) -> Vec<PathBuf> {
        let mut roots = vec![self.base_dir.join(kind.sub_path())];

        for extension in self.extension_dirs() {
            let root = extension.join(kind.sub_path());
            if root.is_dir() {
                roots.push(root);
            } else {
                tracing::debug!(
                    path = %root.display(),
                    "extension does not provide this sub-path, skipping"
                );
            }
        }

        roots
    }

    /// Immediate subdirectories of the extensions root, in lexical order
    fn extension_dirs(&self) -> Vec<PathBuf> {
        if !self.extensions_dir.is_dir() {
            tracing::warn!(
                path = %self.extensions_dir.display(),
                "extensions directory does not exist, skipping"
            );
            return Vec::new();
        }

        let Ok(entries) = std::fs::read_dir(&self.extensions_dir) else {
            tracing::warn!(
                path = %self.extensions_dir.display(),
                "failed to read extensions directory"
            );
            return Vec::new();
        };

        let mut dirs: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        dirs
    }

    /// Ordered manifest paths for one capability kind
    ///
    /// A missing root is skipped with a warning; unreadable directories are
    /// skipped with a warning. Nested directories are recursed into at
    /// their lexical position among sibling entries.
    #[must_use]
    pub fn discover(&self, kind: HandlerKind) -> Vec<PathBuf> {
        let mut manifests = Vec::new();

        for root in self.roots(kind) {
            if !root.is_dir() {
                tracing::warn!(path = %root.display(), "handler path does not exist, skipping");
                continue;
            }
            walk_dir(&root, &mut manifests);
        }

        manifests
    }

    /// Derive the deterministic surrogate key for a manifest path
    ///
    /// The key is the path relative to the extensions root (or the base
    /// tree, for base handlers), with `/` separators. Stable for the
    /// lifetime of the process: it depends only on the on-disk layout.
    #[must_use]
    pub fn surrogate_key(&self, path: &Path) -> String {
        let relative = path
            .strip_prefix(&self.extensions_dir)
            .or_else(|_| path.strip_prefix(&self.base_dir))
            .unwrap_or(path);

        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Collect manifests under `dir`, recursing in lexical entry order
fn walk_dir(dir: &Path, manifests: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        tracing::warn!(path = %dir.display(), "failed to read handler directory, skipping");
        return;
    };

    let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            walk_dir(&path, manifests);
        } else if path
            .extension()
            .is_some_and(|ext| ext == MANIFEST_EXTENSION)
        {
            manifests.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "name = \"x\"\n").unwrap();
    }

    #[test]
    fn discover_missing_tree_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let walker = Walker::new(dir.path().join("bot"), dir.path().join("extensions"));
        assert!(walker.discover(HandlerKind::Command).is_empty());
    }

    #[test]
    fn base_tree_before_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("bot");
        let extensions = dir.path().join("extensions");

        touch(&base.join("commands/slash/ping.toml"));
        touch(&extensions.join("ext1/commands/slash/foo.toml"));

        let walker = Walker::new(base.clone(), extensions);
        let found = walker.discover(HandlerKind::Command);

        assert_eq!(found.len(), 2);
        assert!(found[0].starts_with(&base));
        assert!(found[1].ends_with("ext1/commands/slash/foo.toml"));
    }

    #[test]
    fn extensions_visited_in_lexical_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("bot");
        let extensions = dir.path().join("extensions");

        touch(&extensions.join("zeta/events/late.toml"));
        touch(&extensions.join("alpha/events/early.toml"));

        let walker = Walker::new(base, extensions);
        let found = walker.discover(HandlerKind::LifecycleEvent);

        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("alpha/events/early.toml"));
        assert!(found[1].ends_with("zeta/events/late.toml"));
    }

    #[test]
    fn entries_sorted_and_nested_dirs_recursed() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("bot");

        touch(&base.join("handlers/buttons/b.toml"));
        touch(&base.join("handlers/buttons/a/nested.toml"));
        touch(&base.join("handlers/buttons/c.toml"));
        // Unrecognized extensions are ignored
        fs::write(base.join("handlers/buttons/readme.md"), "notes").unwrap();

        let walker = Walker::new(base, dir.path().join("extensions"));
        let found = walker.discover(HandlerKind::Button);

        assert_eq!(found.len(), 3);
        assert!(found[0].ends_with("a/nested.toml"));
        assert!(found[1].ends_with("b.toml"));
        assert!(found[2].ends_with("c.toml"));
    }

    #[test]
    fn surrogate_key_is_relative_and_slash_separated() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("bot");
        let extensions = dir.path().join("extensions");
        let walker = Walker::new(base.clone(), extensions.clone());

        let ext_path = extensions.join("ext1/handlers/buttons/confirm.toml");
        assert_eq!(
            walker.surrogate_key(&ext_path),
            "ext1/handlers/buttons/confirm.toml"
        );

        let base_path = base.join("events/ready.toml");
        assert_eq!(walker.surrogate_key(&base_path), "events/ready.toml");
    }
}
