//! Configuration management for Herald gateway
//!
//! Layered the usual way: defaults, then an optional TOML config file, then
//! environment variables. The bot token is env-only and never written to
//! disk by this crate.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use crate::{Error, Result};

/// Environment variable holding the bot token
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";

/// Default text-command prefix
const DEFAULT_PREFIX: &str = "!";

/// Herald gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token; absent only for offline commands
    pub token: Option<SecretString>,

    /// Base handler tree (contains `commands/`, `handlers/`, `events/`)
    pub base_dir: PathBuf,

    /// Extensions root; each immediate subdirectory is an extension
    pub extensions_dir: PathBuf,

    /// Prefix gating message triggers
    pub text_prefix: String,

    /// Reject duplicate literal keys instead of overwriting
    pub strict_registration: bool,
}

/// On-disk configuration file shape
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    base_dir: Option<PathBuf>,
    #[serde(default)]
    extensions_dir: Option<PathBuf>,
    #[serde(default)]
    text_prefix: Option<String>,
    #[serde(default)]
    strict_registration: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            base_dir: PathBuf::from("bot"),
            extensions_dir: PathBuf::from("extensions"),
            text_prefix: DEFAULT_PREFIX.to_string(),
            strict_registration: false,
        }
    }
}

impl Config {
    /// Load configuration from an optional file, then the environment
    ///
    /// A missing explicit file is an error; the default location is used
    /// only when it exists.
    ///
    /// # Errors
    ///
    /// Returns an error when an explicitly given file is absent or either
    /// file fails to read or parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env();
        Ok(config)
    }

    /// Parse a config file over the defaults
    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&text)?;
        let defaults = Self::default();

        Ok(Self {
            token: None,
            base_dir: file.base_dir.unwrap_or(defaults.base_dir),
            extensions_dir: file.extensions_dir.unwrap_or(defaults.extensions_dir),
            text_prefix: file.text_prefix.unwrap_or(defaults.text_prefix),
            strict_registration: file
                .strict_registration
                .unwrap_or(defaults.strict_registration),
        })
    }

    /// Overlay environment variables
    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                self.token = Some(SecretString::from(token));
            }
        }
        if let Ok(dir) = std::env::var("HERALD_BASE_DIR") {
            self.base_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("HERALD_EXTENSIONS_DIR") {
            self.extensions_dir = PathBuf::from(dir);
        }
        if let Ok(prefix) = std::env::var("HERALD_PREFIX") {
            if !prefix.is_empty() {
                self.text_prefix = prefix;
            }
        }
    }

    /// Default config file location (`~/.config/herald/herald.toml`)
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("herald").join("herald.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.text_prefix, "!");
        assert_eq!(config.base_dir, PathBuf::from("bot"));
        assert!(!config.strict_registration);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herald.toml");
        std::fs::write(
            &path,
            concat!(
                "base_dir = \"custom/bot\"\n",
                "text_prefix = \"?\"\n",
                "strict_registration = true\n",
            ),
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("custom/bot"));
        assert_eq!(config.text_prefix, "?");
        assert!(config.strict_registration);
        // Unset fields keep defaults
        assert_eq!(config.extensions_dir, PathBuf::from("extensions"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/herald.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herald.toml");
        std::fs::write(&path, "text_prefix = [oops").unwrap();
        assert!(Config::from_file(&path).is_err());
    }
}
