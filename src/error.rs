//! Error types for Herald gateway

use thiserror::Error;

/// Result type alias for Herald operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Herald gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Channel error (gateway connection, outbound replies)
    #[error("channel error: {0}")]
    Channel(String),

    /// Handler execution error
    #[error("handler error: {0}")]
    Handler(String),

    /// Duplicate registration rejected in strict mode
    #[error("duplicate registration for key `{0}`")]
    DuplicateKey(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
