//! Error types for piano-keys

use thiserror::Error;

/// Result type alias for piano-keys operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in piano-keys
///
/// The keyboard itself never fails; these cover configuration, the
/// terminal and the player thread.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Player engine error
    #[error("Player error: {0}")]
    Player(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}
