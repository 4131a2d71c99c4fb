//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A section or field is missing, non-numeric, or malformed.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
