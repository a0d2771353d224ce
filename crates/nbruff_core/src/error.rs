//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that can occur while resolving configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configuration file could not be parsed.
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An `extend` chain leads back to a file already loaded.
    #[error("Cyclic `extend` chain through {}", .0.display())]
    ExtendCycle(PathBuf),

    /// Storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Engine error.
    #[error("Engine error: {0}")]
    Engine(#[from] nbruff_engine::EngineError),
}

impl CoreError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
