//! Engine error types.

use thiserror::Error;

/// Errors that can occur while talking to the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be started or configured.
    #[error("Failed to start engine: {0}")]
    Spawn(String),

    /// The engine rejected the input or failed internally.
    #[error("Engine call failed: {0}")]
    Call(String),

    /// The configuration could not be passed to the engine.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// The engine produced output that could not be decoded.
    #[error("Malformed engine output: {0}")]
    Output(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Creates a spawn error.
    pub fn spawn(message: impl Into<String>) -> Self {
        Self::Spawn(message.into())
    }

    /// Creates a call error.
    pub fn call(message: impl Into<String>) -> Self {
        Self::Call(message.into())
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
