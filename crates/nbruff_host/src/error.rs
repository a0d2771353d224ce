//! Host error types.

use std::path::PathBuf;

use thiserror::Error;

use nbruff_core::CoreError;

/// Errors raised while serving a host event.
///
/// Event handlers never surface these to the editor; they are logged where
/// the event is dispatched.
#[derive(Debug, Error)]
pub enum HostError {
    /// Configuration could not be resolved.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No document is active.
    #[error("No active document")]
    NoActiveDocument,

    /// The document is not open in the host.
    #[error("Document not open: {}", .0.display())]
    UnknownDocument(PathBuf),

    /// The document is not of the kind the operation needs.
    #[error("{operation} is not available for {}", path.display())]
    WrongDocumentKind {
        operation: &'static str,
        path: PathBuf,
    },

    /// Settings could not be loaded or saved.
    #[error("Settings error: {0}")]
    Settings(String),

    /// A formatting task panicked or was cancelled.
    #[error("Formatting task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl HostError {
    /// Creates a settings error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings(message.into())
    }
}
