//! Document lifecycle handlers (focus, execution, save).

use std::path::Path;

use tracing::debug;

use crate::HostError;
use crate::config::needs_reload;
use crate::document::Document;
use crate::formatter::Formatter;

/// Resolves configuration after a change of the active document.
///
/// The switch itself is recorded by the formatter before this
/// runs. Configuration is re-resolved only when the new document lives in
/// a different directory than the last resolution.
pub async fn handle_active_document_changed(
    formatter: &Formatter,
    path: &Path,
) -> Result<(), HostError> {
    if needs_reload(formatter.state(), path) {
        formatter.reload(path).await?;
    } else {
        debug!("Configuration already resolved for {}", path.display());
    }
    Ok(())
}

/// Handles a cell being scheduled for execution.
pub async fn handle_cell_execution_scheduled(
    formatter: &Formatter,
    path: &Path,
    cell: usize,
) -> Result<(), HostError> {
    if !formatter.state().settings().format_on_run {
        return Ok(());
    }
    formatter.format_cells(path, vec![cell], false).await?;
    Ok(())
}

/// Handles a document about to be saved.
pub async fn handle_save_started(formatter: &Formatter, path: &Path) -> Result<(), HostError> {
    if !formatter.state().settings().format_on_save {
        return Ok(());
    }

    match formatter.state().document(path) {
        Some(Document::Notebook(notebook)) => {
            let cells = notebook.code_cells().collect();
            formatter.format_cells(path, cells, false).await?;
        }
        Some(Document::Buffer(_)) => {
            formatter.format_buffer(path, false).await?;
        }
        None => return Err(HostError::UnknownDocument(path.to_path_buf())),
    }
    Ok(())
}
