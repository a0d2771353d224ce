//! Command handlers.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::HostError;
use crate::events::Command;
use crate::formatter::Formatter;
use crate::settings::Setting;

/// Runs a user command.
pub async fn handle_command(formatter: &Formatter, command: Command) -> Result<(), HostError> {
    match command {
        Command::FormatCell => format_cell(formatter).await,
        Command::FormatAllCells => format_all_cells(formatter).await,
        Command::FormatEditor => {
            let path = active_path(formatter)?;
            formatter.format_buffer(&path, true).await?;
            Ok(())
        }
        Command::ToggleFormatOnRun => toggle(formatter, Setting::FormatOnRun).await,
        Command::ToggleFormatOnSave => toggle(formatter, Setting::FormatOnSave).await,
        Command::ToggleSortImports => toggle(formatter, Setting::SortImports).await,
        Command::ReloadConfiguration => {
            let path = active_path(formatter)?;
            formatter.reload(&path).await
        }
    }
}

fn active_path(formatter: &Formatter) -> Result<PathBuf, HostError> {
    formatter
        .state()
        .active_path()
        .ok_or(HostError::NoActiveDocument)
}

async fn format_cell(formatter: &Formatter) -> Result<(), HostError> {
    let path = active_path(formatter)?;
    let selected = *formatter.state().active_cell.read();
    let Some(cell) = selected else {
        debug!("No cell selected in {}", path.display());
        return Ok(());
    };
    formatter.format_cells(&path, vec![cell], true).await?;
    Ok(())
}

async fn format_all_cells(formatter: &Formatter) -> Result<(), HostError> {
    let path = active_path(formatter)?;
    let document = formatter
        .state()
        .document(&path)
        .ok_or_else(|| HostError::UnknownDocument(path.clone()))?;
    let Some(notebook) = document.as_notebook() else {
        return Err(HostError::WrongDocumentKind {
            operation: "Formatting all cells",
            path,
        });
    };

    let cells = notebook.code_cells().collect();
    formatter.format_cells(&path, cells, true).await?;
    Ok(())
}

async fn toggle(formatter: &Formatter, setting: Setting) -> Result<(), HostError> {
    let (value, settings) = {
        let mut settings = formatter.state().settings.write();
        let value = settings.toggle(setting);
        (value, *settings)
    };

    formatter.settings_store().save(&settings).await?;
    info!("{} = {}", setting.key(), value);
    Ok(())
}
