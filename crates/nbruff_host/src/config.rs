//! Configuration management for the host.

use std::path::Path;
use std::sync::Arc;

use nbruff_core::{Storage, isort_overrides, merge_tables, resolve_workspace};
use nbruff_engine::EngineFactory;
use toml::Table;
use tracing::info;

use crate::HostError;
use crate::state::{ActiveWorkspaces, HostState};

/// Resolves both workspaces for the document at `path` and installs them.
///
/// The previous workspaces stay in place until both resolutions succeed;
/// on failure they are left untouched. Concurrent resolutions are
/// last-write-wins.
pub async fn reload_config(
    state: &HostState,
    storage: &dyn Storage,
    factory: &dyn EngineFactory,
    overrides: &Table,
    path: &Path,
) -> Result<(), HostError> {
    let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let format = resolve_workspace(storage, path, Some(overrides), factory).await?;
    let isort_overrides = merge_tables(overrides, &isort_overrides());
    let isort = resolve_workspace(storage, path, Some(&isort_overrides), factory).await?;

    info!("Configuration resolved for {}", directory.display());
    *state.workspaces.write() = Some(ActiveWorkspaces {
        directory,
        format: Arc::new(format),
        isort: Arc::new(isort),
    });
    Ok(())
}

/// Returns true when `path` lives outside the directory last resolved for.
pub fn needs_reload(state: &HostState, path: &Path) -> bool {
    let directory = path.parent().unwrap_or(Path::new(""));
    state
        .workspaces
        .read()
        .as_ref()
        .is_none_or(|active| active.directory != directory)
}
