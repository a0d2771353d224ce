//! Configuration discovery.
//!
//! Walks up from a document's directory to the nearest Ruff configuration
//! file, merges caller overrides on top, and follows `extend` chains.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use nbruff_engine::EngineFactory;
use toml::{Table, Value};
use tracing::{debug, info};

use crate::merge::merge_tables;
use crate::storage::Storage;
use crate::workspace::Workspace;
use crate::CoreError;

/// Recognized configuration file names, by priority within one directory.
pub const CONFIG_FILENAMES: [&str; 3] = [".ruff.toml", "ruff.toml", "pyproject.toml"];

const PYPROJECT: &str = "pyproject.toml";
const EXTEND_KEY: &str = "extend";

/// A resolved configuration tree and the files it came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedConfig {
    /// The merged configuration, with `extend` resolved away.
    pub config: Table,
    /// The configuration file found by the directory walk, if any.
    pub source: Option<PathBuf>,
    /// Files loaded through `extend`, in load order.
    pub extends: Vec<PathBuf>,
}

/// Resolves the configuration governing `path` and builds a workspace from it.
pub async fn resolve_workspace(
    storage: &dyn Storage,
    path: &Path,
    overrides: Option<&Table>,
    factory: &dyn EngineFactory,
) -> Result<Workspace, CoreError> {
    let resolved = resolve_config(storage, path, overrides).await?;
    Workspace::new(resolved.config, factory)
}

/// Resolves the configuration governing `path`.
///
/// Directory listings that fail are treated as empty. Once a file has
/// matched, failing to read or parse it (or anything it extends) is an
/// error. When no file is found up to the root, the result holds only the
/// overrides.
pub async fn resolve_config(
    storage: &dyn Storage,
    path: &Path,
    overrides: Option<&Table>,
) -> Result<ResolvedConfig, CoreError> {
    let empty = Table::new();
    let overrides = overrides.unwrap_or(&empty);

    let mut current = path;
    while let Some(directory) = current.parent() {
        if let Some((source, config)) = find_config_in(storage, directory).await? {
            info!("Found config file: {}", source.display());
            let config = merge_tables(&config, overrides);
            let (config, extends) = resolve_extends(storage, config, &source).await?;
            return Ok(ResolvedConfig {
                config,
                source: Some(source),
                extends,
            });
        }
        current = directory;
    }

    debug!("No config file found for {}", path.display());
    Ok(ResolvedConfig {
        config: overrides.clone(),
        ..Default::default()
    })
}

/// Looks for a configuration file directly inside `directory`.
async fn find_config_in(
    storage: &dyn Storage,
    directory: &Path,
) -> Result<Option<(PathBuf, Table)>, CoreError> {
    let listing = match storage.get(directory).await {
        Ok(entry) => entry.into_listing(),
        Err(e) => {
            debug!("Skipping {}: {}", directory.display(), e);
            return Ok(None);
        }
    };

    for filename in CONFIG_FILENAMES {
        let Some(file) = listing.iter().find(|entry| entry.name == filename) else {
            continue;
        };

        let config = load_table(storage, &file.path).await?;
        if filename == PYPROJECT {
            match ruff_section(config) {
                Some(section) => return Ok(Some((file.path.clone(), section))),
                None => debug!("No [tool.ruff] section in {}", file.path.display()),
            }
        } else {
            return Ok(Some((file.path.clone(), config)));
        }
    }

    Ok(None)
}

/// Follows `extend` until none is left, merging each child over its base.
async fn resolve_extends(
    storage: &dyn Storage,
    mut config: Table,
    source: &Path,
) -> Result<(Table, Vec<PathBuf>), CoreError> {
    let mut visited: HashSet<PathBuf> = HashSet::from([normalize_path(source)]);
    let mut extends = Vec::new();
    let mut base_dir = parent_dir(source);

    while let Some(target) = config.get(EXTEND_KEY).and_then(Value::as_str) {
        let base_path = normalize_path(&base_dir.join(target));
        if !visited.insert(base_path.clone()) {
            return Err(CoreError::ExtendCycle(base_path));
        }
        debug!("Extending {}", base_path.display());

        let parsed = load_table(storage, &base_path).await?;
        let base = if file_name_ends_with(&base_path, PYPROJECT) {
            ruff_section(parsed).unwrap_or_default()
        } else {
            parsed
        };

        config.remove(EXTEND_KEY);
        config = merge_tables(&base, &config);
        base_dir = parent_dir(&base_path);
        extends.push(base_path);
    }

    Ok((config, extends))
}

async fn load_table(storage: &dyn Storage, path: &Path) -> Result<Table, CoreError> {
    let text = storage.get(path).await?.into_text()?;
    toml::from_str(&text).map_err(|source| CoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Extracts `[tool.ruff]` from a pyproject-style tree.
///
/// Returns `None` when the section is absent or is not a table.
pub fn ruff_section(mut config: Table) -> Option<Table> {
    match config.remove("tool")? {
        Value::Table(mut tool) => match tool.remove("ruff")? {
            Value::Table(ruff) => Some(ruff),
            _ => None,
        },
        _ => None,
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn file_name_ends_with(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(suffix))
}

/// Lexically resolves `.` and `..` components.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
