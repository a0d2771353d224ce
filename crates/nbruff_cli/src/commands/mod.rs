//! Subcommand implementations.

mod check;
mod config;
mod format;

pub use check::run_check;
pub use config::run_config;
pub use format::run_format;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{IntoDiagnostic, Result};
use nbruff_core::{FsStorage, Workspace, isort_overrides, merge_tables, resolve_workspace};
use nbruff_engine::RuffCommandFactory;
use nbruff_host::{Settings, SettingsStore};
use toml::Table;
use tracing::{debug, error, info};

use crate::cli::Cli;
use crate::notebook::transform_notebook;
use crate::overrides::parse_overrides;
use crate::settings::TomlSettings;
use crate::walk::{SourceKind, Target, collect_targets};

/// Workspaces resolved for one directory.
#[derive(Debug, Clone)]
struct Resolved {
    format: Arc<Workspace>,
    isort: Arc<Workspace>,
}

/// State shared by the files of one invocation.
struct Session {
    storage: FsStorage,
    factory: RuffCommandFactory,
    overrides: Table,
    resolved: HashMap<PathBuf, Resolved>,
}

impl Session {
    fn new(cli: &Cli) -> Result<Self> {
        Ok(Self {
            storage: FsStorage::default(),
            factory: RuffCommandFactory::new(&cli.ruff),
            overrides: parse_overrides(&cli.overrides)?,
            resolved: HashMap::new(),
        })
    }

    /// Resolves (once per directory) the workspaces governing `path`.
    async fn workspaces(&mut self, path: &Path) -> Result<Resolved> {
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        if let Some(resolved) = self.resolved.get(&directory) {
            return Ok(resolved.clone());
        }

        let format = resolve_workspace(&self.storage, path, Some(&self.overrides), &self.factory)
            .await
            .into_diagnostic()?;
        let isort_overrides = merge_tables(&self.overrides, &isort_overrides());
        let isort = resolve_workspace(&self.storage, path, Some(&isort_overrides), &self.factory)
            .await
            .into_diagnostic()?;

        let resolved = Resolved {
            format: Arc::new(format),
            isort: Arc::new(isort),
        };
        self.resolved.insert(directory, resolved.clone());
        Ok(resolved)
    }
}

/// Loads settings from `--settings`, or the defaults.
async fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.settings {
        Some(path) => TomlSettings::new(path).load().await.into_diagnostic(),
        None => Ok(Settings::default()),
    }
}

/// Outcome of one invocation over many files.
#[derive(Debug, Default)]
struct Summary {
    changed: Vec<PathBuf>,
    unchanged: usize,
    skipped: usize,
    failures: Vec<(PathBuf, String)>,
}

/// Runs `transform` over every in-scope target and writes the results
/// (or, under `check`, only reports them).
///
/// `transform` receives the workspaces for the file, one source text (a
/// whole Python file or one notebook code cell) and the kind of file it
/// came from, and returns the new text.
async fn process<F>(cli: &Cli, paths: &[PathBuf], check: bool, transform: F) -> Result<Summary>
where
    F: Fn(&Resolved, &str, SourceKind) -> String,
{
    let mut session = Session::new(cli)?;
    let mut summary = Summary::default();

    for Target { path, explicit } in collect_targets(paths)? {
        let resolved = session.workspaces(&path).await?;
        if !resolved.format.should_format(&path, explicit) {
            debug!("Excluded: {}", path.display());
            summary.skipped += 1;
            continue;
        }
        let Some(kind) = SourceKind::from_path(&path) else {
            if explicit {
                info!("Skipping unsupported file: {}", path.display());
            }
            summary.skipped += 1;
            continue;
        };

        match process_file(&path, kind, |source| transform(&resolved, source, kind)) {
            Ok(None) => summary.unchanged += 1,
            Ok(Some(output)) => {
                if !check {
                    if let Err(e) = std::fs::write(&path, output) {
                        error!("Failed to write {}: {}", path.display(), e);
                        summary.failures.push((path, e.to_string()));
                        continue;
                    }
                }
                summary.changed.push(path);
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                summary.failures.push((path, e.to_string()));
            }
        }
    }

    Ok(summary)
}

/// Applies `transform` to a file. Returns the new contents if they differ.
fn process_file(
    path: &Path,
    kind: SourceKind,
    transform: impl Fn(&str) -> String,
) -> Result<Option<String>> {
    let text = std::fs::read_to_string(path).into_diagnostic()?;

    match kind {
        SourceKind::Notebook => transform_notebook(&text, transform),
        SourceKind::Python => {
            let output = transform(&text);
            Ok((output != text).then_some(output))
        }
    }
}

/// Prints the summary, naming changed files as "Would {verb}" under `check`
/// and "{done}" otherwise. Returns true if the exit code should signal
/// changes or failures.
fn report(summary: &Summary, check: bool, verb: &str, done: &str) -> bool {
    for path in &summary.changed {
        if check {
            println!("Would {}: {}", verb, path.display());
        } else {
            println!("{}: {}", done, path.display());
        }
    }

    if !summary.failures.is_empty() {
        eprintln!("\n{} file(s) failed:", summary.failures.len());
        for (path, error) in &summary.failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    debug!("{} file(s) skipped", summary.skipped);
    let action = if check { "would be changed" } else { "changed" };
    println!(
        "{} file(s) {}, {} file(s) left unchanged",
        summary.changed.len(),
        action,
        summary.unchanged
    );

    (check && !summary.changed.is_empty()) || !summary.failures.is_empty()
}
