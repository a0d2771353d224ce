//! Best-effort formatting pipeline.

use toml::{Table, Value};
use tracing::debug;

use crate::fixer::fix_text;
use crate::workspace::Workspace;

/// Formats `source` with the workspace's engine.
///
/// Trailing whitespace is trimmed from the result so a single-cell source
/// does not grow a final line feed. When the engine fails (typically a
/// syntax error in the cell), `source` is returned unchanged.
pub fn format_text(workspace: &Workspace, source: &str) -> String {
    match workspace.engine().format(source) {
        Ok(formatted) => formatted.trim_end().to_string(),
        Err(e) => {
            debug!("Format failed, leaving source untouched: {}", e);
            source.to_string()
        }
    }
}

/// Sorts imports with `isort` (when given) and then formats.
pub fn format_source(workspace: &Workspace, isort: Option<&Workspace>, source: &str) -> String {
    match isort {
        Some(isort) => format_text(workspace, &fix_text(isort, source)),
        None => format_text(workspace, source),
    }
}

/// Overrides that turn a workspace into an import sorter.
///
/// Only the rule selection is replaced; `lint.isort` settings from the
/// user's configuration still apply.
pub fn isort_overrides() -> Table {
    let mut lint = Table::new();
    lint.insert(
        "select".to_string(),
        Value::Array(vec![Value::String("I".to_string())]),
    );

    let mut overrides = Table::new();
    overrides.insert("lint".to_string(), Value::Table(lint));
    overrides
}
