//! Jupyter notebook (`.ipynb`) reading and writing.

use miette::{IntoDiagnostic, Result, miette};
use nbruff_host::{Cell, CellKind};
use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};

/// A notebook file, kept as raw JSON so unknown fields survive a rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookFile {
    json: Value,
}

impl NotebookFile {
    /// Parses notebook JSON.
    pub fn parse(text: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(text).into_diagnostic()?;
        if !json.get("cells").is_some_and(Value::is_array) {
            return Err(miette!("Not a notebook: missing `cells` array"));
        }
        Ok(Self { json })
    }

    /// The notebook's cells. Unknown cell types read as raw cells.
    pub fn cells(&self) -> Vec<Cell> {
        self.raw_cells()
            .iter()
            .map(|cell| {
                let kind = match cell.get("cell_type").and_then(Value::as_str) {
                    Some("code") => CellKind::Code,
                    Some("markdown") => CellKind::Markdown,
                    _ => CellKind::Raw,
                };
                Cell::new(kind, source_text(cell.get("source")))
            })
            .collect()
    }

    /// Replaces the source of cell `index`, keeping its string/list shape.
    pub fn set_source(&mut self, index: usize, source: &str) {
        let Some(cell) = self
            .json
            .get_mut("cells")
            .and_then(Value::as_array_mut)
            .and_then(|cells| cells.get_mut(index))
        else {
            return;
        };

        let as_lines = matches!(cell.get("source"), Some(Value::Array(_)));
        let value = if as_lines {
            Value::Array(
                source
                    .split_inclusive('\n')
                    .map(|line| Value::String(line.to_string()))
                    .collect(),
            )
        } else {
            Value::String(source.to_string())
        };

        if let Some(object) = cell.as_object_mut() {
            object.insert("source".to_string(), value);
        }
    }

    /// Serializes the notebook the way Jupyter writes it: one-space indent
    /// and a trailing line feed.
    pub fn to_json(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b" "));
        self.json.serialize(&mut serializer).into_diagnostic()?;

        let mut text = String::from_utf8(buffer).into_diagnostic()?;
        text.push('\n');
        Ok(text)
    }

    fn raw_cells(&self) -> &[Value] {
        self.json
            .get("cells")
            .and_then(Value::as_array)
            .map_or(&[], Vec::as_slice)
    }
}

/// Joins a `source` field, which may be a string or a list of lines.
fn source_text(source: Option<&Value>) -> String {
    match source {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

/// Rewrites every code cell of `text` with `transform`.
///
/// Returns `None` when no cell changed.
pub fn transform_notebook(
    text: &str,
    mut transform: impl FnMut(&str) -> String,
) -> Result<Option<String>> {
    let mut notebook = NotebookFile::parse(text)?;

    let mut changed = false;
    for (index, cell) in notebook.cells().into_iter().enumerate() {
        if !cell.is_code() {
            continue;
        }
        let formatted = transform(&cell.source);
        if formatted != cell.source {
            notebook.set_source(index, &formatted);
            changed = true;
        }
    }

    if changed {
        notebook.to_json().map(Some)
    } else {
        Ok(None)
    }
}
