//! Document model: notebooks and plain editor buffers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Code,
    Markdown,
    Raw,
}

/// A notebook cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub source: String,
}

impl Cell {
    pub fn new(kind: CellKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }

    /// Creates a code cell.
    pub fn code(source: impl Into<String>) -> Self {
        Self::new(CellKind::Code, source)
    }

    /// Creates a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellKind::Markdown, source)
    }

    /// Returns true for code cells, the only cells the formatter touches.
    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }
}

/// An open notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notebook {
    pub path: PathBuf,
    pub cells: Vec<Cell>,
}

impl Notebook {
    pub fn new(path: impl Into<PathBuf>, cells: Vec<Cell>) -> Self {
        Self {
            path: path.into(),
            cells,
        }
    }

    /// Indices of the code cells, in order.
    pub fn code_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_code())
            .map(|(index, _)| index)
    }
}

/// An open editor buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    pub path: PathBuf,
    pub text: String,
}

impl Buffer {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// Any document the host can format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    Notebook(Notebook),
    Buffer(Buffer),
}

impl Document {
    /// The document's storage path.
    pub fn path(&self) -> &Path {
        match self {
            Document::Notebook(notebook) => &notebook.path,
            Document::Buffer(buffer) => &buffer.path,
        }
    }

    pub fn as_notebook(&self) -> Option<&Notebook> {
        match self {
            Document::Notebook(notebook) => Some(notebook),
            Document::Buffer(_) => None,
        }
    }

    pub fn as_buffer(&self) -> Option<&Buffer> {
        match self {
            Document::Buffer(buffer) => Some(buffer),
            Document::Notebook(_) => None,
        }
    }
}

impl From<Notebook> for Document {
    fn from(notebook: Notebook) -> Self {
        Document::Notebook(notebook)
    }
}

impl From<Buffer> for Document {
    fn from(buffer: Buffer) -> Self {
        Document::Buffer(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_cells_skip_other_kinds() {
        let notebook = Notebook::new(
            "nb.ipynb",
            vec![
                Cell::markdown("# Title"),
                Cell::code("x = 1"),
                Cell::new(CellKind::Raw, "raw"),
                Cell::code("y = 2"),
            ],
        );

        assert_eq!(notebook.code_cells().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_document_path() {
        let document = Document::from(Buffer::new("src/a.py", ""));

        assert_eq!(document.path(), Path::new("src/a.py"));
        assert!(document.as_notebook().is_none());
        assert!(document.as_buffer().is_some());
    }
}
