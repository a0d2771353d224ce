//! Host state management.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use nbruff_core::Workspace;

use crate::document::Document;
use crate::settings::Settings;

/// The workspaces used for formatting, resolved for one directory.
#[derive(Debug, Clone)]
pub struct ActiveWorkspaces {
    /// Directory the configuration was resolved for.
    pub directory: PathBuf,
    /// Workspace used by the formatter.
    pub format: Arc<Workspace>,
    /// Workspace used for import sorting.
    pub isort: Arc<Workspace>,
}

/// Shared host state.
///
/// Locks are held only for short synchronous sections and never across an
/// `.await`.
pub struct HostState {
    /// Open documents by path.
    pub documents: RwLock<HashMap<PathBuf, Document>>,
    /// Path of the document with focus.
    pub active_path: RwLock<Option<PathBuf>>,
    /// Index of the selected cell in the active notebook.
    pub active_cell: RwLock<Option<usize>>,
    /// Current settings.
    pub settings: RwLock<Settings>,
    /// Last completed configuration resolution.
    pub workspaces: RwLock<Option<ActiveWorkspaces>>,
}

impl fmt::Debug for HostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostState")
            .field("documents", &"<HashMap<PathBuf, Document>>")
            .field("active_path", &self.active_path.read())
            .field("active_cell", &self.active_cell.read())
            .field("settings", &self.settings.read())
            .field(
                "workspaces",
                &self.workspaces.read().as_ref().map(|ws| ws.directory.clone()),
            )
            .finish()
    }
}

impl HostState {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Creates a new state with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            active_path: RwLock::new(None),
            active_cell: RwLock::new(None),
            settings: RwLock::new(settings),
            workspaces: RwLock::new(None),
        }
    }

    /// Opens (or replaces) a document.
    pub fn open(&self, document: impl Into<Document>) {
        let document = document.into();
        self.documents
            .write()
            .insert(document.path().to_path_buf(), document);
    }

    /// Closes a document, returning its last contents.
    pub fn close(&self, path: &Path) -> Option<Document> {
        self.documents.write().remove(path)
    }

    /// A snapshot of the document at `path`.
    pub fn document(&self, path: &Path) -> Option<Document> {
        self.documents.read().get(path).cloned()
    }

    /// Selects a cell of the active notebook.
    pub fn select_cell(&self, cell: Option<usize>) {
        *self.active_cell.write() = cell;
    }

    /// Makes `path` the active document. No cell is selected afterwards.
    pub fn activate(&self, path: &Path) {
        *self.active_path.write() = Some(path.to_path_buf());
        self.select_cell(None);
    }

    pub fn active_path(&self) -> Option<PathBuf> {
        self.active_path.read().clone()
    }

    pub fn settings(&self) -> Settings {
        *self.settings.read()
    }

    /// The current workspaces, if any resolution has completed.
    pub fn active_workspaces(&self) -> Option<ActiveWorkspaces> {
        self.workspaces.read().clone()
    }

    /// Replaces the source of one cell if it still reads `expected`.
    ///
    /// Returns false when the cell is gone or was edited in the meantime.
    pub(crate) fn replace_cell_source(
        &self,
        path: &Path,
        cell: usize,
        expected: &str,
        source: String,
    ) -> bool {
        let mut documents = self.documents.write();
        let Some(Document::Notebook(notebook)) = documents.get_mut(path) else {
            return false;
        };
        match notebook.cells.get_mut(cell) {
            Some(target) if target.source == expected => {
                target.source = source;
                true
            }
            _ => false,
        }
    }

    /// Replaces the text of a buffer if it still reads `expected`.
    pub(crate) fn replace_buffer_text(&self, path: &Path, expected: &str, text: String) -> bool {
        let mut documents = self.documents.write();
        match documents.get_mut(path) {
            Some(Document::Buffer(buffer)) if buffer.text == expected => {
                buffer.text = text;
                true
            }
            _ => false,
        }
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<HostState>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Buffer, Cell, Notebook};

    #[test]
    fn test_activate_clears_selected_cell() {
        let state = HostState::new();
        state.select_cell(Some(2));

        state.activate(Path::new("nb/a.ipynb"));

        assert_eq!(state.active_path(), Some(PathBuf::from("nb/a.ipynb")));
        assert_eq!(*state.active_cell.read(), None);
    }

    #[test]
    fn test_open_and_close() {
        let state = HostState::new();
        state.open(Buffer::new("a.py", "x = 1"));

        assert!(state.document(Path::new("a.py")).is_some());
        assert!(state.close(Path::new("a.py")).is_some());
        assert!(state.document(Path::new("a.py")).is_none());
    }

    #[test]
    fn test_replace_cell_source() {
        let state = HostState::new();
        state.open(Notebook::new("nb.ipynb", vec![Cell::code("x=1")]));
        let path = Path::new("nb.ipynb");

        assert!(!state.replace_cell_source(path, 0, "edited", "x = 1".into()));
        assert!(state.replace_cell_source(path, 0, "x=1", "x = 1".into()));
        assert!(!state.replace_cell_source(path, 3, "", "y".into()));
        assert!(!state.replace_buffer_text(path, "x = 1", "y".into()));

        let document = state.document(path).unwrap();
        assert_eq!(document.as_notebook().unwrap().cells[0].source, "x = 1");
    }
}
