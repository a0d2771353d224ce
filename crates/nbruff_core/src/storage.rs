//! Storage seam for configuration lookup.
//!
//! The locator never touches the filesystem directly. It asks a [`Storage`]
//! for directory listings and file contents, keyed by path, so the same
//! resolution runs against a real disk or an editor's document store.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Nothing exists at the path.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path exists but is not a text file.
    #[error("Not a text file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The backend failed while reading the path.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The payload of an [`Entry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// File contents.
    Text(String),
    /// Directory listing.
    Directory(Vec<Entry>),
    /// Not loaded (entries inside a listing).
    None,
}

/// A file or directory returned by [`Storage::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Final path component.
    pub name: String,
    /// Full path, usable as a key for [`Storage::get`].
    pub path: PathBuf,
    /// Contents or listing.
    pub content: Content,
}

impl Entry {
    /// Creates an entry whose content was not loaded.
    pub fn unloaded(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path),
            path,
            content: Content::None,
        }
    }

    /// Returns the text of a file entry.
    pub fn into_text(self) -> Result<String, StorageError> {
        match self.content {
            Content::Text(text) => Ok(text),
            _ => Err(StorageError::NotAFile(self.path)),
        }
    }

    /// Returns the children of a directory entry (empty for anything else).
    pub fn into_listing(self) -> Vec<Entry> {
        match self.content {
            Content::Directory(entries) => entries,
            _ => Vec::new(),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// An async key-value store of files and directories keyed by path.
///
/// `get` on a file returns its text; `get` on a directory returns its
/// immediate children with [`Content::None`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetches the entry at `path`.
    async fn get(&self, path: &Path) -> Result<Entry, StorageError>;
}

/// Storage backed by the local filesystem.
///
/// Relative paths, including the empty path, are resolved against `root`.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates a storage rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.as_os_str().is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for FsStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn get(&self, path: &Path) -> Result<Entry, StorageError> {
        let resolved = self.resolve(path);
        let io_error = |source: io::Error| {
            if source.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(path.to_path_buf())
            } else {
                StorageError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        };

        let metadata = tokio::fs::metadata(&resolved).await.map_err(io_error)?;

        let content = if metadata.is_dir() {
            let mut entries = Vec::new();
            let mut reader = tokio::fs::read_dir(&resolved).await.map_err(io_error)?;
            while let Some(child) = reader.next_entry().await.map_err(io_error)? {
                entries.push(Entry::unloaded(path.join(child.file_name())));
            }
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            Content::Directory(entries)
        } else {
            Content::Text(tokio::fs::read_to_string(&resolved).await.map_err(io_error)?)
        };

        Ok(Entry {
            name: file_name(path),
            path: path.to_path_buf(),
            content,
        })
    }
}

/// In-memory storage of text files.
///
/// Directories exist implicitly whenever a file lives beneath them; the
/// empty path is the root and always exists.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<BTreeMap<PathBuf, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, returning `self` for chaining.
    pub fn with_file(self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.write().insert(path.into(), text.into());
    }

    /// Removes a file, returning its text.
    pub fn remove(&self, path: &Path) -> Option<String> {
        self.files.write().remove(path)
    }

    fn list(&self, directory: &Path) -> Option<Vec<Entry>> {
        let files = self.files.read();
        let mut children: BTreeMap<String, Entry> = BTreeMap::new();

        for key in files.keys() {
            let Ok(rest) = key.strip_prefix(directory) else {
                continue;
            };
            let Some(first) = rest.components().next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            children
                .entry(name)
                .or_insert_with(|| Entry::unloaded(directory.join(first)));
        }

        if children.is_empty() && !directory.as_os_str().is_empty() {
            return None;
        }
        Some(children.into_values().collect())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, path: &Path) -> Result<Entry, StorageError> {
        if let Some(text) = self.files.read().get(path) {
            return Ok(Entry {
                name: file_name(path),
                path: path.to_path_buf(),
                content: Content::Text(text.clone()),
            });
        }

        let entries = self
            .list(path)
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))?;
        Ok(Entry {
            name: file_name(path),
            path: path.to_path_buf(),
            content: Content::Directory(entries),
        })
    }
}
