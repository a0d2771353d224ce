//! # nbruff_core
//!
//! Configuration resolution and edit application for nbruff.
//!
//! This crate provides:
//! - Discovery of the nearest Ruff configuration file and `extend` chains
//! - Layered TOML merging
//! - Include / exclude scope decisions per file
//! - Application of engine fixes to a text buffer
//! - A best-effort formatting pipeline
//!
//! ## Example
//!
//! ```rust,ignore
//! use nbruff_core::{FsStorage, format_source, isort_overrides, resolve_workspace};
//! use nbruff_engine::RuffCommandFactory;
//!
//! let storage = FsStorage::default();
//! let factory = RuffCommandFactory::default();
//! let path = Path::new("notebooks/analysis.ipynb");
//!
//! let workspace = resolve_workspace(&storage, path, None, &factory).await?;
//! let isort = resolve_workspace(&storage, path, Some(&isort_overrides()), &factory).await?;
//!
//! if workspace.should_format(path, true) {
//!     let formatted = format_source(&workspace, Some(&isort), "import sys\nimport os\n");
//! }
//! ```

mod error;
mod fixer;
mod format;
pub mod location;
pub mod locator;
pub mod merge;
pub mod scope;
pub mod storage;
mod workspace;

pub use error::CoreError;
pub use fixer::{FixerResult, apply_fixes, collect_fixes, fix_text};
pub use format::{format_source, format_text, isort_overrides};
pub use location::LocationIndex;
pub use locator::{CONFIG_FILENAMES, ResolvedConfig, resolve_config, resolve_workspace};
pub use merge::merge_tables;
pub use scope::{DEFAULT_EXCLUDE, DEFAULT_INCLUDE, PathMatcher};
pub use storage::{Content, Entry, FsStorage, MemoryStorage, Storage, StorageError};
pub use workspace::Workspace;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
