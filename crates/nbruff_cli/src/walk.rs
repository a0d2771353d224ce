//! Collects the files named on the command line.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result};
use tracing::{debug, warn};

/// A file to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// True when the user named this file directly.
    pub explicit: bool,
}

/// How a file's contents are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Python,
    Notebook,
}

impl SourceKind {
    /// Classifies a file by extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "py" | "pyi" | "pyw" => Some(SourceKind::Python),
            "ipynb" => Some(SourceKind::Notebook),
            _ => None,
        }
    }
}

/// Expands `paths` into targets.
///
/// Files are explicit. Directories are walked with `.gitignore` support;
/// files found that way are not explicit, so the configured include and
/// exclude globs decide whether they are processed.
pub fn collect_targets(paths: &[PathBuf]) -> Result<Vec<Target>> {
    let mut targets = Vec::new();

    for path in paths {
        let path = std::path::absolute(path).into_diagnostic()?;
        if path.is_dir() {
            walk_directory(&path, &mut targets);
        } else if path.exists() {
            targets.push(Target {
                path,
                explicit: true,
            });
        } else {
            warn!("No such file or directory: {}", path.display());
        }
    }

    targets.sort_by(|a, b| a.path.cmp(&b.path));
    targets.dedup_by(|a, b| {
        let duplicate = a.path == b.path;
        if duplicate {
            b.explicit |= a.explicit;
        }
        duplicate
    });
    Ok(targets)
}

fn walk_directory(root: &Path, targets: &mut Vec<Target>) {
    for entry in WalkBuilder::new(root).hidden(false).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Error walking {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.file_type().is_some_and(|kind| kind.is_file()) {
            debug!("Found {}", entry.path().display());
            targets.push(Target {
                path: entry.into_path(),
                explicit: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case::python("a.py", Some(SourceKind::Python))]
    #[case::stub("a.pyi", Some(SourceKind::Python))]
    #[case::windowed("a.pyw", Some(SourceKind::Python))]
    #[case::notebook("nb/a.ipynb", Some(SourceKind::Notebook))]
    #[case::text("notes.txt", None)]
    #[case::no_extension("Makefile", None)]
    fn test_source_kind(#[case] path: &str, #[case] expected: Option<SourceKind>) {
        assert_eq!(SourceKind::from_path(Path::new(path)), expected);
    }

    #[test]
    fn test_files_are_explicit_walked_files_are_not() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("pkg")).unwrap();
        fs::write(root.join("pkg/a.py"), "").unwrap();
        fs::write(root.join("b.py"), "").unwrap();

        let targets = collect_targets(&[root.join("b.py"), root.clone()]).unwrap();

        assert_eq!(
            targets,
            vec![
                Target {
                    path: root.join("b.py"),
                    explicit: true,
                },
                Target {
                    path: root.join("pkg/a.py"),
                    explicit: false,
                },
            ]
        );
    }

    #[test]
    fn test_missing_path_is_skipped() {
        let temp_dir = TempDir::new().unwrap();

        let targets = collect_targets(&[temp_dir.path().join("missing.py")]).unwrap();

        assert!(targets.is_empty());
    }
}
