//! Glob matching with containment semantics.

use std::path::Path;

use globset::{Glob, GlobBuilder};
use regex::bytes::RegexSet;

use crate::CoreError;

/// Include globs used when the configuration sets no `include`.
pub const DEFAULT_INCLUDE: [&str; 5] = ["*.py", "*.pyi", "*.pyw", "*.ipynb", "**/pyproject.toml"];

/// Exclude globs used when the configuration sets no `exclude`.
pub const DEFAULT_EXCLUDE: [&str; 20] = [
    ".bzr",
    ".direnv",
    ".eggs",
    ".git",
    ".git-rewrite",
    ".hg",
    ".mypy_cache",
    ".nox",
    ".pants.d",
    ".pytype",
    ".ruff_cache",
    ".svn",
    ".tox",
    ".venv",
    "__pypackages__",
    "_build",
    "buck-out",
    "dist",
    "node_modules",
    "venv",
];

/// A set of globs matched anywhere inside a path.
///
/// Patterns are unanchored: `simple.py` matches `notebooks/simple.py` and
/// also `tmp/notsimple.py`, `.git` matches `proj/.github/ci.py`, and `*`
/// never crosses a `/`.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    patterns: Vec<String>,
    regexes: RegexSet,
}

impl PathMatcher {
    /// Compiles `patterns`.
    pub fn new<I, S>(patterns: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();

        let mut sources = Vec::with_capacity(patterns.len());
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| CoreError::config(format!("Invalid glob pattern: {}", e)))?;
            sources.push(unanchored(&glob)?);
        }

        let regexes = RegexSet::new(&sources)
            .map_err(|e| CoreError::config(format!("Failed to compile globs: {}", e)))?;

        Ok(Self { patterns, regexes })
    }

    /// The source patterns, in order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if any pattern matches some part of the path.
    pub fn matches(&self, path: &Path) -> bool {
        self.regexes.is_match(path.as_os_str().as_encoded_bytes())
    }
}

/// Drops the `^`/`$` anchors globset puts around every glob regex.
fn unanchored(glob: &Glob) -> Result<String, CoreError> {
    glob.regex()
        .strip_prefix("(?-u)^")
        .and_then(|body| body.strip_suffix('$'))
        .map(|body| format!("(?-u){}", body))
        .ok_or_else(|| CoreError::config(format!("Unsupported glob pattern: {}", glob.glob())))
}
