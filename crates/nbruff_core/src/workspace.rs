//! Resolved configuration bound to an engine.

use std::fmt;
use std::path::Path;

use nbruff_engine::{Engine, EngineFactory, PositionEncoding};
use toml::{Table, Value};

use crate::scope::{DEFAULT_EXCLUDE, DEFAULT_INCLUDE, PathMatcher};
use crate::CoreError;

/// A resolved, read-only configuration handle.
///
/// Owns the configuration tree, the effective include and exclude globs
/// derived from it, and an engine instance built for it. A new workspace is
/// built whenever configuration changes; an existing one is never mutated.
pub struct Workspace {
    options: Table,
    include: PathMatcher,
    exclude: PathMatcher,
    force_exclude: bool,
    engine: Box<dyn Engine>,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("options", &self.options)
            .field("include", &self.include.patterns())
            .field("exclude", &self.exclude.patterns())
            .field("force_exclude", &self.force_exclude)
            .field("engine", &"<dyn Engine>")
            .finish()
    }
}

impl Workspace {
    /// Builds a workspace reporting positions in UTF-16 code units.
    pub fn new(options: Table, factory: &dyn EngineFactory) -> Result<Self, CoreError> {
        Self::with_encoding(options, factory, PositionEncoding::Utf16)
    }

    /// Builds a workspace whose engine reports positions in `encoding`.
    pub fn with_encoding(
        options: Table,
        factory: &dyn EngineFactory,
        encoding: PositionEncoding,
    ) -> Result<Self, CoreError> {
        let include = effective_globs(&options, "include", "extend-include", &DEFAULT_INCLUDE);
        let exclude = effective_globs(&options, "exclude", "extend-exclude", &DEFAULT_EXCLUDE);
        let engine = factory.create(&options, encoding)?;

        Ok(Self {
            include: PathMatcher::new(include)?,
            exclude: PathMatcher::new(exclude)?,
            force_exclude: matches!(options.get("force-exclude"), Some(Value::Boolean(true))),
            options,
            engine,
        })
    }

    /// The configuration tree.
    pub fn options(&self) -> &Table {
        &self.options
    }

    /// The engine bound to this configuration.
    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// The effective include globs.
    pub fn include(&self) -> &[String] {
        self.include.patterns()
    }

    /// The effective exclude globs.
    pub fn exclude(&self) -> &[String] {
        self.exclude.patterns()
    }

    /// Whether `path` should be formatted.
    ///
    /// An explicit request (the user picked this one document) ignores the
    /// include list and, unless `force-exclude = true`, the exclude list as
    /// well.
    pub fn should_format(&self, path: &Path, explicit: bool) -> bool {
        if explicit && !self.force_exclude {
            return true;
        }

        if explicit || self.include.matches(path) {
            return !self.exclude.matches(path);
        }

        false
    }
}

/// `key` replaces `defaults` when it is an array; `extend_key` appends.
fn effective_globs(options: &Table, key: &str, extend_key: &str, defaults: &[&str]) -> Vec<String> {
    let mut globs = string_array(options, key)
        .unwrap_or_else(|| defaults.iter().map(|glob| glob.to_string()).collect());
    if let Some(extra) = string_array(options, extend_key) {
        globs.extend(extra);
    }
    globs
}

fn string_array(options: &Table, key: &str) -> Option<Vec<String>> {
    let Value::Array(values) = options.get(key)? else {
        return None;
    };
    Some(
        values
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeEngineFactory;
    use rstest::rstest;

    fn workspace(config: &str) -> Workspace {
        let options: Table = toml::from_str(config).unwrap();
        Workspace::new(options, &FakeEngineFactory::default()).unwrap()
    }

    #[rstest]
    #[case::include_none("force-exclude = false\ninclude = []", true)]
    #[case::include_none_force("force-exclude = true\ninclude = []", true)]
    #[case::exclude("force-exclude = false\nexclude = [\"simple.py\"]", true)]
    #[case::exclude_force("force-exclude = true\nexclude = [\"simple.py\"]", false)]
    #[case::extend_exclude_force("force-exclude = true\nextend-exclude = [\"simple.py\"]", false)]
    fn test_explicit_formatting(#[case] config: &str, #[case] expected: bool) {
        assert_eq!(
            workspace(config).should_format(Path::new("tmp/simple.py"), true),
            expected
        );
    }

    #[rstest]
    #[case::include_none("force-exclude = false\ninclude = []", false)]
    #[case::include_none_force("force-exclude = true\ninclude = []", false)]
    #[case::exclude("force-exclude = false\nexclude = [\"simple.py\"]", false)]
    #[case::extend_exclude("extend-exclude = [\"simple.py\"]", false)]
    #[case::defaults("", true)]
    fn test_automatic_formatting(#[case] config: &str, #[case] expected: bool) {
        assert_eq!(
            workspace(config).should_format(Path::new("tmp/simple.py"), false),
            expected
        );
    }

    #[test]
    fn test_empty_include_only_blocks_automatic_runs() {
        let ws = workspace("include = []");

        for path in ["a.py", "nb/AllCells.ipynb", "pyproject.toml"] {
            assert!(!ws.should_format(Path::new(path), false), "{path}");
            assert!(ws.should_format(Path::new(path), true), "{path}");
        }
    }

    #[test]
    fn test_default_exclude_blocks_automatic_runs() {
        let ws = workspace("");

        assert!(!ws.should_format(Path::new("proj/.venv/lib/mod.py"), false));
        assert!(ws.should_format(Path::new("proj/.venv/lib/mod.py"), true));
    }

    #[rstest]
    #[case::git_prefix("proj/.github/ci.py")]
    #[case::dist_prefix("proj/src/distance.py")]
    #[case::venv_suffix("proj/myvenv/mod.py")]
    fn test_default_exclude_matches_inside_names(#[case] path: &str) {
        assert!(!workspace("").should_format(Path::new(path), false));
    }

    #[test]
    fn test_force_exclude_matches_inside_names() {
        let ws = workspace("force-exclude = true\nexclude = [\"simple.py\"]");

        assert!(!ws.should_format(Path::new("tmp/notsimple.py"), true));
        assert!(ws.should_format(Path::new("tmp/other.py"), true));
    }

    #[test]
    fn test_default_include_rejects_other_files() {
        let ws = workspace("");

        assert!(!ws.should_format(Path::new("notes.txt"), false));
        assert!(ws.should_format(Path::new("notes.txt"), true));
    }

    #[test]
    fn test_include_replaces_defaults_and_extend_appends() {
        let ws = workspace("include = [\"*.ipynb\"]\nextend-include = [\"*.pyx\"]");

        assert_eq!(ws.include(), ["*.ipynb", "*.pyx"]);
        assert!(!ws.should_format(Path::new("a.py"), false));
        assert!(ws.should_format(Path::new("a.pyx"), false));
    }

    #[test]
    fn test_exclude_replaces_defaults() {
        let ws = workspace("exclude = [\"generated\"]");

        assert_eq!(ws.exclude(), ["generated"]);
        assert!(ws.should_format(Path::new(".venv/a.py"), false));
        assert!(!ws.should_format(Path::new("generated/a.py"), false));
    }

    #[test]
    fn test_extend_exclude_keeps_defaults() {
        let ws = workspace("extend-exclude = [\"generated\"]");

        assert_eq!(ws.exclude().len(), DEFAULT_EXCLUDE.len() + 1);
        assert!(!ws.should_format(Path::new(".venv/a.py"), false));
    }

    #[test]
    fn test_force_exclude_must_be_literal_true() {
        let ws = workspace("force-exclude = \"true\"\nexclude = [\"simple.py\"]");

        assert!(ws.should_format(Path::new("simple.py"), true));
    }

    #[test]
    fn test_non_array_include_falls_back_to_defaults() {
        let ws = workspace("include = \"*.md\"");

        assert_eq!(ws.include().len(), DEFAULT_INCLUDE.len());
    }

    #[test]
    fn test_non_string_entries_are_ignored() {
        let ws = workspace("include = [\"*.py\", 3, true]");

        assert_eq!(ws.include(), ["*.py"]);
    }

    #[test]
    fn test_invalid_glob_fails_construction() {
        let options: Table = toml::from_str("exclude = [\"[oops\"]").unwrap();
        let result = Workspace::new(options, &FakeEngineFactory::default());

        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_engine_receives_options_and_encoding() {
        let factory = FakeEngineFactory::default();
        let options: Table = toml::from_str("indent-width = 2").unwrap();

        let ws =
            Workspace::with_encoding(options.clone(), &factory, PositionEncoding::Utf8).unwrap();

        assert_eq!(factory.configs(), vec![options]);
        assert_eq!(ws.engine().position_encoding(), PositionEncoding::Utf8);
    }
}
