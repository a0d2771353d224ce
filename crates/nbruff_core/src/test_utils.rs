//! Test utilities for nbruff_core.
//!
//! A deterministic stand-in for Ruff that understands just enough
//! configuration to make resolution observable in tests.

use std::sync::Arc;

use nbruff_engine::{
    Diagnostic, Edit, Engine, EngineError, EngineFactory, Fix, PositionEncoding, SourceLocation,
};
use parking_lot::Mutex;
use toml::{Table, Value};

/// Builds [`FakeEngine`]s and records every configuration it was given.
#[derive(Debug, Clone, Default)]
pub struct FakeEngineFactory {
    configs: Arc<Mutex<Vec<Table>>>,
}

impl FakeEngineFactory {
    /// Configurations passed to `create`, oldest first.
    pub fn configs(&self) -> Vec<Table> {
        self.configs.lock().clone()
    }

    /// The most recent configuration passed to `create`.
    pub fn last_config(&self) -> Option<Table> {
        self.configs.lock().last().cloned()
    }
}

impl EngineFactory for FakeEngineFactory {
    fn create(
        &self,
        config: &Table,
        encoding: PositionEncoding,
    ) -> Result<Box<dyn Engine>, EngineError> {
        self.configs.lock().push(config.clone());
        Ok(Box::new(FakeEngine::from_config(config, encoding)?))
    }
}

/// A formatter that only re-indents, and a linter that only sorts imports.
///
/// - `format` rescales 4-space indentation to `indent-width`, strips
///   trailing whitespace, and ends the text with one line feed.
/// - `check` reports `I001` with a fix when `lint.select` contains `"I"`
///   and the leading block of import lines is unsorted.
/// - Both fail on unbalanced parentheses, standing in for a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeEngine {
    indent_width: usize,
    sort_imports: bool,
    encoding: PositionEncoding,
}

impl FakeEngine {
    /// Reads the options the fake understands from `config`.
    pub fn from_config(config: &Table, encoding: PositionEncoding) -> Result<Self, EngineError> {
        let indent_width = match config.get("indent-width") {
            None => 4,
            Some(Value::Integer(width)) if *width > 0 => *width as usize,
            Some(other) => {
                return Err(EngineError::invalid_config(format!(
                    "indent-width must be a positive integer, got {other}"
                )));
            }
        };

        let sort_imports = config
            .get("lint")
            .and_then(|lint| lint.get("select"))
            .and_then(Value::as_array)
            .is_some_and(|select| select.iter().any(|code| code.as_str() == Some("I")));

        Ok(Self {
            indent_width,
            sort_imports,
            encoding,
        })
    }

    fn ensure_balanced(source: &str) -> Result<(), EngineError> {
        let mut depth = 0i64;
        for ch in source.chars() {
            match ch {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
            if depth < 0 {
                break;
            }
        }
        if depth == 0 {
            Ok(())
        } else {
            Err(EngineError::call("error: Failed to parse: unbalanced parentheses"))
        }
    }

    fn reindent(&self, line: &str) -> String {
        let trimmed = line.trim_start_matches(' ');
        let spaces = line.len() - trimmed.len();
        let width = (spaces / 4) * self.indent_width + spaces % 4;
        format!("{}{}", " ".repeat(width), trimmed.trim_end())
    }
}

impl Engine for FakeEngine {
    fn format(&self, source: &str) -> Result<String, EngineError> {
        Self::ensure_balanced(source)?;

        let mut lines: Vec<String> = source.lines().map(|line| self.reindent(line)).collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Ok(String::new());
        }
        Ok(lines.join("\n") + "\n")
    }

    fn check(&self, source: &str) -> Result<Vec<Diagnostic>, EngineError> {
        Self::ensure_balanced(source)?;
        if !self.sort_imports {
            return Ok(Vec::new());
        }

        let lines: Vec<&str> = source.lines().collect();
        let block = lines
            .iter()
            .take_while(|line| line.starts_with("import ") || line.starts_with("from "))
            .count();
        if block < 2 {
            return Ok(Vec::new());
        }

        let mut sorted = lines[..block].to_vec();
        sorted.sort_unstable();
        if sorted == lines[..block] {
            return Ok(Vec::new());
        }

        let start = SourceLocation::new(1, 1);
        let (end, content) = if block < lines.len() {
            (SourceLocation::new(block as u32 + 1, 1), sorted.join("\n") + "\n")
        } else {
            let last = lines[block - 1];
            let column = last.chars().map(|ch| self.encoding.width(ch)).sum::<usize>() + 1;
            (SourceLocation::new(block as u32, column as u32), sorted.join("\n"))
        };

        let fix = Fix::safe([Edit::replacement(content, start, end)])
            .with_message("Organize imports");
        Ok(vec![
            Diagnostic::new("I001", "Import block is un-sorted or un-formatted", start, end)
                .with_fix(fix),
        ])
    }

    fn position_encoding(&self) -> PositionEncoding {
        self.encoding
    }
}

/// Parses a TOML literal, panicking on invalid input.
pub fn table(source: &str) -> Table {
    toml::from_str(source).expect("Invalid TOML fixture")
}
