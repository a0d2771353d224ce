//! Ruff executor backed by the `ruff` command-line tool.
//!
//! The resolved configuration is passed as one `--config KEY=VALUE` pair per
//! top-level key together with `--isolated`, so Ruff never runs its own
//! configuration discovery. Source text goes through stdin.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::executor::{Engine, EngineFactory, PositionEncoding};
use crate::{Diagnostic, EngineError, SourceLocation};

/// File name reported to Ruff for stdin input.
const DEFAULT_STDIN_FILENAME: &str = "untitled.py";

/// Ruff reports columns as character offsets.
const RUFF_ENCODING: PositionEncoding = PositionEncoding::Utf32;

/// Creates [`RuffCommand`] engines for a fixed executable.
#[derive(Debug, Clone)]
pub struct RuffCommandFactory {
    program: PathBuf,
    stdin_filename: String,
}

impl RuffCommandFactory {
    /// Creates a factory running `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            stdin_filename: DEFAULT_STDIN_FILENAME.to_string(),
        }
    }

    /// Sets the file name Ruff sees for stdin input.
    pub fn with_stdin_filename(mut self, name: impl Into<String>) -> Self {
        self.stdin_filename = name.into();
        self
    }
}

impl Default for RuffCommandFactory {
    fn default() -> Self {
        Self::new("ruff")
    }
}

impl EngineFactory for RuffCommandFactory {
    fn create(
        &self,
        config: &toml::Table,
        encoding: PositionEncoding,
    ) -> Result<Box<dyn Engine>, EngineError> {
        let engine = RuffCommand::new(&self.program, config, encoding)?
            .with_stdin_filename(self.stdin_filename.clone());
        Ok(Box::new(engine))
    }
}

/// An [`Engine`] that shells out to `ruff format` and `ruff check`.
#[derive(Debug, Clone)]
pub struct RuffCommand {
    program: PathBuf,
    config_args: Vec<String>,
    stdin_filename: String,
    encoding: PositionEncoding,
}

impl RuffCommand {
    /// Creates an engine for `config`, reporting columns in `encoding`.
    pub fn new(
        program: impl AsRef<Path>,
        config: &toml::Table,
        encoding: PositionEncoding,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            program: program.as_ref().to_path_buf(),
            config_args: config_overrides(config)?,
            stdin_filename: DEFAULT_STDIN_FILENAME.to_string(),
            encoding,
        })
    }

    /// Sets the file name Ruff sees for stdin input.
    pub fn with_stdin_filename(mut self, name: impl Into<String>) -> Self {
        self.stdin_filename = name.into();
        self
    }

    fn run(&self, args: &[&str], source: &str) -> Result<String, EngineError> {
        let mut command = Command::new(&self.program);
        command.args(args).arg("--isolated");
        for pair in &self.config_args {
            command.arg("--config").arg(pair);
        }
        command
            .arg("--stdin-filename")
            .arg(&self.stdin_filename)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("Running {} {:?}", self.program.display(), args);

        let mut child = command
            .spawn()
            .map_err(|e| EngineError::spawn(format!("{}: {}", self.program.display(), e)))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::spawn("stdin was not captured"))?;

        // Stdin is fed from a second thread so a full stdout pipe cannot
        // block the write.
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(source.as_bytes()));
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::call(stderr.trim().to_string()));
        }

        match written {
            Ok(result) => result?,
            Err(_) => return Err(EngineError::call("stdin writer panicked")),
        }

        String::from_utf8(output.stdout)
            .map_err(|e| EngineError::call(format!("output is not UTF-8: {}", e)))
    }
}

impl Engine for RuffCommand {
    fn format(&self, source: &str) -> Result<String, EngineError> {
        self.run(&["format"], source)
    }

    fn check(&self, source: &str) -> Result<Vec<Diagnostic>, EngineError> {
        let stdout = self.run(
            &["check", "--output-format", "json", "--exit-zero", "--no-fix"],
            source,
        )?;
        let mut diagnostics: Vec<Diagnostic> = serde_json::from_str(&stdout)?;
        reencode_columns(&mut diagnostics, source, self.encoding);
        Ok(diagnostics)
    }

    fn position_encoding(&self) -> PositionEncoding {
        self.encoding
    }
}

/// Renders each top-level key of `config` as a `KEY = VALUE` TOML pair.
fn config_overrides(config: &toml::Table) -> Result<Vec<String>, EngineError> {
    config
        .iter()
        .map(|(key, value)| {
            if key.is_empty() {
                return Err(EngineError::invalid_config("empty configuration key"));
            }
            Ok(format!("{} = {}", toml_key(key), value))
        })
        .collect()
}

fn toml_key(key: &str) -> String {
    let bare = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        toml::Value::String(key.to_string()).to_string()
    }
}

/// Converts character columns reported by Ruff into `encoding` units.
fn reencode_columns(diagnostics: &mut [Diagnostic], source: &str, encoding: PositionEncoding) {
    if encoding == RUFF_ENCODING {
        return;
    }

    let lines: Vec<&str> = source.split('\n').collect();
    let convert = |location: &mut SourceLocation| {
        let Some(line) = (location.row as usize)
            .checked_sub(1)
            .and_then(|index| lines.get(index))
        else {
            return;
        };
        let chars = location.column.saturating_sub(1) as usize;
        let mut taken = 0;
        let mut units = 0;
        for ch in line.chars().take(chars) {
            taken += 1;
            units += encoding.width(ch);
        }
        units += chars - taken;
        location.column = (units + 1) as u32;
    };

    for diagnostic in diagnostics {
        convert(&mut diagnostic.location);
        convert(&mut diagnostic.end_location);
        if let Some(fix) = diagnostic.fix.as_mut() {
            for edit in &mut fix.edits {
                convert(&mut edit.location);
                convert(&mut edit.end_location);
            }
        }
    }
}
