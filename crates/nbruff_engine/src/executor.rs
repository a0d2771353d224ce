//! Engine abstraction.
//!
//! The core never depends on a concrete engine. It asks an
//! [`EngineFactory`] for an [`Engine`] bound to a resolved configuration
//! tree and then only calls `format` and `check`.

use serde::{Deserialize, Serialize};

use crate::{Diagnostic, EngineError};

/// Unit in which the engine counts columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionEncoding {
    /// UTF-8 bytes.
    Utf8,
    /// UTF-16 code units.
    #[default]
    Utf16,
    /// Unicode scalar values.
    Utf32,
}

impl PositionEncoding {
    /// Width of `ch` in this encoding's units.
    #[inline]
    pub fn width(self, ch: char) -> usize {
        match self {
            PositionEncoding::Utf8 => ch.len_utf8(),
            PositionEncoding::Utf16 => ch.len_utf16(),
            PositionEncoding::Utf32 => 1,
        }
    }
}

/// A formatting/linting engine bound to one configuration.
///
/// Implementations must be shareable across tasks: a resolved workspace is
/// read concurrently by every formatting operation.
pub trait Engine: Send + Sync {
    /// Formats `source`, failing on input the engine cannot parse.
    fn format(&self, source: &str) -> Result<String, EngineError>;

    /// Lints `source` and returns the diagnostics, with fixes where available.
    fn check(&self, source: &str) -> Result<Vec<Diagnostic>, EngineError>;

    /// Encoding of the columns in diagnostics returned by [`Engine::check`].
    fn position_encoding(&self) -> PositionEncoding;
}

/// Builds engines from resolved configuration trees.
pub trait EngineFactory: Send + Sync {
    /// Creates an engine for `config` reporting columns in `encoding`.
    fn create(
        &self,
        config: &toml::Table,
        encoding: PositionEncoding,
    ) -> Result<Box<dyn Engine>, EngineError>;
}
