//! Diagnostic types reported by the engine.
//!
//! The field names follow the engine's JSON output so that a `check` run can
//! be deserialized directly.

use serde::{Deserialize, Serialize};

/// A position in source text.
///
/// Both the row and the column are 1-indexed. The column is counted in the
/// units of the engine's [`PositionEncoding`](crate::PositionEncoding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Row number (1-indexed).
    pub row: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl SourceLocation {
    /// Creates a new location.
    #[inline]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

/// How safe it is to apply a fix without review.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Applicability {
    /// The fix only serves as a hint.
    DisplayOnly,
    /// The fix may change the meaning of the code.
    Unsafe,
    /// The fix preserves the meaning of the code.
    #[default]
    Safe,
}

/// A single text replacement.
///
/// An empty `content` deletes the span; an empty span inserts `content`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    /// The replacement text.
    #[serde(default)]
    pub content: String,

    /// Start of the replaced span (inclusive).
    pub location: SourceLocation,

    /// End of the replaced span (exclusive).
    pub end_location: SourceLocation,
}

impl Edit {
    /// Creates an edit replacing `[start, end)` with `content`.
    pub fn replacement(
        content: impl Into<String>,
        start: SourceLocation,
        end: SourceLocation,
    ) -> Self {
        Self {
            content: content.into(),
            location: start,
            end_location: end,
        }
    }

    /// Creates an edit that inserts text at a position.
    pub fn insertion(content: impl Into<String>, at: SourceLocation) -> Self {
        Self::replacement(content, at, at)
    }

    /// Creates an edit that deletes a span.
    pub fn deletion(start: SourceLocation, end: SourceLocation) -> Self {
        Self::replacement(String::new(), start, end)
    }

    /// Returns true if the edit neither removes nor inserts anything.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.location == self.end_location
    }
}

/// An auto-fix for a diagnostic: an ordered list of non-overlapping edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fix {
    /// How safe the fix is.
    #[serde(default)]
    pub applicability: Applicability,

    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The edits, in engine order.
    #[serde(default)]
    pub edits: Vec<Edit>,
}

impl Fix {
    /// Creates a safe fix from a list of edits.
    pub fn safe(edits: impl IntoIterator<Item = Edit>) -> Self {
        Self {
            applicability: Applicability::Safe,
            message: None,
            edits: edits.into_iter().collect(),
        }
    }

    /// Sets the applicability.
    pub fn with_applicability(mut self, applicability: Applicability) -> Self {
        self.applicability = applicability;
        self
    }

    /// Sets the description.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// A finding reported by the engine for a span of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The rule code (absent for syntax errors).
    #[serde(default)]
    pub code: Option<String>,

    /// The diagnostic message.
    pub message: String,

    /// Start of the reported span.
    pub location: SourceLocation,

    /// End of the reported span.
    pub end_location: SourceLocation,

    /// Optional fix for this diagnostic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Creates a new diagnostic without a fix.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        location: SourceLocation,
        end_location: SourceLocation,
    ) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            location,
            end_location,
            fix: None,
        }
    }

    /// Sets an auto-fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Returns the fix edits, or an empty slice.
    pub fn edits(&self) -> &[Edit] {
        self.fix.as_ref().map_or(&[], |fix| fix.edits.as_slice())
    }
}
