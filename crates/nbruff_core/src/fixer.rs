//! Auto-fix functionality for applying diagnostic fixes.

use nbruff_engine::{Applicability, Diagnostic, PositionEncoding};
use tracing::{debug, warn};

use crate::location::LocationIndex;
use crate::workspace::Workspace;

/// Result of applying fixes to a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixerResult {
    /// Number of edits applied.
    pub edits_applied: usize,
    /// The fixed content.
    pub fixed_content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

impl FixerResult {
    /// Creates a new fixer result.
    pub fn new(edits_applied: usize, fixed_content: String, modified: bool) -> Self {
        Self {
            edits_applied,
            fixed_content,
            modified,
        }
    }

    /// Creates a result indicating no changes were made.
    pub fn unchanged(content: impl Into<String>) -> Self {
        Self::new(0, content.into(), false)
    }
}

/// An edit resolved to byte offsets in the original text.
#[derive(Debug, Clone, Copy)]
struct ResolvedEdit<'a> {
    start: usize,
    end: usize,
    content: &'a str,
}

/// Applies the safe fixes carried by `diagnostics` to `content`.
///
/// Unsafe and display-only fixes are never applied. All edit positions refer to the original text. Edits are applied from
/// the end of the text towards the beginning, so no offset is invalidated
/// by an edit applied before it. Edits overlapping one already applied are
/// skipped.
pub fn apply_fixes(
    content: &str,
    diagnostics: &[Diagnostic],
    encoding: PositionEncoding,
) -> FixerResult {
    let index = LocationIndex::new(content);

    let mut edits: Vec<ResolvedEdit<'_>> = diagnostics
        .iter()
        .rev()
        .filter(|diagnostic| has_safe_fix(diagnostic))
        .flat_map(|diagnostic| diagnostic.edits().iter().rev())
        .map(|edit| {
            let start = index.offset(edit.location, encoding);
            let end = index.offset(edit.end_location, encoding).max(start);
            ResolvedEdit {
                start,
                end,
                content: &edit.content,
            }
        })
        .collect();

    if edits.is_empty() {
        return FixerResult::unchanged(content);
    }

    // Stable: edits at the same position keep reverse engine order.
    edits.sort_by(|a, b| (b.start, b.end).cmp(&(a.start, a.end)));

    let mut pieces: Vec<&str> = Vec::with_capacity(edits.len() * 2 + 1);
    let mut cursor = index.max_position();
    let mut applied = 0;

    for edit in &edits {
        if edit.end > cursor {
            warn!("Skipping overlapping edit at [{}, {}]", edit.start, edit.end);
            continue;
        }

        debug!(
            "Applying edit: replace [{}..{}] with {:?}",
            edit.start, edit.end, edit.content
        );

        pieces.push(&content[edit.end..cursor]);
        pieces.push(edit.content);
        cursor = edit.start;
        applied += 1;
    }
    pieces.push(&content[..cursor]);

    let fixed: String = pieces.into_iter().rev().collect();
    let modified = fixed != content;
    FixerResult::new(applied, fixed, modified)
}

fn has_safe_fix(diagnostic: &Diagnostic) -> bool {
    diagnostic
        .fix
        .as_ref()
        .is_some_and(|fix| fix.applicability == Applicability::Safe)
}

/// Runs the engine's checks and returns every diagnostic carrying a safe
/// fix.
///
/// Engine failures yield no diagnostics.
pub fn collect_fixes(workspace: &Workspace, source: &str) -> Vec<Diagnostic> {
    match workspace.engine().check(source) {
        Ok(diagnostics) => diagnostics
            .into_iter()
            .filter(|diagnostic| {
                let safe = has_safe_fix(diagnostic);
                if !safe && diagnostic.fix.is_some() {
                    debug!("Skipping fix for {:?}: not safe", diagnostic.code);
                }
                safe
            })
            .collect(),
        Err(e) => {
            debug!("Check failed, leaving source untouched: {}", e);
            Vec::new()
        }
    }
}

/// Applies every available engine fix to `source`.
///
/// Never fails: when the engine cannot check the source, the source is
/// returned unchanged.
pub fn fix_text(workspace: &Workspace, source: &str) -> String {
    let diagnostics = collect_fixes(workspace, source);
    apply_fixes(source, &diagnostics, workspace.engine().position_encoding()).fixed_content
}
