//! Format command implementation

use std::path::PathBuf;

use miette::Result;
use nbruff_core::format_source;
use tracing::debug;

use super::{load_settings, process, report};
use crate::cli::Cli;
use crate::walk::SourceKind;

pub async fn run_format(
    cli: &Cli,
    paths: &[PathBuf],
    check: bool,
    no_sort_imports: bool,
) -> Result<bool> {
    let settings = load_settings(cli).await?;
    let sort_imports = settings.sort_imports && !no_sort_imports;
    debug!("Sorting imports: {}", sort_imports);

    let summary = process(cli, paths, check, |resolved, source, kind| {
        let isort = sort_imports.then_some(resolved.isort.as_ref());
        let mut formatted = format_source(&resolved.format, isort, source);
        // Cells carry no final line feed; files do.
        if kind == SourceKind::Python && formatted != source {
            formatted.truncate(formatted.trim_end().len());
            if !formatted.is_empty() {
                formatted.push('\n');
            }
        }
        formatted
    })
    .await?;

    Ok(report(&summary, check, "reformat", "Reformatted"))
}
