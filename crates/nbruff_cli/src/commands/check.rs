//! Check command implementation

use std::path::PathBuf;

use miette::Result;
use nbruff_core::fix_text;

use super::{process, report};
use crate::cli::Cli;

/// Applies every available lint fix, without formatting.
pub async fn run_check(cli: &Cli, paths: &[PathBuf], check: bool) -> Result<bool> {
    let summary = process(cli, paths, check, |resolved, source, _| {
        fix_text(&resolved.format, source)
    })
    .await?;

    Ok(report(&summary, check, "fix", "Fixed"))
}
