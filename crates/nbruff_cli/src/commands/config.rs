//! Config command implementation

use std::path::Path;

use miette::{IntoDiagnostic, Result};
use nbruff_core::{FsStorage, resolve_config};

use crate::cli::Cli;
use crate::overrides::parse_overrides;

/// Prints the configuration resolved for `path` as TOML, preceded by the
/// files it was loaded from.
pub async fn run_config(cli: &Cli, path: &Path) -> Result<()> {
    let overrides = parse_overrides(&cli.overrides)?;
    let path = std::path::absolute(path).into_diagnostic()?;

    let resolved = resolve_config(&FsStorage::default(), &path, Some(&overrides))
        .await
        .into_diagnostic()?;

    match &resolved.source {
        Some(source) => println!("# Resolved from {}", source.display()),
        None => println!("# No configuration file found"),
    }
    for base in &resolved.extends {
        println!("# Extends {}", base.display());
    }
    print!("{}", toml::to_string(&resolved.config).into_diagnostic()?);

    Ok(())
}
