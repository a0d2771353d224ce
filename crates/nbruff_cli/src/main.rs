//! nbruff CLI
//!
//! Formats Python files and the code cells of Jupyter notebooks with Ruff,
//! resolving Ruff configuration the way an editor integration does.

use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod notebook;
mod overrides;
mod settings;
mod walk;

use cli::{Cli, Commands};
use commands::{run_check, run_config, run_format};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_changes) => {
            if has_changes {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    runtime.block_on(async {
        match &cli.command {
            Commands::Format {
                paths,
                check,
                no_sort_imports,
            } => run_format(&cli, paths, *check, *no_sort_imports).await,
            Commands::Check { paths, check, .. } => run_check(&cli, paths, *check).await,
            Commands::Config { path } => run_config(&cli, path).await.map(|_| false),
        }
    })
}
