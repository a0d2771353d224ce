//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// nbruff - Ruff formatting for Python files and Jupyter notebooks
#[derive(Parser)]
#[command(name = "nbruff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration override, as a TOML `KEY = VALUE` pair (repeatable)
    #[arg(long = "config", value_name = "KEY=VALUE", global = true)]
    pub overrides: Vec<String>,

    /// Path to the ruff executable
    #[arg(long, value_name = "PATH", default_value = "ruff", global = true)]
    pub ruff: PathBuf,

    /// Settings file (format-on-run, format-on-save, sort-imports)
    #[arg(long, value_name = "FILE", global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Format files and notebooks
    Format {
        /// Files or directories to format
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Report files that would change without writing them
        #[arg(long)]
        check: bool,

        /// Do not sort imports before formatting
        #[arg(long)]
        no_sort_imports: bool,
    },

    /// Apply lint fixes to files and notebooks
    Check {
        /// Files or directories to fix
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Apply fixes
        #[arg(long, required = true)]
        fix: bool,

        /// Report files that would change without writing them
        #[arg(long)]
        check: bool,
    },

    /// Show the configuration resolved for a path
    Config {
        /// File whose configuration to resolve
        path: PathBuf,
    },
}
