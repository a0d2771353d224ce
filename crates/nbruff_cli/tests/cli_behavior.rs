//! Integration tests for CLI behavior
//!
//! These tests verify the external behavior of the nbruff binary.
//! Tests that need a real `ruff` on `PATH` are ignored by default.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a command for the nbruff CLI
fn nbruff_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_nbruff"))
}

/// A command whose engine can never be started.
fn nbruff_without_engine(temp_dir: &TempDir) -> Command {
    let mut cmd = nbruff_cmd();
    cmd.arg("--ruff").arg(temp_dir.path().join("no-such-ruff"));
    cmd
}

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        nbruff_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        nbruff_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn format_requires_paths() {
        nbruff_cmd().arg("format").assert().failure();
    }
}

mod config_command {
    use super::*;

    #[test]
    fn prints_config_from_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ruff.toml", "indent-width = 2\n");

        nbruff_cmd()
            .arg("config")
            .arg(temp_dir.path().join("a/b/AllCells.ipynb"))
            .assert()
            .success()
            .stdout(predicate::str::contains("ruff.toml"))
            .stdout(predicate::str::contains("indent-width = 2"));
    }

    #[test]
    fn follows_extend() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ruff.toml", "extend = \"base.ruff.toml\"\n");
        write(temp_dir.path(), "base.ruff.toml", "indent-width = 2\n");

        nbruff_cmd()
            .arg("config")
            .arg(temp_dir.path().join("nb.ipynb"))
            .assert()
            .success()
            .stdout(predicate::str::contains("# Extends"))
            .stdout(predicate::str::contains("indent-width = 2"))
            .stdout(predicate::str::contains("extend =").not());
    }

    #[test]
    fn applies_overrides() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "pyproject.toml", "[tool.ruff]\nline-length = 80\n");

        nbruff_cmd()
            .arg("--config")
            .arg("line-length=100")
            .arg("config")
            .arg(temp_dir.path().join("a.py"))
            .assert()
            .success()
            .stdout(predicate::str::contains("line-length = 100"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ruff.toml", "indent-width = \n");

        nbruff_cmd()
            .arg("config")
            .arg(temp_dir.path().join("a.py"))
            .assert()
            .code(2);
    }

    #[test]
    fn invalid_override_is_an_error() {
        let temp_dir = TempDir::new().unwrap();

        nbruff_cmd()
            .arg("--config")
            .arg("line-length")
            .arg("config")
            .arg(temp_dir.path().join("a.py"))
            .assert()
            .code(2);
    }
}

mod format_command {
    use super::*;

    #[test]
    fn engine_failure_leaves_files_untouched() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.py", "x  =  1\n");

        nbruff_without_engine(&temp_dir)
            .arg("format")
            .arg("--check")
            .arg(temp_dir.path().join("a.py"))
            .assert()
            .success()
            .stdout(predicate::str::contains("1 file(s) left unchanged"));

        let text = fs::read_to_string(temp_dir.path().join("a.py")).unwrap();
        assert_eq!(text, "x  =  1\n");
    }

    #[test]
    fn malformed_config_fails_the_run() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ruff.toml", "[lint\n");
        write(temp_dir.path(), "a.py", "x = 1\n");

        nbruff_without_engine(&temp_dir)
            .arg("format")
            .arg(temp_dir.path().join("a.py"))
            .assert()
            .code(2);
    }

    #[test]
    fn excluded_files_are_skipped_when_walking() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ruff.toml", "extend-exclude = [\"generated\"]\n");
        write(temp_dir.path(), "generated/a.py", "x = 1\n");

        nbruff_without_engine(&temp_dir)
            .arg("format")
            .arg(temp_dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("0 file(s) changed, 0 file(s) left unchanged"));
    }

    #[test]
    #[ignore = "requires ruff on PATH"]
    fn formats_python_file() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.py", "a  =  1+1\n");

        nbruff_cmd()
            .arg("format")
            .arg(temp_dir.path().join("a.py"))
            .assert()
            .success()
            .stdout(predicate::str::contains("Reformatted:"));

        let text = fs::read_to_string(temp_dir.path().join("a.py")).unwrap();
        assert_eq!(text, "a = 1 + 1\n");
    }

    #[test]
    #[ignore = "requires ruff on PATH"]
    fn check_reports_notebook_changes() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ruff.toml", "indent-width = 2\n");
        write(
            temp_dir.path(),
            "nb/AllCells.ipynb",
            r#"{"cells": [{"cell_type": "code", "metadata": {}, "outputs": [], "execution_count": null, "source": ["if x:\n", "    y = 1"]}], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#,
        );

        nbruff_cmd()
            .arg("format")
            .arg("--check")
            .arg(temp_dir.path().join("nb/AllCells.ipynb"))
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Would reformat:"));
    }
}

mod check_command {
    use super::*;

    #[test]
    fn requires_fix_flag() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.py", "x = 1\n");

        nbruff_cmd()
            .arg("check")
            .arg(temp_dir.path().join("a.py"))
            .assert()
            .failure();
    }

    #[test]
    #[ignore = "requires ruff on PATH"]
    fn sorts_imports_with_select() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ruff.toml", "[lint]\nselect = [\"I\"]\n");
        write(temp_dir.path(), "a.py", "import sys\nimport os\n\nprint(os, sys)\n");

        nbruff_cmd()
            .arg("check")
            .arg("--fix")
            .arg(temp_dir.path().join("a.py"))
            .assert()
            .success();

        let text = fs::read_to_string(temp_dir.path().join("a.py")).unwrap();
        assert_eq!(text, "import os\nimport sys\n\nprint(os, sys)\n");
    }
}
