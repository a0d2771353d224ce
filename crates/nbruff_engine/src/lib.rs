//! # nbruff_engine
//!
//! The formatting/linting engine seam for nbruff.
//!
//! This crate provides:
//! - Diagnostic, fix, and edit types as reported by the engine
//! - The `Engine` and `EngineFactory` traits the core talks to
//! - A `ruff` subprocess executor implementing both
//!
//! The engine itself is treated as a black box: given a configuration tree
//! it either formats source text or reports diagnostics with fixes.
//!
//! ## Example
//!
//! ```rust,ignore
//! use nbruff_engine::{EngineFactory, PositionEncoding, RuffCommandFactory};
//!
//! let factory = RuffCommandFactory::new("ruff");
//! let engine = factory.create(&toml::Table::new(), PositionEncoding::Utf16)?;
//! let formatted = engine.format("a  =  1+1\n")?;
//! ```

mod diagnostic;
mod error;
mod executor;
mod executor_ruff;

pub use diagnostic::{Applicability, Diagnostic, Edit, Fix, SourceLocation};
pub use error::EngineError;
pub use executor::{Engine, EngineFactory, PositionEncoding};
pub use executor_ruff::{RuffCommand, RuffCommandFactory};
