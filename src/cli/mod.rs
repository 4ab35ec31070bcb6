//! CLI support for jmespath-compiler
//!
//! Provides programmatic access to the `jmesc` commands so other tools can
//! embed them.

mod compile;
mod run;

pub use compile::{CompileCommand, execute_compile};
pub use run::{RunOptions, execute_run};

use std::io;

use thiserror::Error;

use crate::{CompileError, RuntimeError, ast::AstError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid AST: {0}")]
    Ast(#[from] AstError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Evaluation error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,
}
