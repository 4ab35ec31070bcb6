//! Compile an AST and run it against JSON input

use std::sync::Arc;

use crate::{CompileOptions, TreeInterpreter, UnboundHost, json_to_value, value_to_json};

use super::{CliError, CompileCommand, execute_compile};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// AST in its JSON form
    pub ast: String,
    /// JSON input string
    pub input: Option<String>,
}

/// Execute a run operation.
///
/// No function library or tree interpreter is bound, so queries that call
/// functions or invoke expression references fail at evaluation time.
pub fn execute_run(options: &RunOptions) -> Result<serde_json::Value, CliError> {
    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let input: serde_json::Value = serde_json::from_str(json_str)?;

    let procedure = execute_compile(&CompileCommand {
        ast: options.ast.clone(),
        options: CompileOptions::default(),
    })?;

    let host: Arc<dyn TreeInterpreter> = Arc::new(UnboundHost);
    let result = procedure.call(&host, json_to_value(input))?;
    Ok(value_to_json(&result))
}
