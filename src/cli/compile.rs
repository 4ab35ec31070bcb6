//! Print the generated source for an AST

use crate::{CompileOptions, Node, Procedure, compile};

use super::CliError;

/// Options for the compile command
#[derive(Debug, Clone, Default)]
pub struct CompileCommand {
    /// AST in its JSON form
    pub ast: String,
    pub options: CompileOptions,
}

/// Parse the AST and compile it
pub fn execute_compile(command: &CompileCommand) -> Result<Procedure, CliError> {
    let node = Node::from_json_str(&command.ast)?;
    Ok(compile(&node, &command.options)?)
}
