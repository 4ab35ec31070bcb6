pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compiler;
pub mod convert;
pub mod emitter;
pub mod ir;
pub mod output;
pub mod procedure;
pub mod runtime;
pub mod symbols;
pub mod value;

pub use ast::{Comparator, Node, NodeKind, SourceKind};
pub use compiler::{CompileError, CompileOptions, Compiler, compile};
pub use convert::{json_to_value, value_to_json};
pub use procedure::Procedure;
pub use runtime::{Expref, FunctionDispatcher, RuntimeError, TreeInterpreter, UnboundHost};
pub use value::Value;
