//! Interfaces compiled procedures call back into at evaluation time.
//!
//! A compiled procedure never interprets the AST itself. Two collaborators
//! are supplied by the host when the procedure is called:
//!
//! - a [`TreeInterpreter`], used only to evaluate expression references
//!   lazily when a higher-order function invokes them
//! - a [`FunctionDispatcher`], reached through the interpreter, which runs
//!   built-in functions (and the `slice` operation)

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{ast::Node, value::Value};

/// Errors raised while a compiled procedure runs.
///
/// The compiler never produces these; they come from the host's function
/// dispatcher or interpreter and propagate out of [`Procedure::call`].
///
/// [`Procedure::call`]: crate::Procedure::call
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("unknown function: {name}()")]
    UnknownFunction { name: String },

    #[error("{name}() expects {expected} arguments, got {actual}")]
    Arity {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("{name}() argument {position} must be {expected}, got {actual}")]
    InvalidType {
        name: String,
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{name}(): {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("interpreter error: {0}")]
    Interpreter(String),
}

/// Calls built-in functions by name.
pub trait FunctionDispatcher: Send + Sync {
    fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError>;
}

/// Direct AST evaluator supplied by the host.
///
/// Compiled code only reaches [`evaluate`](TreeInterpreter::evaluate) through
/// an [`Expref`]; all other nodes are compiled ahead of time.
pub trait TreeInterpreter: Send + Sync {
    fn evaluate(&self, node: &Node, value: &Value) -> Result<Value, RuntimeError>;

    /// The dispatcher compiled function calls are routed to
    fn functions(&self) -> &dyn FunctionDispatcher;
}

/// A deferred query expression.
///
/// Produced when a procedure evaluates an expression reference (`&expr`).
/// It holds the uncompiled sub-expression together with the interpreter the
/// procedure was called with, and evaluates the sub-expression only when a
/// function invokes it.
#[derive(Clone)]
pub struct Expref {
    node: Arc<Node>,
    interpreter: Arc<dyn TreeInterpreter>,
}

impl Expref {
    pub fn new(node: Arc<Node>, interpreter: Arc<dyn TreeInterpreter>) -> Self {
        Expref { node, interpreter }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Evaluates the referenced expression against `value`.
    pub fn call(&self, value: &Value) -> Result<Value, RuntimeError> {
        self.interpreter.evaluate(&self.node, value)
    }
}

impl fmt::Debug for Expref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expref({})", self.node)
    }
}

impl PartialEq for Expref {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

/// A host with no interpreter and no functions.
///
/// Procedures that never call functions or invoke expression references run
/// fine against it; anything else fails with a [`RuntimeError`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnboundHost;

impl TreeInterpreter for UnboundHost {
    fn evaluate(&self, node: &Node, _value: &Value) -> Result<Value, RuntimeError> {
        Err(RuntimeError::Interpreter(format!(
            "no tree interpreter bound to evaluate {}",
            node
        )))
    }

    fn functions(&self) -> &dyn FunctionDispatcher {
        self
    }
}

impl FunctionDispatcher for UnboundHost {
    fn invoke(&self, name: &str, _args: Vec<Value>) -> Result<Value, RuntimeError> {
        Err(RuntimeError::UnknownFunction {
            name: name.to_string(),
        })
    }
}
