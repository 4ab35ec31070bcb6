//! Lowers query ASTs into executable procedures.
//!
//! Each node kind has one lowering rule that appends instructions working
//! on two registers:
//!
//! - `value` - the running result of the expression being lowered
//! - `current` - the context baseline; only a pipe rebases it
//!
//! Rules that evaluate several sub-expressions from the same starting point
//! (comparators, multi-selects, function arguments) copy both registers into
//! fresh temporaries first and restore them before each sub-expression, so
//! siblings never see each other's effects.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use jmespath_compiler::{compile, ast::Node, CompileOptions, TreeInterpreter, UnboundHost, Value};
//!
//! let ast = Node::subexpression(Node::field("a"), Node::field("b"));
//! let procedure = compile(&ast, &CompileOptions::default()).unwrap();
//!
//! let host: Arc<dyn TreeInterpreter> = Arc::new(UnboundHost);
//! let root = Value::object(vec![("a", Value::object(vec![("b", Value::Integer(1))]))]);
//! assert_eq!(procedure.call(&host, root).unwrap(), Value::Integer(1));
//! ```

use std::sync::{Arc, LazyLock};

use regex::Regex;
use thiserror::Error;

use crate::{
    ast::{Comparator, Node, NodeKind, SourceKind},
    ir::{CURRENT, Expr, Operand, Slot, Stmt, Test, VALUE},
    procedure::Procedure,
    symbols::SymbolGenerator,
    value::Value,
};

/// Deepest AST the compiler descends into.
pub const MAX_DEPTH: usize = 256;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Errors that stop a compilation.
///
/// All of them point at a defect in whoever built the AST or chose the
/// options; the shape of the data a query will run against never causes
/// one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("no lowering rule for node kind \"{kind}\": {node}")]
    UnknownNode { kind: String, node: String },

    #[error("malformed {kind} node ({reason}): {node}")]
    MalformedNode {
        kind: String,
        reason: String,
        node: String,
    },

    #[error("AST is nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("invalid procedure name {0:?}: expected an identifier")]
    InvalidName(String),
}

/// Options for one compilation
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Name of the generated procedure; must be an identifier
    pub name: String,
    /// Original query text, written as a comment above the procedure
    pub display: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            name: "compiled".to_string(),
            display: String::new(),
        }
    }
}

impl CompileOptions {
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        CompileOptions {
            name: name.into(),
            display: display.into(),
        }
    }
}

/// The node compiler.
///
/// An instance holds the symbol table and slot list of exactly one
/// compilation; [`compile`](Compiler::compile) consumes it.
pub struct Compiler {
    symbols: SymbolGenerator,
    slots: Vec<String>,
    depth: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        let mut compiler = Compiler {
            symbols: SymbolGenerator::new(),
            slots: Vec::new(),
            depth: 0,
        };
        // slots 0 and 1, matching ir::VALUE and ir::CURRENT
        compiler.temp("value");
        compiler.temp("current");
        compiler
    }

    /// Compiles `node` into a procedure named `options.name`.
    #[tracing::instrument(level = "debug", skip_all, fields(name = %options.name))]
    pub fn compile(mut self, node: &Node, options: &CompileOptions) -> Result<Procedure, CompileError> {
        if !IDENTIFIER.is_match(&options.name) {
            return Err(CompileError::InvalidName(options.name.clone()));
        }

        let mut body = vec![Stmt::copy(CURRENT, VALUE)];
        self.lower(node, &mut body)?;

        tracing::debug!(slots = self.slots.len(), "lowering complete");

        Ok(Procedure::new(
            options.name.clone(),
            options.display.clone(),
            self.slots,
            body,
        ))
    }

    fn temp(&mut self, prefix: &str) -> Slot {
        let name = self.symbols.allocate(prefix);
        self.slots.push(name);
        Slot(self.slots.len() - 1)
    }

    fn lower(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        if self.depth >= MAX_DEPTH {
            return Err(CompileError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        tracing::trace!(kind = node.kind.name(), depth = self.depth, "lowering node");
        let result = self.lower_kind(node, out);
        self.depth -= 1;
        result
    }

    fn lower_kind(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        match &node.kind {
            NodeKind::Literal => {
                let value = node
                    .value
                    .clone()
                    .ok_or_else(|| malformed(node, "literal without a value"))?;
                out.push(Stmt::assign(VALUE, Expr::Literal(value)));
                Ok(())
            }
            NodeKind::Field => {
                let name = string_value(node)?;
                out.push(Stmt::If {
                    test: Test::Mapping(VALUE),
                    then: vec![Stmt::assign(
                        VALUE,
                        Expr::Field {
                            source: VALUE,
                            name: name.to_string(),
                        },
                    )],
                    otherwise: vec![null(VALUE)],
                });
                Ok(())
            }
            NodeKind::Index => self.lower_index(node, out),
            NodeKind::Subexpression => {
                let [left, right] = children::<2>(node)?;
                self.lower(left, out)?;
                let mut then = Vec::new();
                self.lower(right, &mut then)?;
                out.push(Stmt::when(Test::Null(VALUE).negate(), then));
                Ok(())
            }
            NodeKind::Pipe => {
                let [left, right] = children::<2>(node)?;
                self.lower(left, out)?;
                out.push(Stmt::copy(CURRENT, VALUE));
                self.lower(right, out)
            }
            NodeKind::Or => self.lower_short_circuit(node, Test::Falsy(VALUE), out),
            NodeKind::And => self.lower_short_circuit(node, Test::Falsy(VALUE).negate(), out),
            NodeKind::Not => {
                let [child] = children::<1>(node)?;
                self.lower(child, out)?;
                out.push(Stmt::assign(VALUE, Expr::Not(VALUE)));
                Ok(())
            }
            NodeKind::Current => Ok(()),
            NodeKind::Flatten => self.lower_flatten(node, out),
            NodeKind::Projection => self.lower_projection(node, out),
            NodeKind::Condition => {
                let [test, body] = children::<2>(node)?;
                self.lower(test, out)?;
                let mut then = Vec::new();
                self.lower(body, &mut then)?;
                out.push(Stmt::when(Test::Null(VALUE).negate(), then));
                Ok(())
            }
            NodeKind::Comparator => self.lower_comparator(node, out),
            NodeKind::MultiSelectList | NodeKind::MultiSelectHash => self.lower_multi_select(node, out),
            NodeKind::KeyValPair => {
                let [child] = children::<1>(node)?;
                self.lower(child, out)
            }
            NodeKind::FunctionCall => self.lower_function_call(node, out),
            NodeKind::Slice => self.lower_slice(node, out),
            NodeKind::ExpressionReference => {
                let [child] = children::<1>(node)?;
                out.push(Stmt::assign(VALUE, Expr::Expref(Arc::new(child.clone()))));
                Ok(())
            }
            NodeKind::Unknown(kind) => Err(CompileError::UnknownNode {
                kind: kind.clone(),
                node: node.to_string(),
            }),
        }
    }

    fn lower_index(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        let index = match &node.value {
            Some(Value::Integer(i)) => *i,
            _ => return Err(malformed(node, "expected an integer index")),
        };

        let then = if index >= 0 {
            vec![Stmt::assign(
                VALUE,
                Expr::Element {
                    source: VALUE,
                    index: Operand::Literal(Value::Integer(index)),
                },
            )]
        } else {
            let position = self.temp("index");
            vec![
                Stmt::assign(
                    position,
                    Expr::Offset {
                        source: VALUE,
                        delta: index,
                    },
                ),
                Stmt::assign(
                    VALUE,
                    Expr::Element {
                        source: VALUE,
                        index: Operand::Slot(position),
                    },
                ),
            ]
        };

        out.push(Stmt::If {
            test: Test::Sequence(VALUE),
            then,
            otherwise: vec![null(VALUE)],
        });
        Ok(())
    }

    /// `or` / `and`: keep the left result unless `fallback` holds for it, in
    /// which case the right side runs from the original value.
    fn lower_short_circuit(&mut self, node: &Node, fallback: Test, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        let [left, right] = children::<2>(node)?;
        let saved = self.temp("saved");

        out.push(Stmt::copy(saved, VALUE));
        self.lower(left, out)?;

        let mut then = vec![Stmt::copy(VALUE, saved)];
        self.lower(right, &mut then)?;
        out.push(Stmt::when(fallback, then));
        Ok(())
    }

    fn lower_flatten(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        let [child] = children::<1>(node)?;
        self.lower(child, out)?;

        let flattened = self.temp("flattened");
        let element = self.temp("element");

        // empty sub-arrays contribute nothing; other non-arrays pass through
        let splice = Stmt::If {
            test: Test::NonEmptySequence(element),
            then: vec![Stmt::Extend {
                list: flattened,
                items: element,
            }],
            otherwise: vec![Stmt::when(
                Test::EmptySequence(element).negate(),
                vec![Stmt::Push {
                    list: flattened,
                    item: element,
                }],
            )],
        };

        out.push(Stmt::If {
            test: Test::Sequence(VALUE).negate(),
            then: vec![null(VALUE)],
            otherwise: vec![
                Stmt::assign(flattened, Expr::List(Vec::new())),
                Stmt::ForEach {
                    item: element,
                    source: VALUE,
                    body: vec![splice],
                },
                Stmt::copy(VALUE, flattened),
            ],
        });
        Ok(())
    }

    fn lower_projection(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        let [left, right] = children::<2>(node)?;
        self.lower(left, out)?;

        // no declared source projects over arrays, like an explicit `array`
        let guard = match node.source {
            Some(SourceKind::Object) => Test::Mapping(VALUE),
            Some(SourceKind::Array) | None => Test::Sequence(VALUE),
        };

        let base = self.temp("base");
        let collected = self.temp("collected");
        let element = self.temp("element");

        let mut body = vec![Stmt::copy(VALUE, element)];
        self.lower(right, &mut body)?;
        body.push(Stmt::when(
            Test::Null(VALUE).negate(),
            vec![Stmt::Push {
                list: collected,
                item: VALUE,
            }],
        ));

        out.push(Stmt::If {
            test: guard.negate(),
            then: vec![null(VALUE)],
            otherwise: vec![
                Stmt::copy(base, VALUE),
                Stmt::assign(collected, Expr::List(Vec::new())),
                Stmt::ForEach {
                    item: element,
                    source: base,
                    body,
                },
                Stmt::copy(VALUE, collected),
            ],
        });
        Ok(())
    }

    fn lower_comparator(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        let op = node
            .name()
            .and_then(Comparator::from_name)
            .ok_or_else(|| malformed(node, "unknown comparison operator"))?;
        let [left, right] = children::<2>(node)?;

        let saved = self.temp("saved");
        let saved_current = self.temp("saved_current");
        let lhs = self.temp("left");
        let rhs = self.temp("right");
        let result = self.temp("result");

        out.push(Stmt::copy(saved, VALUE));
        out.push(Stmt::copy(saved_current, CURRENT));
        self.lower(left, out)?;
        out.push(Stmt::copy(lhs, VALUE));

        out.push(Stmt::copy(VALUE, saved));
        out.push(Stmt::copy(CURRENT, saved_current));
        self.lower(right, out)?;
        out.push(Stmt::copy(rhs, VALUE));

        out.push(Stmt::assign(
            result,
            Expr::Compare {
                op,
                left: lhs,
                right: rhs,
            },
        ));
        out.push(Stmt::If {
            test: Test::True(result),
            then: vec![Stmt::copy(VALUE, saved)],
            otherwise: vec![null(VALUE)],
        });
        out.push(Stmt::copy(CURRENT, saved_current));
        Ok(())
    }

    fn lower_multi_select(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        let is_hash = node.kind == NodeKind::MultiSelectHash;

        let base = self.temp("base");
        let base_current = self.temp("base_current");
        let selected = self.temp("selected");

        let empty = if is_hash {
            Expr::EmptyObject
        } else {
            Expr::List(Vec::new())
        };
        let mut then = vec![
            Stmt::copy(base, VALUE),
            Stmt::copy(base_current, CURRENT),
            Stmt::assign(selected, empty),
        ];

        for child in &node.children {
            then.push(Stmt::copy(VALUE, base));
            then.push(Stmt::copy(CURRENT, base_current));
            if is_hash {
                if child.kind != NodeKind::KeyValPair {
                    return Err(malformed(node, "entries must be key_val_pair nodes"));
                }
                let key = string_value(child)?;
                let [expr] = children::<1>(child)?;
                self.lower(expr, &mut then)?;
                then.push(Stmt::Insert {
                    object: selected,
                    key: key.to_string(),
                    item: VALUE,
                });
            } else {
                self.lower(child, &mut then)?;
                then.push(Stmt::Push {
                    list: selected,
                    item: VALUE,
                });
            }
        }

        then.push(Stmt::copy(VALUE, selected));
        then.push(Stmt::copy(CURRENT, base_current));

        // a null input stays null
        out.push(Stmt::when(Test::Null(VALUE).negate(), then));
        Ok(())
    }

    fn lower_function_call(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        let name = string_value(node)?;

        let base = self.temp("base");
        let base_current = self.temp("base_current");
        let args = self.temp("args");

        out.push(Stmt::copy(base, VALUE));
        out.push(Stmt::copy(base_current, CURRENT));
        out.push(Stmt::assign(args, Expr::List(Vec::new())));

        for arg in &node.children {
            out.push(Stmt::copy(VALUE, base));
            out.push(Stmt::copy(CURRENT, base_current));
            self.lower(arg, out)?;
            out.push(Stmt::Push { list: args, item: VALUE });
        }

        out.push(Stmt::copy(CURRENT, base_current));
        out.push(Stmt::assign(
            VALUE,
            Expr::Call {
                name: name.to_string(),
                args,
            },
        ));
        Ok(())
    }

    fn lower_slice(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<(), CompileError> {
        let bounds = match &node.value {
            Some(Value::Array(bounds)) if bounds.len() == 3 => bounds,
            _ => return Err(malformed(node, "expected [start, stop, step]")),
        };
        if !bounds.iter().all(|b| matches!(b, Value::Integer(_) | Value::Null)) {
            return Err(malformed(node, "slice bounds must be integers or null"));
        }

        let args = self.temp("args");
        let mut operands = vec![Operand::Slot(VALUE)];
        // null is the "no bound" marker
        operands.extend(bounds.iter().cloned().map(Operand::Literal));

        out.push(Stmt::assign(args, Expr::List(operands)));
        out.push(Stmt::assign(
            VALUE,
            Expr::Call {
                name: "slice".to_string(),
                args,
            },
        ));
        Ok(())
    }
}

/// Compiles `node` with a fresh [`Compiler`].
pub fn compile(node: &Node, options: &CompileOptions) -> Result<Procedure, CompileError> {
    Compiler::new().compile(node, options)
}

fn null(slot: Slot) -> Stmt {
    Stmt::assign(slot, Expr::Literal(Value::Null))
}

fn malformed(node: &Node, reason: &str) -> CompileError {
    CompileError::MalformedNode {
        kind: node.kind.name().to_string(),
        reason: reason.to_string(),
        node: node.to_string(),
    }
}

fn children<const N: usize>(node: &Node) -> Result<&[Node; N], CompileError> {
    node.children
        .as_slice()
        .try_into()
        .map_err(|_| malformed(node, &format!("expected {} children, got {}", N, node.children.len())))
}

fn string_value(node: &Node) -> Result<&str, CompileError> {
    node.name()
        .ok_or_else(|| malformed(node, "expected a string value"))
}
