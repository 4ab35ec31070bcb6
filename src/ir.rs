//! Instructions of a compiled procedure.
//!
//! A procedure body is a tree of [`Stmt`]s over named slots. The compiler
//! builds it, [`render`] writes it out as source text one instruction per
//! line, and the procedure executes it.
//!
//! Slot 0 is `value` (the procedure's parameter and result) and slot 1 is
//! `current`; every other slot is a temporary named by the symbol
//! generator.

use std::sync::Arc;

use crate::{
    ast::{Comparator, Node},
    emitter::CodeEmitter,
    output::{quote, to_literal},
    value::Value,
};

/// A storage cell of the procedure frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(pub(crate) usize);

/// The running result register
pub const VALUE: Slot = Slot(0);

/// The context baseline register
pub const CURRENT: Slot = Slot(1);

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Slot(Slot),
    Literal(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Load(Slot),
    /// Member of an object, null when absent or not an object
    Field { source: Slot, name: String },
    /// Array element, null when out of range or not an array
    Element { source: Slot, index: Operand },
    /// `length(source) + delta` for arrays, null otherwise
    Offset { source: Slot, delta: i64 },
    List(Vec<Operand>),
    EmptyObject,
    Compare { op: Comparator, left: Slot, right: Slot },
    /// Negated truthiness, as a boolean
    Not(Slot),
    Call { name: String, args: Slot },
    Expref(Arc<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Test {
    Null(Slot),
    Sequence(Slot),
    Mapping(Slot),
    Falsy(Slot),
    True(Slot),
    EmptySequence(Slot),
    NonEmptySequence(Slot),
    Not(Box<Test>),
}

impl Test {
    pub fn negate(self) -> Test {
        Test::Not(Box::new(self))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign { target: Slot, expr: Expr },
    If { test: Test, then: Vec<Stmt>, otherwise: Vec<Stmt> },
    /// Iterates array elements, or object values
    ForEach { item: Slot, source: Slot, body: Vec<Stmt> },
    Push { list: Slot, item: Slot },
    Extend { list: Slot, items: Slot },
    Insert { object: Slot, key: String, item: Slot },
}

impl Stmt {
    pub fn assign(target: Slot, expr: Expr) -> Stmt {
        Stmt::Assign { target, expr }
    }

    pub fn copy(target: Slot, source: Slot) -> Stmt {
        Stmt::Assign {
            target,
            expr: Expr::Load(source),
        }
    }

    pub fn when(test: Test, then: Vec<Stmt>) -> Stmt {
        Stmt::If {
            test,
            then,
            otherwise: Vec::new(),
        }
    }
}

/// Writes a procedure out as source text.
pub fn render(name: &str, display: &str, slots: &[String], body: &[Stmt]) -> String {
    let mut renderer = Renderer {
        slots,
        emitter: CodeEmitter::new(),
    };

    for line in display.lines() {
        renderer.emitter.emit(&format!("// {}", line));
    }
    let param = renderer.name(VALUE).to_string();
    renderer
        .emitter
        .emit(&format!("fn {}(interpreter, {}) {{", name, param));
    renderer.emitter.indent();
    renderer.block(body);
    renderer.emitter.emit(&format!("return {};", param));
    renderer.emitter.outdent();
    renderer.emitter.emit("}");
    renderer.emitter.finish()
}

struct Renderer<'a> {
    slots: &'a [String],
    emitter: CodeEmitter,
}

impl Renderer<'_> {
    fn name(&self, slot: Slot) -> &str {
        &self.slots[slot.0]
    }

    fn block(&mut self, body: &[Stmt]) {
        for stmt in body {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { target, expr } => {
                let line = format!("{} = {};", self.name(*target), self.expr(expr));
                self.emitter.emit(&line);
            }
            Stmt::If {
                test,
                then,
                otherwise,
            } => {
                let line = format!("if {} {{", self.test(test));
                self.emitter.emit(&line);
                self.emitter.indent();
                self.block(then);
                self.emitter.outdent();
                if !otherwise.is_empty() {
                    self.emitter.emit("} else {");
                    self.emitter.indent();
                    self.block(otherwise);
                    self.emitter.outdent();
                }
                self.emitter.emit("}");
            }
            Stmt::ForEach { item, source, body } => {
                let line = format!(
                    "for {} in iterate({}) {{",
                    self.name(*item),
                    self.name(*source)
                );
                self.emitter.emit(&line);
                self.emitter.indent();
                self.block(body);
                self.emitter.outdent();
                self.emitter.emit("}");
            }
            Stmt::Push { list, item } => {
                let line = format!("push({}, {});", self.name(*list), self.name(*item));
                self.emitter.emit(&line);
            }
            Stmt::Extend { list, items } => {
                let line = format!("extend({}, {});", self.name(*list), self.name(*items));
                self.emitter.emit(&line);
            }
            Stmt::Insert { object, key, item } => {
                let line = format!(
                    "insert({}, {}, {});",
                    self.name(*object),
                    quote(key),
                    self.name(*item)
                );
                self.emitter.emit(&line);
            }
        }
    }

    fn operand(&self, operand: &Operand) -> String {
        match operand {
            Operand::Slot(slot) => self.name(*slot).to_string(),
            Operand::Literal(value) => to_literal(value),
        }
    }

    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(value) => to_literal(value),
            Expr::Load(slot) => self.name(*slot).to_string(),
            Expr::Field { source, name } => format!("field({}, {})", self.name(*source), quote(name)),
            Expr::Element { source, index } => {
                format!("element({}, {})", self.name(*source), self.operand(index))
            }
            Expr::Offset { source, delta } if *delta < 0 => {
                format!("length({}) - {}", self.name(*source), delta.unsigned_abs())
            }
            Expr::Offset { source, delta } => format!("length({}) + {}", self.name(*source), delta),
            Expr::List(items) => {
                let items: Vec<String> = items.iter().map(|op| self.operand(op)).collect();
                format!("[{}]", items.join(", "))
            }
            Expr::EmptyObject => "{}".to_string(),
            Expr::Compare { op, left, right } if op.is_ordering() => format!(
                "is_int({l}) && is_int({r}) && {l} {} {r}",
                op.symbol(),
                l = self.name(*left),
                r = self.name(*right)
            ),
            Expr::Compare { op, left, right } => {
                let negate = if *op == Comparator::NotEqual { "!" } else { "" };
                format!("{}equals({}, {})", negate, self.name(*left), self.name(*right))
            }
            Expr::Not(slot) => format!("!truthy({})", self.name(*slot)),
            Expr::Call { name, args } => format!(
                "interpreter.functions.invoke({}, {})",
                quote(name),
                self.name(*args)
            ),
            Expr::Expref(node) => format!("expref({})", node),
        }
    }

    fn test(&self, test: &Test) -> String {
        match test {
            Test::Null(slot) => format!("is_null({})", self.name(*slot)),
            Test::Sequence(slot) => format!("is_sequence({})", self.name(*slot)),
            Test::Mapping(slot) => format!("is_mapping({})", self.name(*slot)),
            Test::Falsy(slot) => format!("!truthy({})", self.name(*slot)),
            Test::True(slot) => format!("{} == true", self.name(*slot)),
            Test::EmptySequence(slot) => format!("is_empty_sequence({})", self.name(*slot)),
            Test::NonEmptySequence(slot) => format!("is_nonempty_sequence({})", self.name(*slot)),
            Test::Not(inner) => match inner.as_ref() {
                Test::Falsy(slot) => format!("truthy({})", self.name(*slot)),
                Test::True(slot) => format!("{} != true", self.name(*slot)),
                inner => format!("!{}", self.test(inner)),
            },
        }
    }
}
