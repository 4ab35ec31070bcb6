use std::{mem, sync::Arc};

use indexmap::IndexMap;

use crate::{
    ast::Comparator,
    ir::{self, Expr, Operand, Slot, Stmt, Test, VALUE},
    runtime::{Expref, RuntimeError, TreeInterpreter},
    value::Value,
};

/// A compiled query.
///
/// Holds the generated source listing and the instructions it describes.
/// A procedure is immutable once built: [`call`](Procedure::call) keeps all
/// evaluation state in a per-call frame, so one procedure can serve any
/// number of concurrent callers.
#[derive(Debug, Clone)]
pub struct Procedure {
    name: String,
    display: String,
    slots: Vec<String>,
    body: Vec<Stmt>,
    source: String,
}

impl Procedure {
    pub(crate) fn new(name: String, display: String, slots: Vec<String>, body: Vec<Stmt>) -> Self {
        let source = ir::render(&name, &display, &slots, &body);
        tracing::debug!(
            procedure = %name,
            lines = source.lines().count(),
            "procedure generated"
        );
        Procedure {
            name,
            display,
            slots,
            body,
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The query text the procedure was compiled from, if one was given
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Generated source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of every slot, `value` and `current` first
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn body(&self) -> &[Stmt] {
        &self.body
    }

    /// Runs the procedure against `root`.
    ///
    /// `interpreter` is captured by expression references and routes
    /// function calls to its dispatcher. Data that does not fit the query
    /// yields null; only the host's functions or interpreter can fail.
    #[tracing::instrument(level = "trace", skip_all, fields(procedure = %self.name))]
    pub fn call(&self, interpreter: &Arc<dyn TreeInterpreter>, root: Value) -> Result<Value, RuntimeError> {
        let mut frame = Frame {
            slots: vec![Value::Null; self.slots.len()],
            interpreter,
        };
        frame.set(VALUE, root);
        frame.run(&self.body)?;
        Ok(mem::replace(&mut frame.slots[VALUE.0], Value::Null))
    }
}

struct Frame<'a> {
    slots: Vec<Value>,
    interpreter: &'a Arc<dyn TreeInterpreter>,
}

impl Frame<'_> {
    fn get(&self, slot: Slot) -> &Value {
        &self.slots[slot.0]
    }

    fn set(&mut self, slot: Slot, value: Value) {
        self.slots[slot.0] = value;
    }

    fn run(&mut self, block: &[Stmt]) -> Result<(), RuntimeError> {
        for stmt in block {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<(), RuntimeError> {
        match stmt {
            Stmt::Assign { target, expr } => {
                let value = self.eval(expr)?;
                self.set(*target, value);
            }
            Stmt::If {
                test,
                then,
                otherwise,
            } => {
                if self.test(test) {
                    self.run(then)?;
                } else {
                    self.run(otherwise)?;
                }
            }
            Stmt::ForEach { item, source, body } => {
                let items: Vec<Value> = match self.get(*source) {
                    Value::Array(arr) => arr.clone(),
                    Value::Object(obj) => obj.values().cloned().collect(),
                    _ => Vec::new(),
                };
                for element in items {
                    self.set(*item, element);
                    self.run(body)?;
                }
            }
            Stmt::Push { list, item } => {
                let item = self.get(*item).clone();
                if let Value::Array(arr) = &mut self.slots[list.0] {
                    arr.push(item);
                }
            }
            Stmt::Extend { list, items } => {
                if let Value::Array(items) = self.get(*items).clone()
                    && let Value::Array(arr) = &mut self.slots[list.0]
                {
                    arr.extend(items);
                }
            }
            Stmt::Insert { object, key, item } => {
                let item = self.get(*item).clone();
                if let Value::Object(obj) = &mut self.slots[object.0] {
                    obj.insert(key.clone(), item);
                }
            }
        }
        Ok(())
    }

    fn eval(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        let value = match expr {
            Expr::Literal(value) => value.clone(),
            Expr::Load(slot) => self.get(*slot).clone(),
            Expr::Field { source, name } => match self.get(*source) {
                Value::Object(obj) => obj.get(name).cloned().unwrap_or(Value::Null),
                _ => Value::Null,
            },
            Expr::Element { source, index } => {
                let index = match index {
                    Operand::Slot(slot) => self.get(*slot).as_int(),
                    Operand::Literal(value) => value.as_int(),
                };
                match (self.get(*source), index) {
                    (Value::Array(arr), Some(i)) if i >= 0 => {
                        arr.get(i as usize).cloned().unwrap_or(Value::Null)
                    }
                    _ => Value::Null,
                }
            }
            Expr::Offset { source, delta } => match self.get(*source) {
                Value::Array(arr) => Value::Integer(arr.len() as i64 + delta),
                _ => Value::Null,
            },
            Expr::List(items) => Value::Array(items.iter().map(|op| self.operand(op)).collect()),
            Expr::EmptyObject => Value::Object(IndexMap::new()),
            Expr::Compare { op, left, right } => {
                let (a, b) = (self.get(*left), self.get(*right));
                let result = match op {
                    Comparator::Equal => a.deep_eq(b),
                    Comparator::NotEqual => !a.deep_eq(b),
                    // ordering is only defined between integers
                    op => match (a, b) {
                        (Value::Integer(a), Value::Integer(b)) => op.compare_ints(*a, *b),
                        _ => false,
                    },
                };
                Value::Boolean(result)
            }
            Expr::Not(slot) => Value::Boolean(!self.get(*slot).is_truthy()),
            Expr::Call { name, args } => {
                let args = match self.get(*args) {
                    Value::Array(args) => args.clone(),
                    other => vec![other.clone()],
                };
                tracing::trace!(function = %name, arity = args.len(), "invoking function");
                self.interpreter.functions().invoke(name, args)?
            }
            Expr::Expref(node) => Value::Expref(Expref::new(Arc::clone(node), Arc::clone(self.interpreter))),
        };
        Ok(value)
    }

    fn operand(&self, operand: &Operand) -> Value {
        match operand {
            Operand::Slot(slot) => self.get(*slot).clone(),
            Operand::Literal(value) => value.clone(),
        }
    }

    fn test(&self, test: &Test) -> bool {
        match test {
            Test::Null(slot) => self.get(*slot).is_null(),
            Test::Sequence(slot) => self.get(*slot).is_sequence(),
            Test::Mapping(slot) => self.get(*slot).is_mapping(),
            Test::Falsy(slot) => !self.get(*slot).is_truthy(),
            Test::True(slot) => matches!(self.get(*slot), Value::Boolean(true)),
            Test::EmptySequence(slot) => matches!(self.get(*slot), Value::Array(arr) if arr.is_empty()),
            Test::NonEmptySequence(slot) => {
                matches!(self.get(*slot), Value::Array(arr) if !arr.is_empty())
            }
            Test::Not(inner) => !self.test(inner),
        }
    }
}
