#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use jmespath_compiler::{
    CompileOptions, FunctionDispatcher, Node, NodeKind, RuntimeError, TreeInterpreter, Value,
    compile, json_to_value, value_to_json,
};

/// A small host: a tree interpreter for simple paths and a handful of
/// functions. Every function call is recorded.
#[derive(Default)]
pub struct Host {
    calls: Mutex<Vec<(String, Vec<Value>)>>,
}

impl Host {
    pub fn new() -> Arc<Host> {
        Arc::new(Host::default())
    }

    pub fn calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl TreeInterpreter for Host {
    fn evaluate(&self, node: &Node, value: &Value) -> Result<Value, RuntimeError> {
        match &node.kind {
            NodeKind::Current => Ok(value.clone()),
            NodeKind::Literal => Ok(node.value.clone().unwrap_or(Value::Null)),
            NodeKind::Field => match (value, node.name()) {
                (Value::Object(obj), Some(name)) => Ok(obj.get(name).cloned().unwrap_or(Value::Null)),
                _ => Ok(Value::Null),
            },
            NodeKind::Index => match (value, node.value.as_ref().and_then(Value::as_int)) {
                (Value::Array(arr), Some(i)) => {
                    let i = if i < 0 { arr.len() as i64 + i } else { i };
                    Ok(usize::try_from(i)
                        .ok()
                        .and_then(|i| arr.get(i))
                        .cloned()
                        .unwrap_or(Value::Null))
                }
                _ => Ok(Value::Null),
            },
            NodeKind::Subexpression => {
                let left = self.evaluate(&node.children[0], value)?;
                if left.is_null() {
                    Ok(Value::Null)
                } else {
                    self.evaluate(&node.children[1], &left)
                }
            }
            other => Err(RuntimeError::Interpreter(format!(
                "fixture cannot evaluate {}",
                other.name()
            ))),
        }
    }

    fn functions(&self) -> &dyn FunctionDispatcher {
        self
    }
}

impl FunctionDispatcher for Host {
    fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), args.clone()));

        match name {
            "length" => {
                let [arg] = arity::<1>(name, args)?;
                arg.len()
                    .map(|n| Value::Integer(n as i64))
                    .ok_or_else(|| invalid_type(name, 0, "array, object or string", &arg))
            }
            "keys" => {
                let [arg] = arity::<1>(name, args)?;
                match arg {
                    Value::Object(obj) => Ok(Value::Array(obj.keys().map(|k| Value::from(k.as_str())).collect())),
                    other => Err(invalid_type(name, 0, "object", &other)),
                }
            }
            "sort_by" => {
                let [list, key] = arity::<2>(name, args)?;
                let (Value::Array(items), Value::Expref(expref)) = (&list, &key) else {
                    return Err(invalid_type(name, 1, "expref", &key));
                };
                let mut keyed = items
                    .iter()
                    .map(|item| Ok((expref.call(item)?, item.clone())))
                    .collect::<Result<Vec<_>, RuntimeError>>()?;
                keyed.sort_by(|(a, _), (b, _)| match (a, b) {
                    (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
                    (Value::String(a), Value::String(b)) => a.cmp(b),
                    _ => std::cmp::Ordering::Equal,
                });
                Ok(Value::Array(keyed.into_iter().map(|(_, item)| item).collect()))
            }
            "slice" => {
                let [target, start, stop, step] = arity::<4>(name, args)?;
                slice(&target, start.as_int(), stop.as_int(), step.as_int())
            }
            _ => Err(RuntimeError::UnknownFunction {
                name: name.to_string(),
            }),
        }
    }
}

fn arity<const N: usize>(name: &str, args: Vec<Value>) -> Result<[Value; N], RuntimeError> {
    let actual = args.len();
    args.try_into().map_err(|_| RuntimeError::Arity {
        name: name.to_string(),
        expected: N,
        actual,
    })
}

fn invalid_type(name: &str, position: usize, expected: &'static str, actual: &Value) -> RuntimeError {
    RuntimeError::InvalidType {
        name: name.to_string(),
        position,
        expected,
        actual: actual.type_name(),
    }
}

/// Python-style slicing of arrays; anything else slices to null.
fn slice(target: &Value, start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Result<Value, RuntimeError> {
    let Value::Array(items) = target else {
        return Ok(Value::Null);
    };
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(RuntimeError::InvalidArgument {
            name: "slice".to_string(),
            reason: "step cannot be 0".to_string(),
        });
    }

    let len = items.len() as i64;
    let clamp = |bound: i64| {
        let bound = if bound < 0 { bound + len } else { bound };
        if step > 0 {
            bound.clamp(0, len)
        } else {
            bound.clamp(-1, len - 1)
        }
    };
    let (mut i, stop) = if step > 0 {
        (start.map_or(0, clamp), stop.map_or(len, clamp))
    } else {
        (start.map_or(len - 1, clamp), stop.map_or(-1, clamp))
    };

    let mut result = Vec::new();
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        result.push(items[i as usize].clone());
        i += step;
    }
    Ok(Value::Array(result))
}

/// Compiles `ast` and runs it against `input` with a fresh [`Host`].
pub fn eval(ast: &Node, input: serde_json::Value) -> serde_json::Value {
    value_to_json(&eval_value(ast, json_to_value(input)))
}

pub fn eval_value(ast: &Node, input: Value) -> Value {
    let procedure = compile(ast, &CompileOptions::default()).unwrap();
    let host: Arc<dyn TreeInterpreter> = Host::new();
    procedure.call(&host, input).unwrap()
}
