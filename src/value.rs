use indexmap::IndexMap;

use crate::runtime::Expref;

/// A JSON-like value handled by compiled procedures.
///
/// Integers and floats are kept apart: ordering comparators only accept
/// integers, so the distinction is observable in query results.
///
/// Objects preserve insertion order, which keeps multi-select hashes in the
/// order their keys were written.
///
/// # Examples
///
/// ```
/// use jmespath_compiler::Value;
/// use indexmap::IndexMap;
///
/// let array = Value::Array(vec![Value::Integer(1), Value::Float(2.5)]);
///
/// let mut obj = IndexMap::new();
/// obj.insert("key".to_string(), Value::String("value".to_string()));
/// let object = Value::Object(obj);
///
/// assert!(array.is_sequence());
/// assert!(object.is_mapping());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Ordered sequence of values
    Array(Vec<Value>),

    /// Mapping with string keys, in insertion order
    Object(IndexMap<String, Value>),

    /// Deferred expression produced by an expression reference
    Expref(Expref),
}

impl Value {
    /// Builds an object from key/value pairs, keeping their order.
    pub fn object<K: Into<String>>(pairs: Vec<(K, Value)>) -> Value {
        Value::Object(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Query-language truthiness.
    ///
    /// Falsy values are null, `false`, the empty string, the empty array and
    /// the empty object. Every number is truthy, zero included.
    pub fn is_truthy(&self) -> bool {
        use Value::*;
        match self {
            Null => false,
            Boolean(b) => *b,
            Float(_) | Integer(_) => true,
            String(s) => !s.is_empty(),
            Array(arr) => !arr.is_empty(),
            Object(obj) => !obj.is_empty(),
            Expref(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Deep equality as the query language defines it.
    ///
    /// Unlike `==`, numbers compare by numeric value (`1 == 1.0`) and objects
    /// compare regardless of key order.
    pub fn deep_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Integer(a), Value::Float(b)) | (Value::Float(b), Value::Integer(a)) => {
                *a as f64 == *b
            }
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.deep_eq(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.deep_eq(w)))
            }
            (a, b) => a == b,
        }
    }

    /// Number of elements for arrays and objects, characters for strings.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(arr) => Some(arr.len()),
            Value::Object(obj) => Some(obj.len()),
            Value::String(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Human-readable type name, as reported in runtime errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) | Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Expref(_) => "expref",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_numeral_strings_are_truthy() {
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::Float(0.0).is_truthy());
        assert!(Value::from("0").is_truthy());
    }

    #[test]
    fn empty_containers_are_falsy() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());
        assert!(!Value::Object(IndexMap::new()).is_truthy());
    }

    #[test]
    fn deep_eq_ignores_number_representation_and_key_order() {
        assert!(Value::Integer(1).deep_eq(&Value::Float(1.0)));

        let mut a = IndexMap::new();
        a.insert("x".to_string(), Value::Integer(1));
        a.insert("y".to_string(), Value::Integer(2));
        let mut b = IndexMap::new();
        b.insert("y".to_string(), Value::Float(2.0));
        b.insert("x".to_string(), Value::Integer(1));

        assert!(Value::Object(a).deep_eq(&Value::Object(b)));
        assert!(!Value::from("1").deep_eq(&Value::Integer(1)));
    }
}
