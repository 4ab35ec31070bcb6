//! Literal syntax for values embedded in generated source.
//!
//! Every literal in a compiled query is written into the generated listing
//! with [`to_literal()`]. The encoding is structural and lossless for the
//! JSON value types:
//!
//! - **Integers and floats stay distinct** - floats always carry a decimal
//!   point or exponent (`2.0`, `1e300`)
//! - **Strings are escaped** - quotes, backslashes and control characters
//! - **Objects keep insertion order** - the listing is deterministic because
//!   the object itself is ordered
//!
//! # Examples
//!
//! ```
//! use jmespath_compiler::Value;
//! use jmespath_compiler::output::to_literal;
//!
//! assert_eq!(to_literal(&Value::Integer(42)), "42");
//! assert_eq!(to_literal(&Value::Float(2.0)), "2.0");
//! assert_eq!(to_literal(&Value::from("a\"b")), r#""a\"b""#);
//! ```

use indexmap::IndexMap;

use crate::value::Value;

pub struct LiteralPrinter;

impl LiteralPrinter {
    pub fn print(&self, value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => format!("{:?}", n),
            Value::String(s) => self.quote(s),
            Value::Array(arr) => self.print_array(arr),
            Value::Object(obj) => self.print_object(obj),
            Value::Expref(expref) => format!("expref({})", expref.node()),
        }
    }

    fn print_array(&self, arr: &[Value]) -> String {
        let items: Vec<String> = arr.iter().map(|v| self.print(v)).collect();
        format!("[{}]", items.join(", "))
    }

    fn print_object(&self, obj: &IndexMap<String, Value>) -> String {
        if obj.is_empty() {
            return "{}".to_string();
        }

        let items: Vec<String> = obj
            .iter()
            .map(|(k, v)| format!("{}: {}", self.quote(k), self.print(v)))
            .collect();
        format!("{{{}}}", items.join(", "))
    }

    pub fn quote(&self, s: &str) -> String {
        format!("\"{}\"", self.escape_string(s))
    }

    fn escape_string(&self, s: &str) -> String {
        s.chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                '\n' => vec!['\\', 'n'],
                '\r' => vec!['\\', 'r'],
                '\t' => vec!['\\', 't'],
                c if c.is_control() => {
                    // Unicode escape for control chars
                    format!("\\u{:04x}", c as u32).chars().collect()
                }
                c => vec![c],
            })
            .collect()
    }
}

/// Renders a value in the generated code's literal syntax.
pub fn to_literal(value: &Value) -> String {
    LiteralPrinter.print(value)
}

/// Renders a string as a quoted, escaped literal.
pub fn quote(s: &str) -> String {
    LiteralPrinter.quote(s)
}
