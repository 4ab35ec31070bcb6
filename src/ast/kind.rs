/// Node kinds.
///
/// The set is closed: every kind the compiler knows has a variant. Names
/// read from the interchange form that match no kind are kept as
/// [`NodeKind::Unknown`] so the compiler can reject the node with its full
/// structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Field lookup on an object (`foo`)
    Field,
    /// Array element (`[0]`, `[-1]`)
    Index,
    /// Literal value (`` `[1, 2]` ``, `'raw'`)
    Literal,
    /// `left | right`
    Pipe,
    /// `left || right`
    Or,
    /// `left && right`
    And,
    /// `!expr`
    Not,
    /// `left.right`
    Subexpression,
    /// `[a, b]`
    MultiSelectList,
    /// `{a: x, b: y}`
    MultiSelectHash,
    /// One `key: expr` entry of a multi-select hash
    KeyValPair,
    /// `name(args...)`
    FunctionCall,
    /// `[start:stop:step]`
    Slice,
    /// `@`
    Current,
    /// `&expr`
    ExpressionReference,
    /// `[]`
    Flatten,
    /// `[*]`, `*`, and the projection half of filters and flattens
    Projection,
    /// Filter gate: `[?test]`
    Condition,
    /// `==`, `!=`, `<`, `<=`, `>`, `>=`
    Comparator,
    /// A kind name no lowering rule exists for
    Unknown(String),
}

impl NodeKind {
    /// Resolves a kind name.
    ///
    /// Dashes and underscores are interchangeable, and the kind names used by
    /// common JMESPath parsers (`expref`, `identity`, `function_expression`,
    /// `or_expression`, ...) are accepted as aliases.
    pub fn from_name(name: &str) -> Self {
        let normalized = name.replace('-', "_");
        match normalized.as_str() {
            "field" => NodeKind::Field,
            "index" => NodeKind::Index,
            "literal" => NodeKind::Literal,
            "pipe" => NodeKind::Pipe,
            "or" | "or_expression" => NodeKind::Or,
            "and" | "and_expression" => NodeKind::And,
            "not" | "not_expression" => NodeKind::Not,
            "subexpression" => NodeKind::Subexpression,
            "multi_select_list" => NodeKind::MultiSelectList,
            "multi_select_hash" | "multi_select_dict" => NodeKind::MultiSelectHash,
            "key_val_pair" => NodeKind::KeyValPair,
            "function_call" | "function_expression" => NodeKind::FunctionCall,
            "slice" => NodeKind::Slice,
            "current" | "identity" => NodeKind::Current,
            "expression_reference" | "expref" => NodeKind::ExpressionReference,
            "flatten" => NodeKind::Flatten,
            "projection" => NodeKind::Projection,
            "condition" => NodeKind::Condition,
            "comparator" => NodeKind::Comparator,
            _ => NodeKind::Unknown(name.to_string()),
        }
    }

    /// Canonical name, as written back to the interchange form
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Field => "field",
            NodeKind::Index => "index",
            NodeKind::Literal => "literal",
            NodeKind::Pipe => "pipe",
            NodeKind::Or => "or",
            NodeKind::And => "and",
            NodeKind::Not => "not",
            NodeKind::Subexpression => "subexpression",
            NodeKind::MultiSelectList => "multi_select_list",
            NodeKind::MultiSelectHash => "multi_select_hash",
            NodeKind::KeyValPair => "key_val_pair",
            NodeKind::FunctionCall => "function_call",
            NodeKind::Slice => "slice",
            NodeKind::Current => "current",
            NodeKind::ExpressionReference => "expression_reference",
            NodeKind::Flatten => "flatten",
            NodeKind::Projection => "projection",
            NodeKind::Condition => "condition",
            NodeKind::Comparator => "comparator",
            NodeKind::Unknown(name) => name,
        }
    }
}

/// What a projection iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// List projection; the left side must be an array
    Array,
    /// Object (value) projection; the left side must be an object
    Object,
}

impl SourceKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "array" => Some(SourceKind::Array),
            "object" => Some(SourceKind::Object),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Array => "array",
            SourceKind::Object => "object",
        }
    }
}
