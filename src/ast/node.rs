use std::fmt;

use crate::{
    ast::{Comparator, NodeKind, SourceKind},
    value::Value,
};

/// One node of a query AST.
///
/// The shape is generic (see the table in the [module docs](crate::ast));
/// the constructors below build well-formed nodes of each kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,

    /// Name, index, literal, operator or key, depending on `kind`
    pub value: Option<Value>,

    pub children: Vec<Node>,

    /// Projection source; ignored by every other kind
    pub source: Option<SourceKind>,
}

impl Node {
    /// A bare node of the given kind, with no value and no children.
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            value: None,
            children: Vec::new(),
            source: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn field(name: impl Into<String>) -> Self {
        Node::new(NodeKind::Field).with_value(name.into())
    }

    pub fn index(index: i64) -> Self {
        Node::new(NodeKind::Index).with_value(index)
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Node::new(NodeKind::Literal).with_value(value)
    }

    pub fn current() -> Self {
        Node::new(NodeKind::Current)
    }

    pub fn pipe(left: Node, right: Node) -> Self {
        Node::new(NodeKind::Pipe).with_children(vec![left, right])
    }

    pub fn or(left: Node, right: Node) -> Self {
        Node::new(NodeKind::Or).with_children(vec![left, right])
    }

    pub fn and(left: Node, right: Node) -> Self {
        Node::new(NodeKind::And).with_children(vec![left, right])
    }

    pub fn not(child: Node) -> Self {
        Node::new(NodeKind::Not).with_children(vec![child])
    }

    pub fn subexpression(left: Node, right: Node) -> Self {
        Node::new(NodeKind::Subexpression).with_children(vec![left, right])
    }

    pub fn flatten(child: Node) -> Self {
        Node::new(NodeKind::Flatten).with_children(vec![child])
    }

    pub fn projection(left: Node, right: Node, source: Option<SourceKind>) -> Self {
        Node {
            source,
            ..Node::new(NodeKind::Projection).with_children(vec![left, right])
        }
    }

    pub fn condition(test: Node, body: Node) -> Self {
        Node::new(NodeKind::Condition).with_children(vec![test, body])
    }

    pub fn comparator(op: Comparator, left: Node, right: Node) -> Self {
        Node::new(NodeKind::Comparator)
            .with_value(op.symbol())
            .with_children(vec![left, right])
    }

    pub fn multi_select_list(children: Vec<Node>) -> Self {
        Node::new(NodeKind::MultiSelectList).with_children(children)
    }

    /// `{key: expr, ...}`; entries keep the given order.
    pub fn multi_select_hash<K: Into<String>>(entries: Vec<(K, Node)>) -> Self {
        let children = entries
            .into_iter()
            .map(|(key, node)| Node::key_val_pair(key, node))
            .collect();
        Node::new(NodeKind::MultiSelectHash).with_children(children)
    }

    pub fn key_val_pair(key: impl Into<String>, value: Node) -> Self {
        Node::new(NodeKind::KeyValPair)
            .with_value(key.into())
            .with_children(vec![value])
    }

    pub fn function_call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::new(NodeKind::FunctionCall)
            .with_value(name.into())
            .with_children(args)
    }

    /// `[start:stop:step]`; `None` marks an absent bound.
    pub fn slice(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        let bound = |b: Option<i64>| b.map(Value::Integer).unwrap_or(Value::Null);
        Node::new(NodeKind::Slice).with_value(vec![bound(start), bound(stop), bound(step)])
    }

    pub fn expression_reference(child: Node) -> Self {
        Node::new(NodeKind::ExpressionReference).with_children(vec![child])
    }

    /// The value as a string, for kinds whose value is a name or key.
    pub fn name(&self) -> Option<&str> {
        match &self.value {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
