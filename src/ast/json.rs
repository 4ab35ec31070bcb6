//! JSON interchange form of an AST.
//!
//! A node is an object with a `type` (or `kind`) member and optional
//! `value`, `children` and `source` members:
//!
//! ```json
//! {"type": "subexpression", "children": [
//!     {"type": "field", "value": "a"},
//!     {"type": "field", "value": "b"}
//! ]}
//! ```
//!
//! Slices may carry their bounds either as `value` or, as some parsers emit
//! them, as raw `children` (`{"type": "slice", "children": [1, null, 2]}`).

use serde_json::{Map, Value as Json};
use thiserror::Error;

use crate::{
    ast::{Node, NodeKind, SourceKind},
    convert::{json_to_value, value_to_json},
};

/// Problems in the JSON form of an AST.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AstError {
    #[error("expected an AST node object, got {0}")]
    ExpectedNode(String),

    #[error("AST node has no \"type\" member: {0}")]
    MissingKind(String),

    #[error("\"children\" of a {kind} node must be an array")]
    InvalidChildren { kind: String },

    #[error("invalid AST JSON: {0}")]
    InvalidJson(String),

    #[error("unknown projection source {0}, expected \"array\" or \"object\"")]
    InvalidSource(String),
}

impl Node {
    /// Reads a node (and its subtree) from its JSON form.
    ///
    /// Unknown kind names are not an error here; they become
    /// [`NodeKind::Unknown`] and are rejected by the compiler.
    pub fn from_json(json: &Json) -> Result<Node, AstError> {
        let obj = json
            .as_object()
            .ok_or_else(|| AstError::ExpectedNode(json.to_string()))?;

        let kind = obj
            .get("type")
            .or_else(|| obj.get("kind"))
            .and_then(Json::as_str)
            .map(NodeKind::from_name)
            .ok_or_else(|| AstError::MissingKind(json.to_string()))?;

        let mut node = Node::new(kind);
        node.value = obj.get("value").cloned().map(json_to_value);

        if let Some(source) = obj.get("source").filter(|s| !s.is_null()) {
            let name = source.as_str().unwrap_or_default();
            let source = SourceKind::from_name(name)
                .ok_or_else(|| AstError::InvalidSource(source.to_string()))?;
            node.source = Some(source);
        }

        match obj.get("children") {
            None | Some(Json::Null) => {}
            Some(Json::Array(children)) if node.kind == NodeKind::Slice => {
                if node.value.is_none() {
                    node.value = Some(json_to_value(Json::Array(children.clone())));
                }
            }
            Some(Json::Array(children)) => {
                node.children = children
                    .iter()
                    .map(Node::from_json)
                    .collect::<Result<_, _>>()?;
            }
            Some(_) => {
                return Err(AstError::InvalidChildren {
                    kind: node.kind.name().to_string(),
                });
            }
        }

        Ok(node)
    }

    /// Parses a node from JSON text.
    pub fn from_json_str(text: &str) -> Result<Node, AstError> {
        let json: Json =
            serde_json::from_str(text).map_err(|e| AstError::InvalidJson(e.to_string()))?;
        Node::from_json(&json)
    }

    /// Writes the node back to its JSON form.
    pub fn to_json(&self) -> Json {
        let mut obj = Map::new();
        obj.insert("type".to_string(), Json::String(self.kind.name().to_string()));
        if let Some(value) = &self.value {
            obj.insert("value".to_string(), value_to_json(value));
        }
        if !self.children.is_empty() {
            obj.insert(
                "children".to_string(),
                Json::Array(self.children.iter().map(Node::to_json).collect()),
            );
        }
        if let Some(source) = self.source {
            obj.insert("source".to_string(), Json::String(source.name().to_string()));
        }
        Json::Object(obj)
    }
}
