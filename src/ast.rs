//! # Query AST
//!
//! This module defines the tree the compiler consumes. The tree is produced
//! by an external JMESPath parser; this crate only reads it.
//!
//! ## Architecture Overview
//!
//! - **[node]** - The [`Node`] type and constructors for every node kind
//! - **[kind]** - The closed set of node kinds ([`NodeKind`]) and projection
//!   source kinds ([`SourceKind`])
//! - **[comparator]** - Comparison operators used by `comparator` nodes
//! - **[json]** - The JSON interchange form of a node
//!
//! ## Node Shape
//!
//! Every node has the same generic shape: a `kind`, an optional scalar
//! `value`, ordered `children`, and (for projections) an optional `source`.
//! What `value` and `children` mean depends on the kind:
//!
//! | Kind | value | children |
//! |---|---|---|
//! | `field` | field name | - |
//! | `index` | integer index | - |
//! | `literal` | the literal | - |
//! | `comparator` | operator | left, right |
//! | `function_call` | function name | arguments |
//! | `key_val_pair` | key | value expression |
//! | `slice` | `[start, stop, step]`, `null` for absent | - |
//! | `pipe`, `or`, `and`, `subexpression`, `projection`, `condition` | - | left, right |
//! | `flatten`, `not`, `expression_reference` | - | child |
//!
//! ## Example
//!
//! The query ``people[?age > `30`].name`` is the tree:
//!
//! ```
//! use jmespath_compiler::ast::{Comparator, Node, SourceKind};
//!
//! let ast = Node::projection(
//!     Node::field("people"),
//!     Node::condition(
//!         Node::comparator(Comparator::GreaterThan, Node::field("age"), Node::literal(30)),
//!         Node::field("name"),
//!     ),
//!     Some(SourceKind::Array),
//! );
//! assert_eq!(ast.children.len(), 2);
//! ```
pub mod comparator;
pub mod json;
pub mod kind;
pub mod node;

pub use comparator::Comparator;
pub use json::AstError;
pub use kind::{NodeKind, SourceKind};
pub use node::Node;
