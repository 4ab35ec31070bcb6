use jmespath_compiler::{
    CompileError, CompileOptions, Comparator, Node, NodeKind, SourceKind, Value,
    ast::AstError,
    compile,
    compiler::MAX_DEPTH,
};
use serde_json::json;

fn parse(json: serde_json::Value) -> Node {
    Node::from_json(&json).unwrap()
}

fn compile_error(ast: &Node) -> CompileError {
    compile(ast, &CompileOptions::default()).unwrap_err()
}

// ============================================================================
// JSON interchange form
// ============================================================================

#[test]
fn test_parse_subexpression() {
    let node = parse(json!({"type": "subexpression", "children": [
        {"type": "field", "value": "a"},
        {"type": "field", "value": "b"}
    ]}));
    assert_eq!(node, Node::subexpression(Node::field("a"), Node::field("b")));
}

#[test]
fn test_parse_accepts_kind_member() {
    let node = parse(json!({"kind": "index", "value": -1}));
    assert_eq!(node, Node::index(-1));
}

#[test]
fn test_parse_kind_aliases() {
    assert_eq!(parse(json!({"type": "identity"})).kind, NodeKind::Current);
    assert_eq!(parse(json!({"type": "expref", "children": [{"type": "current"}]})).kind, NodeKind::ExpressionReference);
    assert_eq!(parse(json!({"type": "function-expression", "value": "f"})).kind, NodeKind::FunctionCall);
    assert_eq!(parse(json!({"type": "multi_select_dict"})).kind, NodeKind::MultiSelectHash);
    assert_eq!(parse(json!({"type": "or_expression"})).kind, NodeKind::Or);
}

#[test]
fn test_parse_unknown_kind_is_kept() {
    let node = parse(json!({"type": "wildcard"}));
    assert_eq!(node.kind, NodeKind::Unknown("wildcard".to_string()));
}

#[test]
fn test_parse_slice_bounds_from_children() {
    let node = parse(json!({"type": "slice", "children": [1, null, -1]}));
    assert_eq!(node, Node::slice(Some(1), None, Some(-1)));
}

#[test]
fn test_parse_projection_source() {
    let node = parse(json!({"type": "projection", "source": "object", "children": [
        {"type": "current"},
        {"type": "field", "value": "a"}
    ]}));
    assert_eq!(node.source, Some(SourceKind::Object));

    let node = parse(json!({"type": "projection", "source": null, "children": []}));
    assert_eq!(node.source, None);
}

#[test]
fn test_parse_literal_keeps_number_kinds() {
    assert_eq!(parse(json!({"type": "literal", "value": 2})).value, Some(Value::Integer(2)));
    assert_eq!(parse(json!({"type": "literal", "value": 2.0})).value, Some(Value::Float(2.0)));
}

#[test]
fn test_json_round_trip() {
    let ast = Node::projection(
        Node::field("people"),
        Node::condition(
            Node::comparator(Comparator::GreaterEqual, Node::field("age"), Node::literal(30)),
            Node::multi_select_hash(vec![("n", Node::field("name"))]),
        ),
        Some(SourceKind::Array),
    );
    assert_eq!(Node::from_json(&ast.to_json()).unwrap(), ast);
    assert_eq!(Node::from_json_str(&ast.to_string()).unwrap(), ast);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(Node::from_json(&json!([1])), Err(AstError::ExpectedNode(_))));
    assert!(matches!(Node::from_json(&json!({"value": 1})), Err(AstError::MissingKind(_))));
    assert!(matches!(Node::from_json_str("{\"type\": "), Err(AstError::InvalidJson(_))));
    assert_eq!(
        Node::from_json(&json!({"type": "pipe", "children": "x"})),
        Err(AstError::InvalidChildren {
            kind: "pipe".to_string()
        })
    );
    assert_eq!(
        Node::from_json(&json!({"type": "projection", "source": "set"})),
        Err(AstError::InvalidSource("\"set\"".to_string()))
    );
}

#[test]
fn test_parse_error_in_child_propagates() {
    let result = Node::from_json(&json!({"type": "pipe", "children": [
        {"type": "current"},
        {"value": "no kind"}
    ]}));
    assert!(matches!(result, Err(AstError::MissingKind(_))));
}

// ============================================================================
// Compile errors
// ============================================================================

#[test]
fn test_unknown_node_kind() {
    let ast = Node::subexpression(Node::field("a"), parse(json!({"type": "wildcard"})));
    assert_eq!(
        compile_error(&ast),
        CompileError::UnknownNode {
            kind: "wildcard".to_string(),
            node: r#"{"type":"wildcard"}"#.to_string(),
        }
    );
}

#[test]
fn test_unknown_node_message_names_the_kind() {
    let err = compile_error(&parse(json!({"type": "wildcard"})));
    assert_eq!(
        err.to_string(),
        r#"no lowering rule for node kind "wildcard": {"type":"wildcard"}"#
    );
}

#[test]
fn test_malformed_nodes() {
    let cases = vec![
        ("subexpression", Node::new(NodeKind::Subexpression).with_children(vec![Node::current()])),
        ("field", Node::new(NodeKind::Field)),
        ("index", Node::new(NodeKind::Index).with_value("0")),
        ("literal", Node::new(NodeKind::Literal)),
        ("comparator", Node::new(NodeKind::Comparator).with_value("~").with_children(vec![Node::current(), Node::current()])),
        ("slice", Node::new(NodeKind::Slice).with_value(vec![Value::Integer(1), Value::Null])),
        ("slice", Node::new(NodeKind::Slice).with_value(vec![Value::Float(1.0), Value::Null, Value::Null])),
        ("multi_select_hash", Node::new(NodeKind::MultiSelectHash).with_children(vec![Node::field("a")])),
        ("function_call", Node::new(NodeKind::FunctionCall)),
        ("not", Node::new(NodeKind::Not)),
    ];

    for (kind, node) in cases {
        match compile_error(&node) {
            CompileError::MalformedNode { kind: actual, .. } => assert_eq!(actual, kind),
            other => panic!("expected a malformed {} node, got {:?}", kind, other),
        }
    }
}

#[test]
fn test_malformed_message() {
    let node = Node::new(NodeKind::Pipe).with_children(vec![Node::current()]);
    assert_eq!(
        compile_error(&node).to_string(),
        r#"malformed pipe node (expected 2 children, got 1): {"type":"pipe","children":[{"type":"current"}]}"#
    );
}

#[test]
fn test_invalid_procedure_names() {
    for name in ["", "1abc", "has space", "dash-name", "ünï"] {
        assert_eq!(
            compile(&Node::current(), &CompileOptions::new(name, "")).unwrap_err(),
            CompileError::InvalidName(name.to_string())
        );
    }
}

#[test]
fn test_valid_procedure_names() {
    for name in ["_", "_x1", "CamelCase", "snake_case_2"] {
        let procedure = compile(&Node::current(), &CompileOptions::new(name, "")).unwrap();
        assert_eq!(procedure.name(), name);
        assert!(procedure.source().starts_with(&format!("fn {}(interpreter, value) {{", name)));
    }
}

fn nested_nots(depth: usize) -> Node {
    let mut node = Node::current();
    for _ in 1..depth {
        node = Node::not(node);
    }
    node
}

#[test]
fn test_depth_limit() {
    assert!(compile(&nested_nots(MAX_DEPTH), &CompileOptions::default()).is_ok());
    assert_eq!(
        compile_error(&nested_nots(MAX_DEPTH + 1)),
        CompileError::TooDeep { limit: MAX_DEPTH }
    );
}
