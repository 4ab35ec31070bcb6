#![cfg(feature = "cli")]

use jmespath_compiler::{
    CompileError, CompileOptions, RuntimeError,
    cli::{CliError, CompileCommand, RunOptions, execute_compile, execute_run},
};
use serde_json::json;

const PROJECT_NAMES: &str = r#"{"type": "projection", "source": "array", "children": [
    {"type": "field", "value": "people"},
    {"type": "field", "value": "name"}
]}"#;

fn run(ast: &str, input: &str) -> Result<serde_json::Value, CliError> {
    execute_run(&RunOptions {
        ast: ast.to_string(),
        input: Some(input.to_string()),
    })
}

#[test]
fn test_compile_command() {
    let procedure = execute_compile(&CompileCommand {
        ast: PROJECT_NAMES.to_string(),
        options: CompileOptions::new("names", "people[*].name"),
    })
    .unwrap();

    assert_eq!(procedure.name(), "names");
    assert!(procedure.source().starts_with("// people[*].name\nfn names(interpreter, value) {\n"));
}

#[test]
fn test_compile_command_rejects_bad_name() {
    let result = execute_compile(&CompileCommand {
        ast: PROJECT_NAMES.to_string(),
        options: CompileOptions::new("not a name", ""),
    });
    assert!(matches!(
        result,
        Err(CliError::Compile(CompileError::InvalidName(_)))
    ));
}

#[test]
fn test_run_command() {
    let output = run(
        PROJECT_NAMES,
        r#"{"people": [{"name": "ana"}, {"age": 3}, {"name": "bo"}]}"#,
    )
    .unwrap();
    assert_eq!(output, json!(["ana", "bo"]));
}

#[test]
fn test_run_keeps_integers_and_floats_apart() {
    let ast = r#"{"type": "multi_select_list", "children": [
        {"type": "field", "value": "i"},
        {"type": "field", "value": "f"}
    ]}"#;
    let output = run(ast, r#"{"i": 1, "f": 1.0}"#).unwrap();
    assert_eq!(serde_json::to_string(&output).unwrap(), "[1,1.0]");
}

#[test]
fn test_run_without_input() {
    let result = execute_run(&RunOptions {
        ast: PROJECT_NAMES.to_string(),
        input: None,
    });
    assert!(matches!(result, Err(CliError::NoInput)));
}

#[test]
fn test_run_with_invalid_input() {
    assert!(matches!(run(PROJECT_NAMES, "{not json"), Err(CliError::Json(_))));
}

#[test]
fn test_run_with_invalid_ast() {
    assert!(matches!(run("[1, 2]", "{}"), Err(CliError::Ast(_))));
    assert!(matches!(
        run(r#"{"type": "wildcard"}"#, "{}"),
        Err(CliError::Compile(CompileError::UnknownNode { .. }))
    ));
}

#[test]
fn test_run_has_no_function_library() {
    let ast = r#"{"type": "function_call", "value": "length", "children": [{"type": "current"}]}"#;
    let err = run(ast, "[1, 2]").unwrap_err();
    assert!(matches!(
        err,
        CliError::Runtime(RuntimeError::UnknownFunction { ref name }) if name == "length"
    ));
    assert_eq!(err.to_string(), "Evaluation error: unknown function: length()");
}
