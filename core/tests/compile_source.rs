use pyll_core::ast::build::*;
use pyll_core::ast::{AstNode, BinaryOperator};
use pyll_core::{compile_source, run_function, ExecOptions, LowerOptions, PyllErrorExt, Source};
use std::fs;
use tempfile::TempDir;

fn write_tree(dir: &TempDir, file: &str, tree: &AstNode) -> Source {
    let path = dir.path().join(file);
    fs::write(&path, serde_json::to_string_pretty(tree).unwrap()).unwrap();
    Source::new(path).expect("tree file should be readable")
}

#[test]
fn serialized_tree_compiles_and_runs() {
    let dir = TempDir::new().unwrap();
    let tree = module(vec![
        def("double", &["x"], vec![ret(binop(name("x"), BinaryOperator::Add, name("x")))]),
        expr_stmt(call("print", vec![call("double", vec![int(21)])])),
    ]);
    let source = write_tree(&dir, "double.json", &tree);
    assert_eq!(source.name, "double.json");

    let ir = compile_source(&source, &LowerOptions::default()).unwrap();
    let outcome = run_function(&ir, "main", &[], &ExecOptions::default()).unwrap();
    assert_eq!(outcome.output, vec![42]);
}

#[test]
fn lowering_errors_surface_through_the_common_error_type() {
    let dir = TempDir::new().unwrap();
    let source = write_tree(&dir, "unbound.json", &module(vec![ret(name("nope"))]));
    let err = compile_source(&source, &LowerOptions::default()).unwrap_err();
    assert_eq!(err.issuer(), "pyll.lower.unbound-name");
    assert!(err.message().contains("'nope'"));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let err = Source::new(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.issuer(), "pyll.source");
    assert!(err.message().starts_with("Cannot read syntax tree"));
}

#[test]
fn options_change_the_entry_function() {
    let dir = TempDir::new().unwrap();
    let source = write_tree(&dir, "entry.json", &module(vec![ret(int(3))]));
    let options = LowerOptions { entry_name: "start".to_string(), ..LowerOptions::default() };
    let ir = compile_source(&source, &options).unwrap();
    assert!(ir.lookup("main").is_none());
    assert_eq!(run_function(&ir, "start", &[], &ExecOptions::default()).unwrap().value, 3);
}
