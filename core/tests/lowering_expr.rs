use pyll_core::ast::build::*;
use pyll_core::ast::{AstNode, BinaryOperator, CompareOperator, UnaryOperator};
use pyll_core::ir::lower::lower_expr::lower_expr;
use pyll_core::ir::lower::lower_stmt::lower_statement;
use pyll_core::ir::lower::{FunctionBuilder, LoweringContext};
use pyll_core::{lower_ast_to_ir, run_function, verify_module, ExecOptions, IrModule, LowerOptions, LoweringErrorKind};

fn lower(tree: &AstNode) -> IrModule {
    let ir = lower_ast_to_ir(tree, &LowerOptions::default()).expect("lowering should succeed");
    verify_module(&ir).expect("module should verify");
    ir
}

fn exec(ir: &IrModule, name: &str, args: &[i32]) -> i32 {
    run_function(ir, name, args, &ExecOptions::default())
        .unwrap_or_else(|e| panic!("running @{} failed: {}\n{}", name, e, ir))
        .value
}

fn params(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn increment_returns_six_for_five() {
    let ir = lower(&module(vec![def(
        "f",
        &["x"],
        vec![ret(binop(name("x"), BinaryOperator::Add, int(1)))],
    )]));
    assert_eq!(exec(&ir, "f", &[5]), 6);
}

#[test]
fn arithmetic_matches_wrapping_i32_evaluation() {
    type Reference = fn(i32, i32) -> Option<i32>;
    let cases: Vec<(AstNode, Reference)> = vec![
        (binop(name("a"), BinaryOperator::Add, name("b")), (|a: i32, b: i32| Some(a.wrapping_add(b))) as Reference),
        (binop(name("a"), BinaryOperator::Sub, name("b")), (|a: i32, b: i32| Some(a.wrapping_sub(b))) as Reference),
        (binop(name("a"), BinaryOperator::Mult, name("b")), (|a: i32, b: i32| Some(a.wrapping_mul(b))) as Reference),
        (neg(name("a")), (|a: i32, _: i32| Some(a.wrapping_neg())) as Reference),
        (
            binop(name("a"), BinaryOperator::Mod, name("b")),
            (|a: i32, b: i32| if b == 0 { None } else { Some(((a as u32) % (b as u32)) as i32) }) as Reference,
        ),
        (
            binop(
                binop(name("a"), BinaryOperator::Mult, int(3)),
                BinaryOperator::Sub,
                neg(binop(name("b"), BinaryOperator::Add, int(7))),
            ),
            (|a: i32, b: i32| Some(a.wrapping_mul(3).wrapping_sub(b.wrapping_add(7).wrapping_neg()))) as Reference,
        ),
    ];
    let inputs = [0, 1, -1, 5, 7, 123_456, -98_765, i32::MAX, i32::MIN];

    for (expr, reference) in cases {
        let tree = module(vec![def("f", &["a", "b"], vec![ret(expr.clone())])]);
        let ir = lower(&tree);
        for &a in inputs.iter() {
            for &b in inputs.iter() {
                let Some(expected) = reference(a, b) else { continue };
                assert_eq!(exec(&ir, "f", &[a, b]), expected, "{} with a={}, b={}", expr, a, b);
            }
        }
    }
}

#[test]
fn literals_wrap_to_32_bits() {
    let ir = lower(&module(vec![def("f", &[], vec![ret(int(1 << 32 | 5))])]));
    assert_eq!(exec(&ir, "f", &[]), 5);
}

#[test]
fn comparisons_are_signed() {
    type Reference = fn(i32, i32) -> bool;
    let ops: [(CompareOperator, Reference); 6] = [
        (CompareOperator::Gt, |a: i32, b: i32| a > b),
        (CompareOperator::GtE, |a: i32, b: i32| a >= b),
        (CompareOperator::Lt, |a: i32, b: i32| a < b),
        (CompareOperator::LtE, |a: i32, b: i32| a <= b),
        (CompareOperator::Eq, |a: i32, b: i32| a == b),
        (CompareOperator::NotEq, |a: i32, b: i32| a != b),
    ];
    let inputs = [-3, -1, 0, 2, i32::MIN, i32::MAX];
    for (op, reference) in ops {
        let ir = lower(&module(vec![def(
            "f",
            &["a", "b"],
            vec![ret(compare(name("a"), op, name("b")))],
        )]));
        for &a in inputs.iter() {
            for &b in inputs.iter() {
                assert_eq!(exec(&ir, "f", &[a, b]), reference(a, b) as i32, "{:?} {} {}", op, a, b);
            }
        }
    }
}

#[test]
fn boolean_operators_never_short_circuit() {
    // def f(a, b): return a and print(b)
    let ir = lower(&module(vec![def(
        "f",
        &["a", "b"],
        vec![ret(and(vec![name("a"), call("print", vec![name("b")])]))],
    )]));

    let outcome = run_function(&ir, "f", &[0, 7], &ExecOptions::default()).unwrap();
    assert_eq!(outcome.output, vec![7], "print must run even though a is 0");
    assert_eq!(outcome.value, 0);

    // def g(): return print(1) or 1 or print(2)
    let ir = lower(&module(vec![def(
        "g",
        &[],
        vec![ret(or(vec![call("print", vec![int(1)]), int(1), call("print", vec![int(2)])]))],
    )]));
    let outcome = run_function(&ir, "g", &[], &ExecOptions::default()).unwrap();
    assert_eq!(outcome.output, vec![1, 2], "operands run left to right, all of them");
    assert_eq!(outcome.value, 1);
}

#[test]
fn boolean_results_are_zero_or_one() {
    let ir = lower(&module(vec![def(
        "f",
        &["a", "b"],
        vec![ret(and(vec![name("a"), name("b")]))],
    )]));
    assert_eq!(exec(&ir, "f", &[5, -3]), 1);
    assert_eq!(exec(&ir, "f", &[5, 0]), 0);

    let ir = lower(&module(vec![def(
        "g",
        &["a"],
        vec![ret(binop(compare(name("a"), CompareOperator::Gt, int(0)), BinaryOperator::Add, int(10)))],
    )]));
    assert_eq!(exec(&ir, "g", &[4]), 11);
    assert_eq!(exec(&ir, "g", &[-4]), 10);
}

#[test]
fn call_arguments_are_passed_in_order() {
    let ir = lower(&module(vec![
        def("sub", &["a", "b"], vec![ret(binop(name("a"), BinaryOperator::Sub, name("b")))]),
        def("f", &[], vec![ret(call("sub", vec![int(10), int(3)]))]),
    ]));
    assert_eq!(exec(&ir, "f", &[]), 7);
}

fn assert_rejected_without_ir(expr: AstNode) {
    let mut ctx = LoweringContext::new(LowerOptions::default());
    let mut fb = FunctionBuilder::new("f", &params(&["a", "b", "c"]));
    let err = lower_expr(&expr, &mut fb, &mut ctx).unwrap_err();
    assert_eq!(err.kind(), LoweringErrorKind::UnsupportedConstruct, "{}", expr);
    assert!(fb.finish().blocks[0].ops.is_empty(), "{} should emit nothing", expr);
}

#[test]
fn chained_comparison_is_rejected() {
    assert_rejected_without_ir(compare_chain(
        name("a"),
        vec![(CompareOperator::Lt, name("b")), (CompareOperator::Lt, name("c"))],
    ));
}

#[test]
fn unsupported_operators_are_rejected() {
    assert_rejected_without_ir(binop(name("a"), BinaryOperator::Div, name("b")));
    assert_rejected_without_ir(binop(name("a"), BinaryOperator::Pow, name("b")));
    assert_rejected_without_ir(unary(UnaryOperator::Not, name("a")));
    assert_rejected_without_ir(compare(name("a"), CompareOperator::Is, name("b")));
    assert_rejected_without_ir(call_kw("print", vec![], vec![("end", name("a"))]));
}

#[test]
fn unsupported_operator_names_the_operator() {
    let tree = module(vec![expr_stmt(binop(int(1), BinaryOperator::FloorDiv, int(2)))]);
    let err = lower_ast_to_ir(&tree, &LowerOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Compiler doesn't support \"FloorDiv\" operator.");
}

#[test]
fn multiple_assignment_targets_are_rejected() {
    // a = b = 1
    let stmt = assign_many(vec![name("a"), name("b")], int(1));
    let mut ctx = LoweringContext::new(LowerOptions::default());
    let mut fb = FunctionBuilder::new("f", &[]);
    let err = lower_statement(&stmt, &mut fb, &mut ctx).unwrap_err();
    assert_eq!(err.kind(), LoweringErrorKind::UnsupportedConstruct);
    let func = fb.finish();
    assert!(func.blocks[0].ops.is_empty());
    assert!(func.slots.is_empty());
}

#[test]
fn unbound_read_fails_before_emitting_a_load() {
    let mut ctx = LoweringContext::new(LowerOptions::default());
    let mut fb = FunctionBuilder::new("f", &[]);
    let err = lower_expr(&name("ghost"), &mut fb, &mut ctx).unwrap_err();
    assert_eq!(err.kind(), LoweringErrorKind::UnboundName);
    assert!(fb.finish().blocks[0].ops.is_empty());

    let tree = module(vec![def("f", &[], vec![ret(name("ghost"))])]);
    let err = lower_ast_to_ir(&tree, &LowerOptions::default()).unwrap_err();
    assert_eq!(err.kind(), LoweringErrorKind::UnboundName);
}

#[test]
fn errors_carry_the_offending_node_location() {
    let bad = binop(name("a"), BinaryOperator::BitXor, int(1)).with_location(pyll_core::Location::at(3, 11));
    let tree = module(vec![def("f", &["a"], vec![ret(bad)])]);
    let err = lower_ast_to_ir(&tree, &LowerOptions::default()).unwrap_err();
    let report = pyll_core::generate_error_report(&err);
    assert_eq!(report, "PYLL | ERROR | 3:11 | Compiler doesn't support \"BitXor\" operator.");
}
