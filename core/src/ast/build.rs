//! Shorthand constructors for syntax trees.
//!
//! Embedders that produce trees in memory (and the test suites) use these
//! instead of spelling out `AstNode::new(AstNodeKind::...)` by hand.

use super::kind::{AstNodeKind, BinaryOperator, BoolOperator, CompareOperator, Keyword, UnaryOperator};
use super::node::AstNode;

fn node(kind: AstNodeKind) -> AstNode {
    AstNode::new(kind)
}

pub fn module(body: Vec<AstNode>) -> AstNode {
    node(AstNodeKind::Module { body })
}

pub fn def(name_: &str, params: &[&str], body: Vec<AstNode>) -> AstNode {
    node(AstNodeKind::FunctionDef {
        name: name_.to_string(),
        params: params.iter().map(|p| p.to_string()).collect(),
        body,
    })
}

pub fn assign(target: &str, value: AstNode) -> AstNode {
    node(AstNodeKind::Assign { targets: vec![name(target)], value: Box::new(value) })
}

pub fn assign_many(targets: Vec<AstNode>, value: AstNode) -> AstNode {
    node(AstNodeKind::Assign { targets, value: Box::new(value) })
}

pub fn expr_stmt(value: AstNode) -> AstNode {
    node(AstNodeKind::Expr { value: Box::new(value) })
}

pub fn ret(value: AstNode) -> AstNode {
    node(AstNodeKind::Return { value: Some(Box::new(value)) })
}

pub fn ret_none() -> AstNode {
    node(AstNodeKind::Return { value: None })
}

pub fn if_(test: AstNode, body: Vec<AstNode>, orelse: Vec<AstNode>) -> AstNode {
    node(AstNodeKind::If { test: Box::new(test), body, orelse })
}

pub fn while_(test: AstNode, body: Vec<AstNode>) -> AstNode {
    node(AstNodeKind::While { test: Box::new(test), body, orelse: Vec::new() })
}

pub fn int(value: i64) -> AstNode {
    node(AstNodeKind::Constant { value })
}

pub fn name(id: &str) -> AstNode {
    node(AstNodeKind::Name { id: id.to_string() })
}

pub fn unary(op: UnaryOperator, operand: AstNode) -> AstNode {
    node(AstNodeKind::UnaryOp { op, operand: Box::new(operand) })
}

pub fn neg(operand: AstNode) -> AstNode {
    unary(UnaryOperator::USub, operand)
}

pub fn binop(left: AstNode, op: BinaryOperator, right: AstNode) -> AstNode {
    node(AstNodeKind::BinOp { left: Box::new(left), op, right: Box::new(right) })
}

pub fn and(values: Vec<AstNode>) -> AstNode {
    node(AstNodeKind::BoolOp { op: BoolOperator::And, values })
}

pub fn or(values: Vec<AstNode>) -> AstNode {
    node(AstNodeKind::BoolOp { op: BoolOperator::Or, values })
}

pub fn compare(left: AstNode, op: CompareOperator, right: AstNode) -> AstNode {
    node(AstNodeKind::Compare { left: Box::new(left), ops: vec![op], comparators: vec![right] })
}

pub fn compare_chain(left: AstNode, rest: Vec<(CompareOperator, AstNode)>) -> AstNode {
    let (ops, comparators) = rest.into_iter().unzip();
    node(AstNodeKind::Compare { left: Box::new(left), ops, comparators })
}

pub fn call(callee: &str, args: Vec<AstNode>) -> AstNode {
    node(AstNodeKind::Call { func: Box::new(name(callee)), args, keywords: Vec::new() })
}

pub fn call_kw(callee: &str, args: Vec<AstNode>, keywords: Vec<(&str, AstNode)>) -> AstNode {
    let keywords = keywords
        .into_iter()
        .map(|(arg, value)| Keyword { arg: Some(arg.to_string()), value })
        .collect();
    node(AstNodeKind::Call { func: Box::new(name(callee)), args, keywords })
}
