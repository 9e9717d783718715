//! Lowering for statement nodes.
//!
//! Statements are where blocks come from: `if` and `while` build their
//! block topology here, and `return` closes the current block. Code that
//! follows a terminator is lowered into a fresh `unreachable` block so no
//! block ever gets a second terminator.
//!
//! See also: `ir::lower::lower_expr` for expression lowering.

use crate::ast::{AstNode, AstNodeKind};
use crate::ir::value::Value;

use super::err::LoweringError;
use super::function_builder::FunctionBuilder;
use super::lower_expr::{lower_condition, lower_expr};
use super::lowering_context::LoweringContext;

pub fn lower_block(
    stmts: &[AstNode],
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<(), LoweringError> {
    for stmt in stmts.iter() {
        if fb.is_terminated() {
            let dead = fb.new_block("unreachable");
            fb.set_insertion_point(dead);
        }
        lower_statement(stmt, fb, ctx)?;
    }
    Ok(())
}

pub fn lower_statement(
    stmt: &AstNode,
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<(), LoweringError> {
    lower_statement_kind(stmt, fb, ctx).map_err(|e| e.at(stmt))
}

fn lower_statement_kind(
    stmt: &AstNode,
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<(), LoweringError> {
    match stmt.get_kind() {
        AstNodeKind::Assign { targets, value } => {
            if targets.len() != 1 {
                return Err(LoweringError::unsupported("multiple variable assignment"));
            }
            let AstNodeKind::Name { id } = targets[0].get_kind() else {
                return Err(LoweringError::unsupported(&format!(
                    "assignment to a \"{}\" target",
                    targets[0].get_kind().name()
                ))
                .at(&targets[0]));
            };
            let rhs = lower_expr(value, fb, ctx)?;
            fb.write_variable(id, rhs)
        }

        AstNodeKind::Expr { value } => {
            lower_expr(value, fb, ctx)?;
            Ok(())
        }

        AstNodeKind::Return { value } => {
            let v = match value {
                Some(v) => lower_expr(v, fb, ctx)?,
                None => Value::int(0),
            };
            fb.build_ret(v)
        }

        AstNodeKind::If { test, body, orelse } => lower_if(test, body, orelse, fb, ctx),

        AstNodeKind::While { test, body, orelse } => {
            if !orelse.is_empty() {
                return Err(LoweringError::unsupported("While - else statement"));
            }
            lower_while(test, body, fb, ctx)
        }

        AstNodeKind::FunctionDef { name, params, body } => {
            super::lower_function(ctx, name, params, body)?;
            Ok(())
        }

        AstNodeKind::AugAssign { op, .. } => Err(LoweringError::unsupported(&format!(
            "augmented assignment (\"{}=\")",
            op.symbol()
        ))),

        AstNodeKind::For { .. } | AstNodeKind::Pass | AstNodeKind::Break | AstNodeKind::Continue => Err(
            LoweringError::unsupported(&format!("\"{}\" statement", stmt.get_kind().name())),
        ),

        AstNodeKind::Module { .. } => Err(LoweringError::unsupported("nested \"Module\" node")),

        // a bare expression in statement position behaves like `Expr`
        AstNodeKind::Constant { .. }
        | AstNodeKind::Str { .. }
        | AstNodeKind::Name { .. }
        | AstNodeKind::UnaryOp { .. }
        | AstNodeKind::BinOp { .. }
        | AstNodeKind::BoolOp { .. }
        | AstNodeKind::Compare { .. }
        | AstNodeKind::Call { .. }
        | AstNodeKind::Attribute { .. } => {
            lower_expr(stmt, fb, ctx)?;
            Ok(())
        }
    }
}

fn lower_if(
    test: &AstNode,
    body: &[AstNode],
    orelse: &[AstNode],
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<(), LoweringError> {
    let cond = lower_condition(test, fb, ctx)?;
    let then_block = fb.new_block("if.then");
    let else_block = fb.new_block("if.else");
    fb.build_cond_br(cond, then_block, else_block)?;

    // created only once some arm falls through
    let mut join = None;

    fb.set_insertion_point(then_block);
    lower_block(body, fb, ctx)?;
    if !fb.is_terminated() {
        let end = *join.get_or_insert_with(|| fb.new_block("if.end"));
        fb.build_br(end)?;
    }

    fb.set_insertion_point(else_block);
    // Only the first statement of an else clause is lowered.
    if let Some(first) = orelse.first() {
        if orelse.len() > 1 {
            log::debug!(
                "@{}: else clause has {} statements, lowering only the first",
                fb.name(),
                orelse.len()
            );
        }
        lower_statement(first, fb, ctx)?;
    }
    if !fb.is_terminated() {
        let end = *join.get_or_insert_with(|| fb.new_block("if.end"));
        fb.build_br(end)?;
    }

    if let Some(end) = join {
        fb.set_insertion_point(end);
    }
    Ok(())
}

fn lower_while(
    test: &AstNode,
    body: &[AstNode],
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<(), LoweringError> {
    let test_block = fb.new_block("while.test");
    let body_block = fb.new_block("while.body");
    let end_block = fb.new_block("while.end");

    fb.build_br(test_block)?;
    fb.set_insertion_point(test_block);
    let cond = lower_condition(test, fb, ctx)?;
    // The branch on `cond` is emitted after the body; remember where the
    // test evaluation ended so it is the one and only copy.
    let test_exit = fb.insertion_block();

    fb.set_insertion_point(body_block);
    lower_block(body, fb, ctx)?;
    if !fb.is_terminated() {
        fb.build_br(test_block)?;
    }

    fb.set_insertion_point(test_exit);
    fb.build_cond_br(cond, body_block, end_block)?;
    fb.set_insertion_point(end_block);
    Ok(())
}
