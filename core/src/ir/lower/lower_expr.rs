//! file: core/src/ir/lower/lower_expr.rs
//! description: expression lowering.
//!
//! Every expression lowers to a single `Value` in the current block.
//! Expressions never create blocks: boolean operators evaluate all of their
//! operands, so control flow only comes from statements.
//!
use crate::ast::{AstNode, AstNodeKind, BinaryOperator, BoolOperator, CompareOperator, UnaryOperator};
use crate::ir::op::{BinaryOp, ICmpPredicate};
use crate::ir::value::Value;

use super::err::LoweringError;
use super::function_builder::FunctionBuilder;
use super::lowering_context::LoweringContext;

pub fn lower_expr(
    expr: &AstNode,
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<Value, LoweringError> {
    lower_expr_kind(expr, fb, ctx).map_err(|e| e.at(expr))
}

/// Lower `expr` and coerce the result to `i1` (`!= 0`).
pub fn lower_condition(
    expr: &AstNode,
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<Value, LoweringError> {
    let value = lower_expr(expr, fb, ctx)?;
    fb.coerce_to_bool(value).map_err(|e| e.at(expr))
}

fn lower_int_operand(
    expr: &AstNode,
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<Value, LoweringError> {
    let value = lower_expr(expr, fb, ctx)?;
    fb.coerce_to_int(value)
}

fn binary_op(op: BinaryOperator) -> Option<BinaryOp> {
    match op {
        BinaryOperator::Add => Some(BinaryOp::Add),
        BinaryOperator::Sub => Some(BinaryOp::Sub),
        BinaryOperator::Mult => Some(BinaryOp::Mul),
        BinaryOperator::Mod => Some(BinaryOp::URem),
        BinaryOperator::Div
        | BinaryOperator::FloorDiv
        | BinaryOperator::Pow
        | BinaryOperator::LShift
        | BinaryOperator::RShift
        | BinaryOperator::BitOr
        | BinaryOperator::BitXor
        | BinaryOperator::BitAnd => None,
    }
}

fn compare_predicate(op: CompareOperator) -> Option<ICmpPredicate> {
    match op {
        CompareOperator::Gt => Some(ICmpPredicate::Sgt),
        CompareOperator::GtE => Some(ICmpPredicate::Sge),
        CompareOperator::Lt => Some(ICmpPredicate::Slt),
        CompareOperator::LtE => Some(ICmpPredicate::Sle),
        CompareOperator::Eq => Some(ICmpPredicate::Eq),
        CompareOperator::NotEq => Some(ICmpPredicate::Ne),
        CompareOperator::Is | CompareOperator::IsNot | CompareOperator::In | CompareOperator::NotIn => None,
    }
}

fn lower_expr_kind(
    expr: &AstNode,
    fb: &mut FunctionBuilder,
    ctx: &mut LoweringContext,
) -> Result<Value, LoweringError> {
    match expr.get_kind() {
        AstNodeKind::Constant { value } => Ok(Value::int(*value)),

        AstNodeKind::Name { id } => fb.read_variable(id),

        AstNodeKind::UnaryOp { op, operand } => match op {
            UnaryOperator::USub => {
                let v = lower_int_operand(operand, fb, ctx)?;
                fb.build_neg(v)
            }
            UnaryOperator::UAdd | UnaryOperator::Not | UnaryOperator::Invert => {
                Err(LoweringError::unsupported(&format!("\"{:?}\" operator", op)))
            }
        },

        AstNodeKind::BinOp { left, op, right } => {
            let Some(bin) = binary_op(*op) else {
                return Err(LoweringError::unsupported(&format!("\"{:?}\" operator", op)));
            };
            let lhs = lower_int_operand(left, fb, ctx)?;
            let rhs = lower_int_operand(right, fb, ctx)?;
            fb.build_binary(bin, lhs, rhs)
        }

        AstNodeKind::BoolOp { op, values } => {
            if values.is_empty() {
                return Err(LoweringError::unsupported("empty boolean expression"));
            }
            // no short-circuit: every operand is lowered before combining
            let mut operands = Vec::with_capacity(values.len());
            for v in values.iter() {
                operands.push(lower_condition(v, fb, ctx)?);
            }
            let combine = match op {
                BoolOperator::And => BinaryOp::And,
                BoolOperator::Or => BinaryOp::Or,
            };
            let mut result = operands[0];
            for rhs in operands.into_iter().skip(1) {
                result = fb.build_binary(combine, result, rhs)?;
            }
            Ok(result)
        }

        AstNodeKind::Compare { left, ops, comparators } => {
            if ops.len() != 1 || comparators.len() != 1 {
                return Err(LoweringError::unsupported("multiple comparison expression"));
            }
            let Some(pred) = compare_predicate(ops[0]) else {
                return Err(LoweringError::unsupported(&format!("\"{:?}\" operator", ops[0])));
            };
            let lhs = lower_int_operand(left, fb, ctx)?;
            let rhs = lower_int_operand(&comparators[0], fb, ctx)?;
            fb.build_icmp(pred, lhs, rhs)
        }

        AstNodeKind::Call { func, args, keywords } => {
            if !keywords.is_empty() {
                return Err(LoweringError::unsupported("keyword arguments"));
            }
            let AstNodeKind::Name { id } = func.get_kind() else {
                return Err(LoweringError::unsupported(&format!(
                    "calling a \"{}\" expression",
                    func.get_kind().name()
                ))
                .at(func));
            };
            let callee = ctx.resolve_callee(id, args.len())?;
            let mut values = Vec::with_capacity(args.len());
            for arg in args.iter() {
                values.push(lower_int_operand(arg, fb, ctx)?);
            }
            fb.build_call(callee, values)
        }

        AstNodeKind::Str { .. } | AstNodeKind::Attribute { .. } => Err(LoweringError::unsupported(
            &format!("\"{}\" expressions", expr.get_kind().name()),
        )),

        AstNodeKind::Module { .. }
        | AstNodeKind::FunctionDef { .. }
        | AstNodeKind::Assign { .. }
        | AstNodeKind::AugAssign { .. }
        | AstNodeKind::Expr { .. }
        | AstNodeKind::Return { .. }
        | AstNodeKind::If { .. }
        | AstNodeKind::While { .. }
        | AstNodeKind::For { .. }
        | AstNodeKind::Pass
        | AstNodeKind::Break
        | AstNodeKind::Continue => Err(LoweringError::unsupported(&format!(
            "\"{}\" in expression position",
            expr.get_kind().name()
        ))),
    }
}
