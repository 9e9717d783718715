use serde::Serialize;

use super::function::BlockId;
use super::module::FunctionId;
use super::value::{InstId, SlotId, Type, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    URem,
    And,
    Or,
}

impl BinaryOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::URem => "urem",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }
}

/// Signed integer comparison predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ICmpPredicate {
    Eq,
    Ne,
    Sgt,
    Sge,
    Slt,
    Sle,
}

impl ICmpPredicate {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            ICmpPredicate::Eq => "eq",
            ICmpPredicate::Ne => "ne",
            ICmpPredicate::Sgt => "sgt",
            ICmpPredicate::Sge => "sge",
            ICmpPredicate::Slt => "slt",
            ICmpPredicate::Sle => "sle",
        }
    }

    pub fn evaluate(&self, lhs: i32, rhs: i32) -> bool {
        match self {
            ICmpPredicate::Eq => lhs == rhs,
            ICmpPredicate::Ne => lhs != rhs,
            ICmpPredicate::Sgt => lhs > rhs,
            ICmpPredicate::Sge => lhs >= rhs,
            ICmpPredicate::Slt => lhs < rhs,
            ICmpPredicate::Sle => lhs <= rhs,
        }
    }
}

/// Non-terminator instructions. Every variant with a `dest` defines exactly
/// one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IROp {
    Load { dest: InstId, slot: SlotId },
    Store { value: Value, slot: SlotId },
    Binary { dest: InstId, op: BinaryOp, ty: Type, lhs: Value, rhs: Value },
    Neg { dest: InstId, operand: Value },
    ICmp { dest: InstId, pred: ICmpPredicate, lhs: Value, rhs: Value },
    ZExt { dest: InstId, operand: Value },
    Call { dest: InstId, callee: FunctionId, args: Vec<Value> },
}

impl IROp {
    pub fn dest(&self) -> Option<InstId> {
        match self {
            IROp::Store { .. } => None,
            IROp::Load { dest, .. }
            | IROp::Binary { dest, .. }
            | IROp::Neg { dest, .. }
            | IROp::ICmp { dest, .. }
            | IROp::ZExt { dest, .. }
            | IROp::Call { dest, .. } => Some(*dest),
        }
    }

    pub fn operands(&self) -> Vec<Value> {
        match self {
            IROp::Load { .. } => Vec::new(),
            IROp::Store { value, .. } => vec![*value],
            IROp::Binary { lhs, rhs, .. } | IROp::ICmp { lhs, rhs, .. } => vec![*lhs, *rhs],
            IROp::Neg { operand, .. } | IROp::ZExt { operand, .. } => vec![*operand],
            IROp::Call { args, .. } => args.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Terminator {
    Ret { value: Value },
    Br { target: BlockId },
    CondBr { cond: Value, then_block: BlockId, else_block: BlockId },
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Ret { .. } => Vec::new(),
            Terminator::Br { target } => vec![*target],
            Terminator::CondBr { then_block, else_block, .. } => vec![*then_block, *else_block],
        }
    }
}
