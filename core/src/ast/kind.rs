//! file: core/src/ast/kind.rs
//! description: syntax tree node kinds and operator enums.
//!
//! The tree mirrors the shape an external parser hands over. It deliberately
//! names more constructs than the compiler accepts, so that lowering can
//! reject them with a precise message instead of failing to decode.
//!
use serde::{Deserialize, Serialize};

use super::node::AstNode;

/// Arithmetic and bitwise binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,      // +
    Sub,      // -
    Mult,     // *
    Div,      // /
    FloorDiv, // //
    Mod,      // %
    Pow,      // **
    LShift,   // <<
    RShift,   // >>
    BitOr,    // |
    BitXor,   // ^
    BitAnd,   // &
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mult => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::FloorDiv => "//",
            BinaryOperator::Mod => "%",
            BinaryOperator::Pow => "**",
            BinaryOperator::LShift => "<<",
            BinaryOperator::RShift => ">>",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitAnd => "&",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    USub,   // -
    UAdd,   // +
    Not,    // not
    Invert, // ~
}

impl UnaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOperator::USub => "-",
            UnaryOperator::UAdd => "+",
            UnaryOperator::Not => "not ",
            UnaryOperator::Invert => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOperator {
    And,
    Or,
}

impl BoolOperator {
    pub fn keyword(&self) -> &'static str {
        match self {
            BoolOperator::And => "and",
            BoolOperator::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOperator {
    Eq,    // ==
    NotEq, // !=
    Lt,    // <
    LtE,   // <=
    Gt,    // >
    GtE,   // >=
    Is,
    IsNot,
    In,
    NotIn,
}

impl CompareOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOperator::Eq => "==",
            CompareOperator::NotEq => "!=",
            CompareOperator::Lt => "<",
            CompareOperator::LtE => "<=",
            CompareOperator::Gt => ">",
            CompareOperator::GtE => ">=",
            CompareOperator::Is => "is",
            CompareOperator::IsNot => "is not",
            CompareOperator::In => "in",
            CompareOperator::NotIn => "not in",
        }
    }
}

/// A `name=value` argument at a call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: AstNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstNodeKind {
    Module { body: Vec<AstNode> },

    // statements
    FunctionDef { name: String, params: Vec<String>, body: Vec<AstNode> },
    Assign { targets: Vec<AstNode>, value: Box<AstNode> },
    AugAssign { target: Box<AstNode>, op: BinaryOperator, value: Box<AstNode> },
    Expr { value: Box<AstNode> },
    Return { value: Option<Box<AstNode>> },
    If {
        test: Box<AstNode>,
        body: Vec<AstNode>,
        #[serde(default)]
        orelse: Vec<AstNode>,
    },
    While {
        test: Box<AstNode>,
        body: Vec<AstNode>,
        #[serde(default)]
        orelse: Vec<AstNode>,
    },
    For {
        target: Box<AstNode>,
        iter: Box<AstNode>,
        body: Vec<AstNode>,
        #[serde(default)]
        orelse: Vec<AstNode>,
    },
    Pass,
    Break,
    Continue,

    // expressions
    Constant { value: i64 },
    Str { value: String },
    Name { id: String },
    UnaryOp { op: UnaryOperator, operand: Box<AstNode> },
    BinOp { left: Box<AstNode>, op: BinaryOperator, right: Box<AstNode> },
    BoolOp { op: BoolOperator, values: Vec<AstNode> },
    Compare { left: Box<AstNode>, ops: Vec<CompareOperator>, comparators: Vec<AstNode> },
    Call {
        func: Box<AstNode>,
        args: Vec<AstNode>,
        #[serde(default)]
        keywords: Vec<Keyword>,
    },
    Attribute { value: Box<AstNode>, attr: String },
}

impl AstNodeKind {
    /// The node kind's name as it appears in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            AstNodeKind::Module { .. } => "Module",
            AstNodeKind::FunctionDef { .. } => "FunctionDef",
            AstNodeKind::Assign { .. } => "Assign",
            AstNodeKind::AugAssign { .. } => "AugAssign",
            AstNodeKind::Expr { .. } => "Expr",
            AstNodeKind::Return { .. } => "Return",
            AstNodeKind::If { .. } => "If",
            AstNodeKind::While { .. } => "While",
            AstNodeKind::For { .. } => "For",
            AstNodeKind::Pass => "Pass",
            AstNodeKind::Break => "Break",
            AstNodeKind::Continue => "Continue",
            AstNodeKind::Constant { .. } => "Constant",
            AstNodeKind::Str { .. } => "Str",
            AstNodeKind::Name { .. } => "Name",
            AstNodeKind::UnaryOp { .. } => "UnaryOp",
            AstNodeKind::BinOp { .. } => "BinOp",
            AstNodeKind::BoolOp { .. } => "BoolOp",
            AstNodeKind::Compare { .. } => "Compare",
            AstNodeKind::Call { .. } => "Call",
            AstNodeKind::Attribute { .. } => "Attribute",
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            AstNodeKind::Constant { .. }
                | AstNodeKind::Str { .. }
                | AstNodeKind::Name { .. }
                | AstNodeKind::UnaryOp { .. }
                | AstNodeKind::BinOp { .. }
                | AstNodeKind::BoolOp { .. }
                | AstNodeKind::Compare { .. }
                | AstNodeKind::Call { .. }
                | AstNodeKind::Attribute { .. }
        )
    }
}
