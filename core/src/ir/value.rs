use serde::Serialize;

/// IR value types. `I32` is the language's only scalar; `I1` carries the
/// results of comparisons and boolean coercions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    I1,
    I32,
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::I1 => write!(f, "i1"),
            Type::I32 => write!(f, "i32"),
        }
    }
}

/// Result number of an instruction, unique within its function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InstId(pub usize);

/// Index into a function's slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlotId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Value {
    Const { ty: Type, value: i32 },
    Param { index: usize },
    Inst { id: InstId, ty: Type },
}

impl Value {
    /// An `i32` constant. Wider literals wrap to 32 bits.
    pub fn int(value: i64) -> Self {
        Value::Const { ty: Type::I32, value: value as i32 }
    }

    pub fn bool(value: bool) -> Self {
        Value::Const { ty: Type::I1, value: value as i32 }
    }

    pub fn ty(&self) -> Type {
        match self {
            Value::Const { ty, .. } => *ty,
            Value::Param { .. } => Type::I32,
            Value::Inst { ty, .. } => *ty,
        }
    }
}
