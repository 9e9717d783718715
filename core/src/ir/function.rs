use serde::Serialize;

use super::op::{IROp, Terminator};
use super::value::SlotId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockId(pub usize);

/// Function type: `arity` parameters of `i32`, returning `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Signature {
    pub arity: usize,
}

impl Signature {
    pub fn new(arity: usize) -> Self {
        Signature { arity }
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "i32 (")?;
        for i in 0..self.arity {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "i32")?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub label: String,
    pub ops: Vec<IROp>,
    pub terminator: Option<Terminator>,
}

impl Block {
    pub fn new(label: String) -> Self {
        Block { label, ops: Vec::new(), terminator: None }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminator.is_some()
    }
}

/// A named `i32` stack cell backing a reassignable local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub name: String,
}

/// A function in the module. With no blocks it is only a declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    pub signature: Signature,
    pub params: Vec<String>,
    pub blocks: Vec<Block>,
    pub slots: Vec<Slot>,
}

impl Function {
    pub fn declaration(name: &str, signature: Signature) -> Self {
        Function {
            name: name.to_string(),
            signature,
            params: Vec::new(),
            blocks: Vec::new(),
            slots: Vec::new(),
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The entry block is always the first one.
    pub fn entry(&self) -> Option<BlockId> {
        if self.blocks.is_empty() { None } else { Some(BlockId(0)) }
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.0]
    }

    pub fn slot(&self, id: SlotId) -> &Slot {
        &self.slots[id.0]
    }

    pub fn block_by_label(&self, label: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.label == label)
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.ops.len() + b.terminator.iter().count()).sum()
    }
}
