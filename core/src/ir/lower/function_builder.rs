//! file: core/src/ir/lower/function_builder.rs
//! description: per-function build state used while lowering one body.
//!
//! `FunctionBuilder` owns the blocks under construction, the insertion
//! cursor, parameter bindings and the slot table. Every instruction the
//! lowering engine produces goes through it, which is where the block
//! invariants (one terminator, nothing after it) are enforced.

use std::collections::HashMap;

use crate::ir::function::{Block, BlockId, Function, Signature, Slot};
use crate::ir::module::FunctionId;
use crate::ir::op::{BinaryOp, ICmpPredicate, IROp, Terminator};
use crate::ir::value::{InstId, SlotId, Type, Value};

use super::err::{LoweringError, LoweringErrorKind};

pub struct FunctionBuilder {
    name: String,
    params: Vec<String>,
    param_values: HashMap<String, Value>,
    blocks: Vec<Block>,
    slots: Vec<Slot>,
    slot_table: HashMap<String, SlotId>,
    label_uses: HashMap<String, usize>,
    cursor: BlockId,
    next_inst: usize,
}

impl FunctionBuilder {
    /// Start a function: allocate `entry`, put the cursor there and bind
    /// each parameter name to its incoming value.
    pub fn new(name: &str, params: &[String]) -> Self {
        let mut fb = FunctionBuilder {
            name: name.to_string(),
            params: params.to_vec(),
            param_values: HashMap::new(),
            blocks: Vec::new(),
            slots: Vec::new(),
            slot_table: HashMap::new(),
            label_uses: HashMap::new(),
            cursor: BlockId(0),
            next_inst: 0,
        };
        for (index, p) in params.iter().enumerate() {
            // a repeated parameter name binds to its first position
            fb.param_values.entry(p.clone()).or_insert(Value::Param { index });
        }
        let entry = fb.new_block("entry");
        fb.cursor = entry;
        fb
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> Signature {
        Signature::new(self.params.len())
    }

    /// Append a block. Labels are made unique within the function by
    /// suffixing `.1`, `.2`, ... on reuse. The cursor does not move.
    pub fn new_block(&mut self, label: &str) -> BlockId {
        let uses = self.label_uses.entry(label.to_string()).or_insert(0);
        let unique = if *uses == 0 { label.to_string() } else { format!("{}.{}", label, uses) };
        *uses += 1;
        let id = BlockId(self.blocks.len());
        self.blocks.push(Block::new(unique));
        log::trace!("@{}: new block {}", self.name, self.blocks[id.0].label);
        id
    }

    pub fn set_insertion_point(&mut self, block: BlockId) {
        self.cursor = block;
    }

    pub fn insertion_block(&self) -> BlockId {
        self.cursor
    }

    pub fn is_terminated(&self) -> bool {
        self.blocks[self.cursor.0].is_terminated()
    }

    pub fn block_label(&self, block: BlockId) -> &str {
        &self.blocks[block.0].label
    }

    pub fn param(&self, name: &str) -> Option<Value> {
        self.param_values.get(name).copied()
    }

    pub fn slot(&self, name: &str) -> Option<SlotId> {
        self.slot_table.get(name).copied()
    }

    /// Parameters win over slots, so a parameter that has been assigned to
    /// still reads as its incoming value.
    pub fn read_variable(&mut self, name: &str) -> Result<Value, LoweringError> {
        if let Some(v) = self.param(name) {
            return Ok(v);
        }
        match self.slot(name) {
            Some(slot) => self.build_load(slot),
            None => Err(LoweringError::new(
                LoweringErrorKind::UnboundName,
                format!("Name '{}' is not defined in function '{}'.", name, self.name),
            )),
        }
    }

    /// Store into the slot for `name`, creating the slot on first write.
    /// Writing a parameter name creates a shadow slot that reads never see.
    pub fn write_variable(&mut self, name: &str, value: Value) -> Result<(), LoweringError> {
        let value = self.coerce_to_int(value)?;
        let slot = match self.slot(name) {
            Some(slot) => slot,
            None => {
                let slot = SlotId(self.slots.len());
                self.slots.push(Slot { name: name.to_string() });
                self.slot_table.insert(name.to_string(), slot);
                slot
            }
        };
        self.emit_op(IROp::Store { value, slot })
    }

    fn fresh(&mut self) -> InstId {
        let id = InstId(self.next_inst);
        self.next_inst += 1;
        id
    }

    fn closed_block_error(&self) -> LoweringError {
        LoweringError::new(
            LoweringErrorKind::ClosedBlock,
            format!(
                "Block '{}' in function '{}' is already terminated.",
                self.blocks[self.cursor.0].label, self.name
            ),
        )
    }

    pub fn emit_op(&mut self, op: IROp) -> Result<(), LoweringError> {
        if self.is_terminated() {
            return Err(self.closed_block_error());
        }
        self.blocks[self.cursor.0].ops.push(op);
        Ok(())
    }

    pub fn emit_terminator(&mut self, term: Terminator) -> Result<(), LoweringError> {
        if self.is_terminated() {
            return Err(self.closed_block_error());
        }
        self.blocks[self.cursor.0].terminator = Some(term);
        Ok(())
    }

    pub fn build_load(&mut self, slot: SlotId) -> Result<Value, LoweringError> {
        let dest = self.fresh();
        self.emit_op(IROp::Load { dest, slot })?;
        Ok(Value::Inst { id: dest, ty: Type::I32 })
    }

    pub fn build_binary(&mut self, op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, LoweringError> {
        let ty = lhs.ty();
        let dest = self.fresh();
        self.emit_op(IROp::Binary { dest, op, ty, lhs, rhs })?;
        Ok(Value::Inst { id: dest, ty })
    }

    pub fn build_neg(&mut self, operand: Value) -> Result<Value, LoweringError> {
        let dest = self.fresh();
        self.emit_op(IROp::Neg { dest, operand })?;
        Ok(Value::Inst { id: dest, ty: Type::I32 })
    }

    pub fn build_icmp(&mut self, pred: ICmpPredicate, lhs: Value, rhs: Value) -> Result<Value, LoweringError> {
        let dest = self.fresh();
        self.emit_op(IROp::ICmp { dest, pred, lhs, rhs })?;
        Ok(Value::Inst { id: dest, ty: Type::I1 })
    }

    pub fn build_call(&mut self, callee: FunctionId, args: Vec<Value>) -> Result<Value, LoweringError> {
        let dest = self.fresh();
        self.emit_op(IROp::Call { dest, callee, args })?;
        Ok(Value::Inst { id: dest, ty: Type::I32 })
    }

    /// Widen an `i1` to `i32`; `i32` values pass through.
    pub fn coerce_to_int(&mut self, value: Value) -> Result<Value, LoweringError> {
        if value.ty() == Type::I32 {
            return Ok(value);
        }
        let dest = self.fresh();
        self.emit_op(IROp::ZExt { dest, operand: value })?;
        Ok(Value::Inst { id: dest, ty: Type::I32 })
    }

    /// Truthiness is always `value != 0`; `i1` values are already booleans.
    pub fn coerce_to_bool(&mut self, value: Value) -> Result<Value, LoweringError> {
        if value.ty() == Type::I1 {
            return Ok(value);
        }
        self.build_icmp(ICmpPredicate::Ne, Value::int(0), value)
    }

    pub fn build_ret(&mut self, value: Value) -> Result<(), LoweringError> {
        let value = self.coerce_to_int(value)?;
        self.emit_terminator(Terminator::Ret { value })
    }

    pub fn build_br(&mut self, target: BlockId) -> Result<(), LoweringError> {
        self.emit_terminator(Terminator::Br { target })
    }

    pub fn build_cond_br(&mut self, cond: Value, then_block: BlockId, else_block: BlockId) -> Result<(), LoweringError> {
        self.emit_terminator(Terminator::CondBr { cond, then_block, else_block })
    }

    /// Hand the finished body over for registration in the module.
    pub fn finish(self) -> Function {
        Function {
            signature: Signature::new(self.params.len()),
            name: self.name,
            params: self.params,
            blocks: self.blocks,
            slots: self.slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn starts_in_entry_with_parameters_bound() {
        let fb = FunctionBuilder::new("f", &params(&["a", "b"]));
        assert_eq!(fb.block_label(fb.insertion_block()), "entry");
        assert_eq!(fb.param("b"), Some(Value::Param { index: 1 }));
        assert_eq!(fb.param("c"), None);
    }

    #[test]
    fn new_block_uniquifies_labels_and_keeps_cursor() {
        let mut fb = FunctionBuilder::new("f", &[]);
        let a = fb.new_block("if.then");
        let b = fb.new_block("if.then");
        let c = fb.new_block("if.then");
        assert_eq!(fb.block_label(a), "if.then");
        assert_eq!(fb.block_label(b), "if.then.1");
        assert_eq!(fb.block_label(c), "if.then.2");
        assert_eq!(fb.block_label(fb.insertion_block()), "entry");
    }

    #[test]
    fn slots_are_allocated_once_per_name() {
        let mut fb = FunctionBuilder::new("f", &[]);
        fb.write_variable("x", Value::int(1)).unwrap();
        fb.write_variable("x", Value::int(2)).unwrap();
        fb.write_variable("y", Value::int(3)).unwrap();
        let func = fb.finish();
        assert_eq!(func.slots.len(), 2);
        assert_eq!(func.blocks[0].ops.len(), 3);
    }

    #[test]
    fn unbound_read_emits_nothing() {
        let mut fb = FunctionBuilder::new("f", &[]);
        let err = fb.read_variable("ghost").unwrap_err();
        assert_eq!(err.kind(), LoweringErrorKind::UnboundName);
        assert!(fb.finish().blocks[0].ops.is_empty());
    }

    #[test]
    fn parameter_writes_go_to_a_shadow_slot_reads_never_see() {
        let mut fb = FunctionBuilder::new("f", &params(&["x"]));
        fb.write_variable("x", Value::int(42)).unwrap();
        assert!(fb.slot("x").is_some());
        assert_eq!(fb.read_variable("x").unwrap(), Value::Param { index: 0 });
    }

    #[test]
    fn terminated_block_rejects_more_instructions() {
        let mut fb = FunctionBuilder::new("f", &[]);
        fb.build_ret(Value::int(0)).unwrap();
        let err = fb.build_ret(Value::int(1)).unwrap_err();
        assert_eq!(err.kind(), LoweringErrorKind::ClosedBlock);
        let err = fb.write_variable("x", Value::int(1)).unwrap_err();
        assert_eq!(err.kind(), LoweringErrorKind::ClosedBlock);
    }

    #[test]
    fn bool_coercion_compares_against_zero() {
        let mut fb = FunctionBuilder::new("f", &params(&["n"]));
        let b = fb.coerce_to_bool(Value::Param { index: 0 }).unwrap();
        assert_eq!(b.ty(), Type::I1);
        // already boolean: no second compare
        let again = fb.coerce_to_bool(b).unwrap();
        assert_eq!(again, b);
        let func = fb.finish();
        assert_eq!(
            func.blocks[0].ops,
            vec![IROp::ICmp {
                dest: InstId(0),
                pred: ICmpPredicate::Ne,
                lhs: Value::int(0),
                rhs: Value::Param { index: 0 },
            }]
        );
    }
}
