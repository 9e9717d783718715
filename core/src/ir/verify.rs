//! Structural checks on a finished module.
//!
//! Lowering is expected to always produce modules that pass; the verifier
//! guards the contract handed to downstream backends.

use std::collections::HashSet;

use crate::error::{Level, PyllErrorExt};
use crate::ir::function::{BlockId, Function};
use crate::ir::module::IrModule;
use crate::ir::op::{IROp, Terminator};
use crate::ir::value::{InstId, Type, Value};
use crate::location::{Location, Span};

#[derive(Debug, Clone)]
pub struct VerifyError {
    function: String,
    message: String,
}

impl VerifyError {
    fn new(function: &str, message: String) -> Self {
        VerifyError { function: function.to_string(), message }
    }

    pub fn function(&self) -> &str {
        &self.function
    }
}

impl std::fmt::Display for VerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "in @{}: {}", self.function, self.message)
    }
}

impl std::error::Error for VerifyError {}

impl PyllErrorExt for VerifyError {
    fn level(&self) -> Level {
        Level::Critical
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "pyll.verify".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

impl From<VerifyError> for Box<dyn PyllErrorExt> {
    fn from(err: VerifyError) -> Self {
        Box::new(err)
    }
}

pub fn verify_module(module: &IrModule) -> Result<(), VerifyError> {
    for (_, func) in module.functions() {
        if !func.is_declaration() {
            verify_function(module, func)?;
        }
    }
    Ok(())
}

fn verify_function(module: &IrModule, func: &Function) -> Result<(), VerifyError> {
    let err = |msg: String| VerifyError::new(&func.name, msg);

    let mut defined: HashSet<InstId> = HashSet::new();
    for block in func.blocks.iter() {
        for op in block.ops.iter() {
            if let Some(dest) = op.dest() {
                if !defined.insert(dest) {
                    return Err(err(format!("%{} is defined more than once", dest.0)));
                }
            }
        }
    }

    let check_value = |value: &Value| -> Result<(), VerifyError> {
        match value {
            Value::Param { index } if *index >= func.params.len() => {
                Err(err(format!("parameter #{} out of range", index)))
            }
            Value::Inst { id, .. } if !defined.contains(id) => {
                Err(err(format!("use of undefined value %{}", id.0)))
            }
            _ => Ok(()),
        }
    };
    let check_block = |target: &BlockId| -> Result<(), VerifyError> {
        if target.0 >= func.blocks.len() {
            Err(err(format!("branch to missing block #{}", target.0)))
        } else {
            Ok(())
        }
    };

    for block in func.blocks.iter() {
        for op in block.ops.iter() {
            for v in op.operands() {
                check_value(&v)?;
            }
            match op {
                IROp::Load { slot, .. } | IROp::Store { slot, .. } if slot.0 >= func.slots.len() => {
                    return Err(err(format!("slot #{} out of range in block '{}'", slot.0, block.label)));
                }
                IROp::Store { value, .. } if value.ty() != Type::I32 => {
                    return Err(err(format!("store of a non-i32 value in block '{}'", block.label)));
                }
                IROp::Binary { ty, lhs, rhs, .. } if lhs.ty() != *ty || rhs.ty() != *ty => {
                    return Err(err(format!("operand type mismatch in block '{}'", block.label)));
                }
                IROp::Call { callee, .. } if callee.0 >= module.len() => {
                    return Err(err(format!("call to unknown function #{}", callee.0)));
                }
                _ => {}
            }
        }

        match &block.terminator {
            None => {
                return Err(err(format!("block '{}' has no terminator", block.label)));
            }
            Some(Terminator::Ret { value }) => check_value(value)?,
            Some(Terminator::Br { target }) => check_block(target)?,
            Some(Terminator::CondBr { cond, then_block, else_block }) => {
                check_value(cond)?;
                if cond.ty() != Type::I1 {
                    return Err(err(format!("conditional branch on non-i1 value in block '{}'", block.label)));
                }
                check_block(then_block)?;
                check_block(else_block)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::function::Signature;
    use crate::ir::lower::{FunctionBuilder, LoweringContext, LowerOptions};

    #[test]
    fn rejects_open_blocks() {
        let mut ctx = LoweringContext::new(LowerOptions::default());
        let id = ctx.begin_function("f", 0).unwrap();
        let mut fb = FunctionBuilder::new("f", &[]);
        let stray = fb.new_block("stray");
        fb.build_br(stray).unwrap();
        ctx.end_function(id, fb);

        let module = ctx.into_module();
        let err = verify_module(&module).unwrap_err();
        assert_eq!(err.function(), "f");
        assert!(err.to_string().contains("'stray' has no terminator"));
    }

    #[test]
    fn declarations_are_not_checked() {
        let mut module = IrModule::new();
        module.declare_or_get("print", Signature::new(1));
        assert!(verify_module(&module).is_ok());
    }
}
