//! file: core/src/ir/lower/lowering_context.rs
//! description: per-compilation state shared by every function being lowered.
//!
//! One `LoweringContext` exists per compilation run and is passed by
//! reference through the lowering engine. It owns the module registry and
//! the options, and remembers which functions are mid-construction so that
//! a body cannot be defined twice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ir::function::Signature;
use crate::ir::module::{FunctionId, IrModule};

use super::err::{LoweringError, LoweringErrorKind};
use super::function_builder::FunctionBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowerOptions {
    /// Name of the function that receives the top-level statements.
    pub entry_name: String,
    /// Declare unseen callees on first call instead of failing.
    pub auto_declare_callees: bool,
    /// Host functions declared before lowering starts, each `i32 (i32)`.
    pub builtins: Vec<String>,
}

impl Default for LowerOptions {
    fn default() -> Self {
        LowerOptions {
            entry_name: "main".to_string(),
            auto_declare_callees: true,
            builtins: vec![super::declare_builtins::PRINT_BUILTIN.to_string()],
        }
    }
}

#[derive(Debug)]
pub struct LoweringContext {
    pub module: IrModule,
    pub options: LowerOptions,
    building: HashSet<FunctionId>,
}

impl LoweringContext {
    pub fn new(options: LowerOptions) -> Self {
        LoweringContext {
            module: super::declare_builtins::declare_builtin_functions(&options.builtins),
            options,
            building: HashSet::new(),
        }
    }

    /// Find the function a call site refers to. Unseen names are declared
    /// with the call's arity when auto-declaration is on.
    pub fn resolve_callee(&mut self, name: &str, arity: usize) -> Result<FunctionId, LoweringError> {
        if self.options.auto_declare_callees {
            Ok(self.module.declare_or_get(name, Signature::new(arity)))
        } else {
            self.module.get(name)
        }
    }

    /// Claim the handle for a function about to be defined.
    pub fn begin_function(&mut self, name: &str, arity: usize) -> Result<FunctionId, LoweringError> {
        let id = self.module.declare_or_get(name, Signature::new(arity));
        if self.building.contains(&id) || !self.module.function(id).is_declaration() {
            return Err(LoweringError::new(
                LoweringErrorKind::DuplicateFunction,
                format!("Function '{}' is defined more than once.", name),
            ));
        }
        self.building.insert(id);
        Ok(id)
    }

    pub fn end_function(&mut self, id: FunctionId, fb: FunctionBuilder) {
        self.building.remove(&id);
        self.module.define(id, fb.finish());
    }

    pub fn into_module(self) -> IrModule {
        self.module
    }
}
