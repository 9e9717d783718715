//! file: core/src/ir/lower/declare_builtins.rs
//! description: declare host functions before any user code is lowered.
//!
//! Builtins are plain declarations in the module, so calls to them lower
//! exactly like calls to user functions.
//!
use crate::ir::module::IrModule;

/// The console output function: prints its argument and returns 0.
pub const PRINT_BUILTIN: &str = "print";

/// The module every compilation starts from.
pub(crate) fn declare_builtin_functions(builtins: &[String]) -> IrModule {
    let module = IrModule::with_builtins(builtins);
    log::debug!("declared {} builtin(s)", module.len());
    module
}
