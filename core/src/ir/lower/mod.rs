//! file: core/src/ir/lower/mod.rs
//! description: AST -> IR lowering entry points.
//!
//! Lowering is a single pass. The top-level statements of a `Module` become
//! the body of the entry function; each `def` becomes an independent
//! function registered in the module the moment it is encountered. Calls to
//! functions that have not been seen yet declare them, so forward and mutual
//! references need no second pass.

pub mod declare_builtins;
pub mod err;
pub mod function_builder;
pub mod lower_expr;
pub mod lower_stmt;
pub mod lowering_context;

pub use err::{LoweringError, LoweringErrorKind};
pub use function_builder::FunctionBuilder;
pub use lowering_context::{LowerOptions, LoweringContext};

use crate::ast::{AstNode, AstNodeKind};
use crate::ir::module::{FunctionId, IrModule};
use crate::ir::value::Value;

/// Lower a whole `Module` tree. The first error aborts lowering; no
/// partially built module is returned.
pub fn lower_ast_to_ir(ast: &AstNode, options: &LowerOptions) -> Result<IrModule, LoweringError> {
    let AstNodeKind::Module { body } = ast.get_kind() else {
        return Err(LoweringError::unsupported(&format!(
            "a top-level \"{}\" node (expected \"Module\")",
            ast.get_kind().name()
        ))
        .at(ast));
    };

    let mut ctx = LoweringContext::new(options.clone());

    let entry = ctx.options.entry_name.clone();
    lower_function(&mut ctx, &entry, &[], body)?;

    let module = ctx.into_module();
    log::info!("lowered {} function(s)", module.len());
    Ok(module)
}

/// Build one function from `params` and `body` and register it under `name`.
/// A body that falls off its end returns 0.
pub fn lower_function(
    ctx: &mut LoweringContext,
    name: &str,
    params: &[String],
    body: &[AstNode],
) -> Result<FunctionId, LoweringError> {
    let id = ctx.begin_function(name, params.len())?;
    log::debug!("lowering @{}({})", name, params.join(", "));

    let mut fb = FunctionBuilder::new(name, params);
    lower_stmt::lower_block(body, &mut fb, ctx)?;
    if !fb.is_terminated() {
        fb.build_ret(Value::int(0))?;
    }

    ctx.end_function(id, fb);
    log::debug!("finished @{}", name);
    Ok(id)
}
