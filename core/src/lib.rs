pub mod ast;
pub mod error;
pub mod ir;
pub mod location;
pub mod source;
pub mod vm;

pub use error::{Level, PyllErrorExt};
pub use ir::lower::{LoweringError, LoweringErrorKind};
pub use ir::{lower_ast_to_ir, verify_module, IrModule, LowerOptions};
pub use location::{Location, Span};
pub use source::Source;
pub use vm::{run_function, ExecOptions, ExecOutcome};

pub fn generate_error_report(error: &dyn PyllErrorExt) -> String {
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    format!("PYLL | {} | {} | {}", error.level(), location, error.message())
}

/// Decode the tree in `source`, lower it and verify the result.
pub fn compile_source(source: &Source, options: &LowerOptions) -> Result<IrModule, Box<dyn PyllErrorExt>> {
    let tree = ast::load_ast_from_source(source)?;
    let module = lower_ast_to_ir(&tree, options)?;
    verify_module(&module)?;
    Ok(module)
}
