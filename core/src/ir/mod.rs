pub mod function;
pub mod lower;
pub mod module;
pub mod op;
pub mod value;
pub mod verify;

pub use self::lower::{lower_ast_to_ir, LowerOptions};
pub use self::module::{FunctionId, IrModule};
pub use self::verify::verify_module;
