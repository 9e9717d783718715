//! file: core/src/vm/host.rs
//! description: host implementations of builtin functions.
//!
//! A call to a function that only has a declaration lands here.
//!
use crate::ir::lower::declare_builtins::PRINT_BUILTIN;

use super::exec::{ExecError, ExecErrorKind};

pub(crate) fn run_host_fn(name: &str, args: &[i32], output: &mut Vec<i32>) -> Result<i32, ExecError> {
    match name {
        PRINT_BUILTIN => {
            let [value] = args else {
                return Err(ExecError::new(
                    ExecErrorKind::ArityMismatch,
                    format!("@{} takes 1 argument, got {}", name, args.len()),
                ));
            };
            log::debug!("print({})", value);
            output.push(*value);
            Ok(0)
        }
        _ => Err(ExecError::new(
            ExecErrorKind::UnknownFunction,
            format!("@{} is declared but has no body and is not a builtin", name),
        )),
    }
}
