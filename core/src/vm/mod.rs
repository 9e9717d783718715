//! Reference interpreter for lowered modules.
//!
//! Not a backend: it exists to observe what a module computes, for tests and
//! for `pyll run`.

mod exec;
mod host;

pub use exec::{ExecError, ExecErrorKind, ExecOptions, ExecOutcome};

use crate::ir::module::IrModule;

pub struct VM<'m> {
    module: &'m IrModule,
    options: ExecOptions,
}

impl<'m> VM<'m> {
    pub fn new(module: &'m IrModule) -> Self {
        VM { module, options: ExecOptions::default() }
    }

    pub fn with_options(mut self, options: ExecOptions) -> Self {
        self.options = options;
        self
    }

    /// Call the function registered as `name` with `args`.
    pub fn run(&self, name: &str, args: &[i32]) -> Result<ExecOutcome, ExecError> {
        let id = self.module.lookup(name).ok_or_else(|| {
            ExecError::new(ExecErrorKind::UnknownFunction, format!("no function named @{}", name))
        })?;
        let mut state = exec::ExecState::new(self.module, self.options.clone());
        let value = state.call(id, args)?;
        Ok(ExecOutcome { value, output: state.output, steps: state.steps })
    }
}

pub fn run_function(
    module: &IrModule,
    name: &str,
    args: &[i32],
    options: &ExecOptions,
) -> Result<ExecOutcome, ExecError> {
    VM::new(module).with_options(options.clone()).run(name, args)
}
