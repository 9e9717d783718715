//! file: core/src/vm/exec.rs
//! description: IR interpreter loop.
//!
//! Executes lowered functions block by block against a `Frame` holding
//! instruction results, slot contents and incoming arguments. Arithmetic is
//! 32-bit two's complement with wraparound; `i1` values are held as 0/1.
//!
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Level, PyllErrorExt};
use crate::ir::function::{BlockId, Function};
use crate::ir::module::{FunctionId, IrModule};
use crate::ir::op::{BinaryOp, IROp, Terminator};
use crate::ir::value::{InstId, Value};
use crate::location::{Location, Span};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecOptions {
    /// Instructions executed before giving up (guards non-terminating loops).
    pub max_steps: usize,
    /// Maximum call depth.
    pub max_depth: usize,
    /// Log every executed instruction at info level.
    pub trace: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        ExecOptions { max_steps: 1_000_000, max_depth: 256, trace: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutcome {
    pub value: i32,
    /// Everything passed to the output builtin, in order.
    pub output: Vec<i32>,
    pub steps: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecErrorKind {
    UnknownFunction,
    ArityMismatch,
    StepLimit,
    DepthLimit,
    RemainderByZero,
    UndefinedValue,
    MissingTerminator,
}

#[derive(Debug, Clone)]
pub struct ExecError {
    kind: ExecErrorKind,
    message: String,
}

impl ExecError {
    pub(crate) fn new(kind: ExecErrorKind, message: String) -> Self {
        ExecError { kind, message }
    }

    pub fn kind(&self) -> ExecErrorKind {
        self.kind
    }
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExecError {}

impl PyllErrorExt for ExecError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "pyll.vm".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

impl From<ExecError> for Box<dyn PyllErrorExt> {
    fn from(err: ExecError) -> Self {
        Box::new(err)
    }
}

struct Frame<'a> {
    func: &'a Function,
    args: &'a [i32],
    values: HashMap<InstId, i32>,
    slots: Vec<i32>,
}

impl Frame<'_> {
    fn eval(&self, value: &Value) -> Result<i32, ExecError> {
        match value {
            Value::Const { value, .. } => Ok(*value),
            Value::Param { index } => self.args.get(*index).copied().ok_or_else(|| {
                ExecError::new(
                    ExecErrorKind::UndefinedValue,
                    format!("@{}: no argument #{}", self.func.name, index),
                )
            }),
            Value::Inst { id, .. } => self.values.get(id).copied().ok_or_else(|| {
                ExecError::new(
                    ExecErrorKind::UndefinedValue,
                    format!("@{}: %{} used before it was computed", self.func.name, id.0),
                )
            }),
        }
    }
}

pub(crate) struct ExecState<'m> {
    pub module: &'m IrModule,
    pub options: ExecOptions,
    pub steps: usize,
    pub depth: usize,
    pub output: Vec<i32>,
}

impl<'m> ExecState<'m> {
    pub fn new(module: &'m IrModule, options: ExecOptions) -> Self {
        ExecState { module, options, steps: 0, depth: 0, output: Vec::new() }
    }

    fn step(&mut self) -> Result<(), ExecError> {
        self.steps += 1;
        if self.steps > self.options.max_steps {
            return Err(ExecError::new(
                ExecErrorKind::StepLimit,
                format!("execution exceeded {} steps", self.options.max_steps),
            ));
        }
        Ok(())
    }

    pub fn call(&mut self, id: FunctionId, args: &[i32]) -> Result<i32, ExecError> {
        let module = self.module;
        let func = module.function(id);
        if func.is_declaration() {
            return super::host::run_host_fn(&func.name, args, &mut self.output);
        }
        if args.len() != func.params.len() {
            return Err(ExecError::new(
                ExecErrorKind::ArityMismatch,
                format!("@{} takes {} argument(s), got {}", func.name, func.params.len(), args.len()),
            ));
        }
        if self.depth >= self.options.max_depth {
            return Err(ExecError::new(
                ExecErrorKind::DepthLimit,
                format!("call depth exceeded {} in @{}", self.options.max_depth, func.name),
            ));
        }

        self.depth += 1;
        let result = self.run_body(func, args);
        self.depth -= 1;
        result
    }

    fn run_body(&mut self, func: &'m Function, args: &[i32]) -> Result<i32, ExecError> {
        let mut frame = Frame { func, args, values: HashMap::new(), slots: vec![0; func.slots.len()] };
        let mut current = BlockId(0);

        loop {
            let block = func.block(current);
            for op in block.ops.iter() {
                self.step()?;
                if self.options.trace {
                    log::info!("@{} {}: {:?}", func.name, block.label, op);
                }
                self.dispatch_op(&mut frame, op)?;
            }

            self.step()?;
            current = match &block.terminator {
                Some(Terminator::Ret { value }) => return frame.eval(value),
                Some(Terminator::Br { target }) => *target,
                Some(Terminator::CondBr { cond, then_block, else_block }) => {
                    if frame.eval(cond)? != 0 { *then_block } else { *else_block }
                }
                None => {
                    return Err(ExecError::new(
                        ExecErrorKind::MissingTerminator,
                        format!("@{}: block '{}' has no terminator", func.name, block.label),
                    ));
                }
            };
        }
    }

    fn dispatch_op(&mut self, frame: &mut Frame<'_>, op: &IROp) -> Result<(), ExecError> {
        match op {
            IROp::Load { dest, slot } => {
                let v = frame.slots[slot.0];
                frame.values.insert(*dest, v);
            }
            IROp::Store { value, slot } => {
                let v = frame.eval(value)?;
                frame.slots[slot.0] = v;
            }
            IROp::Binary { dest, op, lhs, rhs, .. } => {
                let a = frame.eval(lhs)?;
                let b = frame.eval(rhs)?;
                let v = match op {
                    BinaryOp::Add => a.wrapping_add(b),
                    BinaryOp::Sub => a.wrapping_sub(b),
                    BinaryOp::Mul => a.wrapping_mul(b),
                    BinaryOp::URem => {
                        if b == 0 {
                            return Err(ExecError::new(
                                ExecErrorKind::RemainderByZero,
                                format!("@{}: remainder by zero", frame.func.name),
                            ));
                        }
                        ((a as u32) % (b as u32)) as i32
                    }
                    BinaryOp::And => a & b,
                    BinaryOp::Or => a | b,
                };
                frame.values.insert(*dest, v);
            }
            IROp::Neg { dest, operand } => {
                let v = frame.eval(operand)?.wrapping_neg();
                frame.values.insert(*dest, v);
            }
            IROp::ICmp { dest, pred, lhs, rhs } => {
                let v = pred.evaluate(frame.eval(lhs)?, frame.eval(rhs)?);
                frame.values.insert(*dest, v as i32);
            }
            IROp::ZExt { dest, operand } => {
                let v = frame.eval(operand)? & 1;
                frame.values.insert(*dest, v);
            }
            IROp::Call { dest, callee, args } => {
                let mut values = Vec::with_capacity(args.len());
                for a in args.iter() {
                    values.push(frame.eval(a)?);
                }
                let v = self.call(*callee, &values)?;
                frame.values.insert(*dest, v);
            }
        }
        Ok(())
    }
}
