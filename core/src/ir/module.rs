use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::ir::function::{Function, Signature};
use crate::ir::lower::err::{LoweringError, LoweringErrorKind};
use crate::ir::op::{IROp, Terminator};
use crate::ir::value::{InstId, Type, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FunctionId(pub usize);

/// The function registry and the finished product of lowering.
///
/// Functions keep their registration order, so printing is deterministic.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IrModule {
    functions: Vec<Function>,
    #[serde(skip)]
    by_name: HashMap<String, FunctionId>,
}

impl IrModule {
    pub fn new() -> Self {
        IrModule::default()
    }

    /// A module with each name in `builtins` declared as `i32 (i32)`, in
    /// order, ahead of any user function.
    pub fn with_builtins<S: AsRef<str>>(builtins: &[S]) -> Self {
        let mut module = IrModule::new();
        for name in builtins.iter() {
            module.declare_or_get(name.as_ref(), Signature::new(1));
        }
        module
    }

    /// Return the handle registered under `name`, or register a new
    /// declaration with `signature`. An existing handle's signature is not
    /// compared against the request.
    pub fn declare_or_get(&mut self, name: &str, signature: Signature) -> FunctionId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = FunctionId(self.functions.len());
        self.functions.push(Function::declaration(name, signature));
        self.by_name.insert(name.to_string(), id);
        log::trace!("declared @{} : {}", name, signature);
        id
    }

    pub fn get(&self, name: &str) -> Result<FunctionId, LoweringError> {
        self.lookup(name).ok_or_else(|| {
            LoweringError::new(
                LoweringErrorKind::UndeclaredCallee,
                format!("Function '{}' is not declared.", name),
            )
        })
    }

    pub fn lookup(&self, name: &str) -> Option<FunctionId> {
        self.by_name.get(name).copied()
    }

    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.0]
    }

    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.lookup(name).map(|id| self.function(id))
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions.iter().enumerate().map(|(i, f)| (FunctionId(i), f))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Attach a finished body to a registered handle. The body's own name is
    /// ignored; the handle keeps the registered one.
    pub(crate) fn define(&mut self, id: FunctionId, mut body: Function) {
        let slot = &mut self.functions[id.0];
        body.name = slot.name.clone();
        *slot = body;
    }
}

/// Printed result numbers. Blocks are printed in creation order but nested
/// control flow appends blocks after their enclosing join, so `%N` is
/// assigned in print order rather than taken from the `InstId`.
struct Numbering(HashMap<InstId, usize>);

impl Numbering {
    fn new(func: &Function) -> Self {
        let dests = func.blocks.iter().flat_map(|b| b.ops.iter()).filter_map(|op| op.dest());
        Numbering(dests.enumerate().map(|(n, id)| (id, n)).collect())
    }

    fn get(&self, id: InstId) -> usize {
        // unverified modules may use undefined ids; print them past the end
        self.0.get(&id).copied().unwrap_or(self.0.len() + id.0)
    }
}

struct Printer<'a> {
    module: &'a IrModule,
    func: &'a Function,
    numbering: Numbering,
}

impl Printer<'_> {
    fn value(&self, f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        match value {
            Value::Const { ty: Type::I1, value } => write!(f, "{}", *value != 0),
            Value::Const { value, .. } => write!(f, "{}", value),
            Value::Param { index } => match self.func.params.get(*index) {
                Some(name) => write!(f, "%{}", name),
                None => write!(f, "%arg{}", index),
            },
            Value::Inst { id, .. } => write!(f, "%{}", self.numbering.get(*id)),
        }
    }

    fn typed(&self, f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        write!(f, "{} ", value.ty())?;
        self.value(f, value)
    }

    fn dest(&self, f: &mut fmt::Formatter<'_>, id: InstId) -> fmt::Result {
        write!(f, "%{} = ", self.numbering.get(id))
    }

    fn op(&self, f: &mut fmt::Formatter<'_>, op: &IROp) -> fmt::Result {
        write!(f, "  ")?;
        match op {
            IROp::Load { dest, slot } => {
                self.dest(f, *dest)?;
                write!(f, "load i32, i32* %{}.addr", self.func.slot(*slot).name)
            }
            IROp::Store { value, slot } => {
                write!(f, "store ")?;
                self.typed(f, value)?;
                write!(f, ", i32* %{}.addr", self.func.slot(*slot).name)
            }
            IROp::Binary { dest, op, ty, lhs, rhs } => {
                self.dest(f, *dest)?;
                write!(f, "{} {} ", op.mnemonic(), ty)?;
                self.value(f, lhs)?;
                write!(f, ", ")?;
                self.value(f, rhs)
            }
            IROp::Neg { dest, operand } => {
                self.dest(f, *dest)?;
                write!(f, "sub i32 0, ")?;
                self.value(f, operand)
            }
            IROp::ICmp { dest, pred, lhs, rhs } => {
                self.dest(f, *dest)?;
                write!(f, "icmp {} {} ", pred.mnemonic(), lhs.ty())?;
                self.value(f, lhs)?;
                write!(f, ", ")?;
                self.value(f, rhs)
            }
            IROp::ZExt { dest, operand } => {
                self.dest(f, *dest)?;
                write!(f, "zext ")?;
                self.typed(f, operand)?;
                write!(f, " to i32")
            }
            IROp::Call { dest, callee, args } => {
                self.dest(f, *dest)?;
                write!(f, "call i32 @{}(", self.module.function(*callee).name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    self.typed(f, arg)?;
                }
                write!(f, ")")
            }
        }
    }

    fn terminator(&self, f: &mut fmt::Formatter<'_>, term: &Terminator) -> fmt::Result {
        write!(f, "  ")?;
        match term {
            Terminator::Ret { value } => {
                write!(f, "ret ")?;
                self.typed(f, value)
            }
            Terminator::Br { target } => write!(f, "br label %{}", self.func.block(*target).label),
            Terminator::CondBr { cond, then_block, else_block } => {
                write!(f, "br ")?;
                self.typed(f, cond)?;
                write!(
                    f,
                    ", label %{}, label %{}",
                    self.func.block(*then_block).label,
                    self.func.block(*else_block).label
                )
            }
        }
    }

    fn function(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let func = self.func;
        if func.is_declaration() {
            let params = vec!["i32"; func.signature.arity].join(", ");
            return writeln!(f, "declare i32 @{}({})", func.name, params);
        }

        write!(f, "define i32 @{}(", func.name)?;
        for (i, p) in func.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "i32 %{}", p)?;
        }
        writeln!(f, ") {{")?;

        for (i, block) in func.blocks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}:", block.label)?;
            if i == 0 {
                for slot in func.slots.iter() {
                    writeln!(f, "  %{}.addr = alloca i32", slot.name)?;
                }
            }
            for op in block.ops.iter() {
                self.op(f, op)?;
                writeln!(f)?;
            }
            match &block.terminator {
                Some(term) => {
                    self.terminator(f, term)?;
                    writeln!(f)?;
                }
                None => writeln!(f, "  ; <missing terminator>")?,
            }
        }
        writeln!(f, "}}")
    }
}

impl fmt::Display for IrModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, func)) in self.functions().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            Printer { module: self, func, numbering: Numbering::new(func) }.function(f)?;
        }
        Ok(())
    }
}
