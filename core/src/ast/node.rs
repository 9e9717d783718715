use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::{Location, Span};

use super::kind::AstNodeKind;

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: AstNodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl AstNode {
    pub fn new(kind: AstNodeKind) -> Self {
        AstNode { kind, location: None, span: None }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn get_kind(&self) -> &AstNodeKind {
        &self.kind
    }

    pub fn get_location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn get_span(&self) -> Option<&Span> {
        self.span.as_ref()
    }
}

// Renders the tree back as source text; used by `--dump ast` and in test
// failure messages.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_expression() {
            write_expr(f, self)
        } else {
            write_stmt(f, self, 0)
        }
    }
}

impl fmt::Debug for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{:?} @ {}", self.kind, loc),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

fn write_indent(f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        write!(f, "    ")?;
    }
    Ok(())
}

fn write_body(f: &mut fmt::Formatter<'_>, body: &[AstNode], indent: usize) -> fmt::Result {
    if body.is_empty() {
        write_indent(f, indent)?;
        return writeln!(f, "pass");
    }
    for s in body {
        write_stmt(f, s, indent)?;
    }
    Ok(())
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[AstNode], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write_expr(f, item)?;
    }
    Ok(())
}

fn write_stmt(f: &mut fmt::Formatter<'_>, node: &AstNode, indent: usize) -> fmt::Result {
    match &node.kind {
        AstNodeKind::Module { body } => {
            for s in body {
                write_stmt(f, s, indent)?;
            }
            Ok(())
        }
        AstNodeKind::FunctionDef { name, params, body } => {
            write_indent(f, indent)?;
            writeln!(f, "def {}({}):", name, params.join(", "))?;
            write_body(f, body, indent + 1)
        }
        AstNodeKind::Assign { targets, value } => {
            write_indent(f, indent)?;
            for t in targets {
                write_expr(f, t)?;
                write!(f, " = ")?;
            }
            write_expr(f, value)?;
            writeln!(f)
        }
        AstNodeKind::AugAssign { target, op, value } => {
            write_indent(f, indent)?;
            write_expr(f, target)?;
            write!(f, " {}= ", op.symbol())?;
            write_expr(f, value)?;
            writeln!(f)
        }
        AstNodeKind::Expr { value } => {
            write_indent(f, indent)?;
            write_expr(f, value)?;
            writeln!(f)
        }
        AstNodeKind::Return { value } => {
            write_indent(f, indent)?;
            match value {
                Some(v) => {
                    write!(f, "return ")?;
                    write_expr(f, v)?;
                    writeln!(f)
                }
                None => writeln!(f, "return"),
            }
        }
        AstNodeKind::If { test, body, orelse } => {
            write_indent(f, indent)?;
            write!(f, "if ")?;
            write_expr(f, test)?;
            writeln!(f, ":")?;
            write_body(f, body, indent + 1)?;
            if !orelse.is_empty() {
                write_indent(f, indent)?;
                writeln!(f, "else:")?;
                write_body(f, orelse, indent + 1)?;
            }
            Ok(())
        }
        AstNodeKind::While { test, body, orelse } => {
            write_indent(f, indent)?;
            write!(f, "while ")?;
            write_expr(f, test)?;
            writeln!(f, ":")?;
            write_body(f, body, indent + 1)?;
            if !orelse.is_empty() {
                write_indent(f, indent)?;
                writeln!(f, "else:")?;
                write_body(f, orelse, indent + 1)?;
            }
            Ok(())
        }
        AstNodeKind::For { target, iter, body, orelse } => {
            write_indent(f, indent)?;
            write!(f, "for ")?;
            write_expr(f, target)?;
            write!(f, " in ")?;
            write_expr(f, iter)?;
            writeln!(f, ":")?;
            write_body(f, body, indent + 1)?;
            if !orelse.is_empty() {
                write_indent(f, indent)?;
                writeln!(f, "else:")?;
                write_body(f, orelse, indent + 1)?;
            }
            Ok(())
        }
        AstNodeKind::Pass => {
            write_indent(f, indent)?;
            writeln!(f, "pass")
        }
        AstNodeKind::Break => {
            write_indent(f, indent)?;
            writeln!(f, "break")
        }
        AstNodeKind::Continue => {
            write_indent(f, indent)?;
            writeln!(f, "continue")
        }
        _ => {
            write_indent(f, indent)?;
            write_expr(f, node)?;
            writeln!(f)
        }
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, node: &AstNode) -> fmt::Result {
    match &node.kind {
        AstNodeKind::Constant { value } => write!(f, "{}", value),
        AstNodeKind::Str { value } => write!(f, "{:?}", value),
        AstNodeKind::Name { id } => write!(f, "{}", id),
        AstNodeKind::UnaryOp { op, operand } => {
            write!(f, "({}", op.symbol())?;
            write_expr(f, operand)?;
            write!(f, ")")
        }
        AstNodeKind::BinOp { left, op, right } => {
            write!(f, "(")?;
            write_expr(f, left)?;
            write!(f, " {} ", op.symbol())?;
            write_expr(f, right)?;
            write!(f, ")")
        }
        AstNodeKind::BoolOp { op, values } => {
            write!(f, "(")?;
            write_list(f, values, &format!(" {} ", op.keyword()))?;
            write!(f, ")")
        }
        AstNodeKind::Compare { left, ops, comparators } => {
            write!(f, "(")?;
            write_expr(f, left)?;
            for (op, rhs) in ops.iter().zip(comparators.iter()) {
                write!(f, " {} ", op.symbol())?;
                write_expr(f, rhs)?;
            }
            write!(f, ")")
        }
        AstNodeKind::Call { func, args, keywords } => {
            write_expr(f, func)?;
            write!(f, "(")?;
            write_list(f, args, ", ")?;
            for (i, kw) in keywords.iter().enumerate() {
                if i > 0 || !args.is_empty() {
                    write!(f, ", ")?;
                }
                match &kw.arg {
                    Some(name) => write!(f, "{}=", name)?,
                    None => write!(f, "**")?,
                }
                write_expr(f, &kw.value)?;
            }
            write!(f, ")")
        }
        AstNodeKind::Attribute { value, attr } => {
            write_expr(f, value)?;
            write!(f, ".{}", attr)
        }
        other => write!(f, "<{}>", other.name()),
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::build::*;
    use crate::ast::{BinaryOperator, CompareOperator};

    #[test]
    fn display_renders_source_like_text() {
        let tree = module(vec![def(
            "f",
            &["n"],
            vec![
                assign("i", int(0)),
                while_(
                    compare(name("i"), CompareOperator::Lt, name("n")),
                    vec![assign("i", binop(name("i"), BinaryOperator::Add, int(1)))],
                ),
                ret(name("i")),
            ],
        )]);

        let text = tree.to_string();
        assert_eq!(
            text,
            "def f(n):\n    i = 0\n    while (i < n):\n        i = (i + 1)\n    return i\n"
        );
    }
}
