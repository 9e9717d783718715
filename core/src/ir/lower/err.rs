use crate::ast::AstNode;
use crate::error::{Level, PyllErrorExt};
use crate::location::{Location, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoweringErrorKind {
    /// A node kind, operator or shape the language does not accept.
    UnsupportedConstruct,
    /// A read of a name that is neither a parameter nor previously written.
    UnboundName,
    /// A registry lookup for a function that was never declared.
    UndeclaredCallee,
    /// A second body for a function that already has one.
    DuplicateFunction,
    /// An instruction emitted after its block was terminated.
    ClosedBlock,
}

impl LoweringErrorKind {
    fn label(&self) -> &'static str {
        match self {
            LoweringErrorKind::UnsupportedConstruct => "unsupported-construct",
            LoweringErrorKind::UnboundName => "unbound-name",
            LoweringErrorKind::UndeclaredCallee => "undeclared-callee",
            LoweringErrorKind::DuplicateFunction => "duplicate-function",
            LoweringErrorKind::ClosedBlock => "closed-block",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoweringError {
    kind: LoweringErrorKind,
    message: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl LoweringError {
    pub fn new(kind: LoweringErrorKind, message: String) -> Self {
        LoweringError { kind, message, location: None, span: None }
    }

    pub fn unsupported(what: &str) -> Self {
        Self::new(
            LoweringErrorKind::UnsupportedConstruct,
            format!("Compiler doesn't support {}.", what),
        )
    }

    /// Attach the position of `node` unless a more precise one is already set.
    pub fn at(mut self, node: &AstNode) -> Self {
        if self.location.is_none() {
            self.location = node.location.clone();
            self.span = node.span.clone();
        }
        self
    }

    pub fn kind(&self) -> LoweringErrorKind {
        self.kind
    }
}

impl std::fmt::Display for LoweringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {})", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for LoweringError {}

impl PyllErrorExt for LoweringError {
    fn level(&self) -> Level {
        match self.kind {
            LoweringErrorKind::ClosedBlock => Level::Critical,
            _ => Level::Error,
        }
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        format!("pyll.lower.{}", self.kind.label())
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

impl From<LoweringError> for Box<dyn PyllErrorExt> {
    fn from(err: LoweringError) -> Self {
        Box::new(err)
    }
}
