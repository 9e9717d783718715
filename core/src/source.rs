//! file: core/src/source.rs
//! description: on-disk input for the compiler.
//!
//! A `Source` is the serialized syntax tree handed over by an external
//! parser. This module only reads it; decoding happens in `ast`.

use std::path::PathBuf;

use crate::error::{Level, PyllErrorExt};
use crate::location::{Location, Span};

#[derive(Debug, Clone)]
pub struct Source {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
}

impl Source {
    pub fn new(path: PathBuf) -> Result<Self, Box<dyn PyllErrorExt>> {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| SourceError::missing(&path, &e.to_string()))?;
        Ok(Source { name, path, content })
    }

    /// Wrap an in-memory tree, e.g. one produced by an embedding parser.
    pub fn from_string(name: &str, content: String) -> Self {
        Source {
            name: name.to_string(),
            path: PathBuf::from(name),
            content,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Source: {} at {:?}", self.name, self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Missing,
    Empty,
    MalformedTree,
}

#[derive(Debug, Clone)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    location: Option<Location>,
}

impl SourceError {
    pub fn missing(path: &std::path::Path, reason: &str) -> Box<dyn PyllErrorExt> {
        Box::new(SourceError {
            kind: SourceErrorKind::Missing,
            message: format!("Cannot read syntax tree at {:?}: {}", path, reason),
            location: None,
        })
    }

    pub fn empty(source: &crate::source::Source) -> Box<dyn PyllErrorExt> {
        Box::new(SourceError {
            kind: SourceErrorKind::Empty,
            message: format!("The syntax tree in '{}' is empty.", source.name),
            location: None,
        })
    }

    pub fn malformed(source: &crate::source::Source, err: &serde_json::Error) -> Box<dyn PyllErrorExt> {
        Box::new(SourceError {
            kind: SourceErrorKind::MalformedTree,
            message: format!("Malformed syntax tree: {}", err),
            location: Some(Location::new(source.name.clone(), err.line(), err.column())),
        })
    }

    pub fn kind(&self) -> SourceErrorKind {
        self.kind
    }
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {}

impl PyllErrorExt for SourceError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "pyll.source".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
