//! file: core/src/ast/mod.rs
//! description: the syntax tree consumed by lowering.
//!
//! Parsing happens elsewhere; this module defines the tree and decodes its
//! JSON serialization.

pub mod build;
pub mod kind;
pub mod node;

pub use kind::{AstNodeKind, BinaryOperator, BoolOperator, CompareOperator, Keyword, UnaryOperator};
pub use node::AstNode;

use crate::error::PyllErrorExt;
use crate::source::{Source, SourceError};

/// Decode the syntax tree stored in `source`.
pub fn load_ast_from_source(source: &Source) -> Result<AstNode, Box<dyn PyllErrorExt>> {
    if source.is_empty() {
        return Err(SourceError::empty(source));
    }
    let tree: AstNode =
        serde_json::from_str(&source.content).map_err(|e| SourceError::malformed(source, &e))?;
    log::debug!("decoded {} syntax tree from {}", tree.kind.name(), source.name);
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tree_with_locations() {
        let json = r#"{
            "kind": {"Module": {"body": [
                {"kind": {"Return": {"value": {"kind": {"Constant": {"value": 3}}}}},
                 "location": {"line": 1, "column": 0}}
            ]}}
        }"#;
        let source = Source::from_string("tree.json", json.to_string());
        let tree = load_ast_from_source(&source).expect("tree should decode");

        let AstNodeKind::Module { body } = &tree.kind else {
            panic!("expected module, got {:?}", tree);
        };
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].get_location().map(|l| l.line), Some(1));
    }

    #[test]
    fn malformed_tree_reports_position() {
        let source = Source::from_string("bad.json", "{\"kind\": {\"Module\": ".to_string());
        let err = load_ast_from_source(&source).unwrap_err();
        assert!(err.message().starts_with("Malformed syntax tree"));
        assert!(err.location().is_some());
    }

    #[test]
    fn empty_source_is_rejected() {
        let source = Source::from_string("empty.json", "  \n".to_string());
        let err = load_ast_from_source(&source).unwrap_err();
        assert!(err.message().contains("empty"));
    }
}
