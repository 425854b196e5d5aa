//! Go syntax trees via tree-sitter.
//!
//! Wraps tree-sitter-go parsing and provides the small set of node helpers
//! the rest of the crate needs: field access, text slices, statement
//! iteration, and preorder walks. All analysis operates on read-only views
//! over the parsed tree; nothing here owns analysis state.

use std::path::{Path, PathBuf};

use tree_sitter::{Node, Parser, Tree};

use crate::error::{LoopcheckError, Result};

/// One parsed Go compilation unit.
///
/// Owns the source text and the tree-sitter tree so that [`Node`] views
/// handed out by [`SourceFile::root`] stay valid for the file's lifetime.
pub struct SourceFile {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl SourceFile {
    /// Parse Go source text into a syntax tree.
    ///
    /// tree-sitter is error-tolerant: files with syntax errors still
    /// produce a tree (with `ERROR` nodes), so this only fails when the
    /// parser itself cannot run.
    pub fn parse(path: impl Into<PathBuf>, source: String) -> Result<Self> {
        let path = path.into();
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| LoopcheckError::Grammar(e.to_string()))?;
        let tree = parser.parse(&source, None).ok_or_else(|| LoopcheckError::Parse {
            path: path.clone(),
            detail: "tree-sitter returned no tree".to_string(),
        })?;
        Ok(Self { path, source, tree })
    }

    /// Read and parse a Go file from disk. Rejects non-UTF-8 content.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| LoopcheckError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let source = String::from_utf8(bytes).map_err(|_| LoopcheckError::Encoding {
            path: path.to_path_buf(),
        })?;
        Self::parse(path, source)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Text covered by a node. Invalid UTF-8 slices decode to "".
    pub fn text(&self, node: Node) -> &str {
        node_text(self.source.as_bytes(), node)
    }
}

/// Safely decode the bytes a node spans, replacing invalid sequences.
#[inline]
pub fn node_text<'a>(source: &'a [u8], node: Node) -> &'a str {
    let bytes = &source[node.start_byte()..node.end_byte()];
    std::str::from_utf8(bytes).unwrap_or("")
}

/// Find a child node by field name.
#[inline]
pub fn child_by_field<'a>(node: Node<'a>, field: &str) -> Option<Node<'a>> {
    node.child_by_field_name(field)
}

/// All named children of a node, in document order.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// The first named child, if any.
pub fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    // The iterator borrows the cursor; bind the result so the borrow ends
    // before the cursor is dropped.
    let first = node.named_children(&mut cursor).next();
    first
}

/// The statements of a block, in order, with comments filtered out.
///
/// Comments are named nodes in tree-sitter-go, so a trailing comment would
/// otherwise masquerade as the block's last statement.
pub fn statements(block: Node<'_>) -> Vec<Node<'_>> {
    named_children(block)
        .into_iter()
        .filter(|n| n.kind() != "comment")
        .collect()
}

/// Whether a node carries the given anonymous token as a direct child.
///
/// Used to tell `:=` range clauses from `=` ones.
pub fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == token);
    found
}

/// Preorder walk over every node of a subtree (named and anonymous).
pub fn walk_preorder<'a>(node: Node<'a>, f: &mut impl FnMut(Node<'a>)) {
    f(node);
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk_preorder(child, f);
    }
}
