//! Immutable syntax trees and the navigation API over them.
//!
//! A [`Tree`] owns a root [`Subtree`] plus the text it was parsed from.
//! [`Node`] is a borrowed view that hides auxiliary and hidden rules, applies
//! aliases and fields, and computes absolute positions on the fly.

mod cursor;
mod edit;
mod node;

use std::fmt;
use std::sync::Arc;

use tessera_core::LineIndex;

use crate::language::Language;
use crate::parser::ParseError;
use crate::subtree::Subtree;

pub use cursor::TreeCursor;
pub use edit::Edit;
pub use node::Node;

/// A parsed document. Cheap to clone; never mutated after construction.
#[derive(Clone)]
pub struct Tree {
    pub(crate) root: Arc<Subtree>,
    source: Arc<str>,
    language: Arc<Language>,
    lines: Arc<LineIndex>,
    revision: u64,
}

impl Tree {
    pub(crate) fn new(
        root: Arc<Subtree>,
        source: Arc<str>,
        language: Arc<Language>,
        revision: u64,
    ) -> Self {
        let lines = Arc::new(LineIndex::new(&source));
        Self {
            root,
            source,
            language,
            lines,
            revision,
        }
    }

    pub fn root_node(&self) -> Node<'_> {
        Node::root(self)
    }

    pub fn walk(&self) -> TreeCursor<'_> {
        TreeCursor::new(self.root_node())
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn language(&self) -> &Arc<Language> {
        &self.language
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// Number of parses in this tree's history: 0 for a fresh parse.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Byte length covered by the root.
    pub fn len(&self) -> usize {
        self.root.size
    }

    pub fn is_empty(&self) -> bool {
        self.root.size == 0
    }

    /// Whether any ERROR or MISSING node exists.
    pub fn has_error(&self) -> bool {
        self.root.error_count > 0
    }

    pub fn error_count(&self) -> u32 {
        self.root.error_count
    }

    /// Every leaf in source order, including hidden and extra ones.
    pub fn leaves(&self) -> impl Iterator<Item = Node<'_>> {
        let mut out = Vec::new();
        collect_leaves(self, &self.root, 0, &mut out);
        out.into_iter()
    }

    /// Apply `edits` in order to a copy of the root.
    ///
    /// Each edit is in the coordinates of the text produced by the previous one.
    pub(crate) fn edited_root(&self, edits: &[Edit]) -> Result<Arc<Subtree>, ParseError> {
        let mut root = Arc::clone(&self.root);
        for (index, edit) in edits.iter().enumerate() {
            let len = root.size;
            let malformed = |reason: String| ParseError::MalformedEdit { index, reason };
            if edit.start_byte > edit.old_end_byte {
                return Err(malformed(format!(
                    "start {} is past old end {}",
                    edit.start_byte, edit.old_end_byte
                )));
            }
            if edit.old_end_byte > len {
                return Err(malformed(format!(
                    "old end {} is past the end of the tree ({len} bytes)",
                    edit.old_end_byte
                )));
            }
            if edit.new_end_byte < edit.start_byte {
                return Err(malformed(format!(
                    "new end {} is before start {}",
                    edit.new_end_byte, edit.start_byte
                )));
            }
            root = edit.apply(&root, len);
        }
        Ok(root)
    }
}

fn collect_leaves<'t>(tree: &'t Tree, subtree: &'t Subtree, start: usize, out: &mut Vec<Node<'t>>) {
    if subtree.children.is_empty() {
        if subtree.is_leaf() {
            out.push(Node::new(tree, subtree, start, None, None));
        }
        return;
    }
    let mut offset = start;
    for child in &subtree.children {
        collect_leaves(tree, child, offset, out);
        offset += child.size;
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("language", &self.language.name())
            .field("revision", &self.revision)
            .field("root", &self.root_node().to_sexp())
            .finish()
    }
}
