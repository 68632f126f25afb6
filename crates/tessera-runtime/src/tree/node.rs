use std::fmt::Write as _;
use std::ops::Range;

use tessera_core::{FieldId, Point, Symbol};

use crate::subtree::Subtree;

use super::{Tree, TreeCursor};

/// A visible node of a [`Tree`].
///
/// Nodes are computed views: hidden rules are flattened into their parents,
/// aliases rename children, and fields come from the parent's production.
/// Two `Node`s are equal when they denote the same subtree at the same offset.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    subtree: &'t Subtree,
    start: usize,
    field: Option<FieldId>,
    alias: Option<Symbol>,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.subtree, other.subtree) && self.start == other.start
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{Node {} {:?}}}", self.kind(), self.byte_range())
    }
}

impl<'t> Node<'t> {
    pub(crate) fn new(
        tree: &'t Tree,
        subtree: &'t Subtree,
        start: usize,
        field: Option<FieldId>,
        alias: Option<Symbol>,
    ) -> Self {
        Self {
            tree,
            subtree,
            start,
            field,
            alias,
        }
    }

    pub(crate) fn root(tree: &'t Tree) -> Self {
        Self::new(tree, &tree.root, 0, None, None)
    }

    /// Stable identity of the underlying subtree. Shared subtrees keep their id
    /// across incremental reparses.
    pub fn id(&self) -> usize {
        std::ptr::from_ref(self.subtree) as usize
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn kind_id(&self) -> Symbol {
        self.alias.unwrap_or(self.subtree.symbol)
    }

    pub fn kind(&self) -> &'t str {
        self.tree.language().kind_name(self.kind_id())
    }

    pub fn is_named(&self) -> bool {
        self.tree.language().table().is_named(self.kind_id())
    }

    pub fn is_extra(&self) -> bool {
        self.subtree.extra
    }

    pub fn is_error(&self) -> bool {
        self.subtree.is_error()
    }

    pub fn is_missing(&self) -> bool {
        self.subtree.missing
    }

    /// Whether this node or any descendant is ERROR or MISSING.
    pub fn has_error(&self) -> bool {
        self.subtree.error_count > 0
    }

    pub fn start_byte(&self) -> usize {
        self.start
    }

    pub fn end_byte(&self) -> usize {
        self.start + self.subtree.size
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }

    pub fn start_position(&self) -> Point {
        self.tree.lines().point(self.start_byte())
    }

    pub fn end_position(&self) -> Point {
        self.tree.lines().point(self.end_byte())
    }

    pub fn text(&self) -> &'t str {
        self.tree.source().get(self.byte_range()).unwrap_or_default()
    }

    /// Name of the field this node fills in its parent.
    pub fn field_name(&self) -> Option<&'t str> {
        self.tree.language().table().field_name(self.field?)
    }

    pub fn children(&self) -> Vec<Node<'t>> {
        let mut out = Vec::new();
        self.push_visible_children(self.subtree, self.start, None, &mut out);
        out
    }

    fn push_visible_children(
        &self,
        subtree: &'t Subtree,
        start: usize,
        inherited_field: Option<FieldId>,
        out: &mut Vec<Node<'t>>,
    ) {
        let table = self.tree.language().table();
        let production = subtree.production.map(|id| table.production(id));
        let mut offset = start;
        let mut structural = 0;

        for child in &subtree.children {
            let (field, alias) = match production {
                Some(prod) if !child.extra => {
                    let step = structural;
                    structural += 1;
                    (prod.field_at(step), prod.alias_at(step))
                }
                _ => (None, None),
            };
            let field = field.or(inherited_field);

            let kind = alias.unwrap_or(child.symbol);
            if table.is_visible(kind) || child.missing {
                out.push(Node::new(self.tree, child, offset, field, alias));
            } else if !child.children.is_empty() {
                self.push_visible_children(child, offset, field, out);
            }
            offset += child.size;
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.children().into_iter().nth(index)
    }

    pub fn named_children(&self) -> Vec<Node<'t>> {
        self.children().into_iter().filter(Node::is_named).collect()
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().len()
    }

    pub fn named_child(&self, index: usize) -> Option<Node<'t>> {
        self.named_children().into_iter().nth(index)
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Node<'t>> {
        let id = self.tree.language().table().field_id(name)?;
        self.children().into_iter().find(|c| c.field == Some(id))
    }

    pub fn children_by_field_name(&self, name: &str) -> Vec<Node<'t>> {
        let Some(id) = self.tree.language().table().field_id(name) else {
            return Vec::new();
        };
        self.children()
            .into_iter()
            .filter(|c| c.field == Some(id))
            .collect()
    }

    /// Parent, found by descending from the root.
    pub fn parent(&self) -> Option<Node<'t>> {
        find_parent(self.tree.root_node(), self)
    }

    pub fn next_sibling(&self) -> Option<Node<'t>> {
        let siblings = self.parent()?.children();
        let index = siblings.iter().position(|s| s == self)?;
        siblings.get(index + 1).copied()
    }

    pub fn prev_sibling(&self) -> Option<Node<'t>> {
        let siblings = self.parent()?.children();
        let index = siblings.iter().position(|s| s == self)?;
        index.checked_sub(1).and_then(|i| siblings.get(i).copied())
    }

    /// Smallest descendant spanning `start..end`. An empty range selects the
    /// node containing that byte.
    pub fn descendant_for_byte_range(&self, start: usize, end: usize) -> Option<Node<'t>> {
        if start < self.start_byte() || end > self.end_byte() {
            return None;
        }
        let mut node = *self;
        'descend: loop {
            for child in node.children() {
                let contains = if start == end {
                    child.start_byte() <= start && start < child.end_byte()
                } else {
                    child.start_byte() <= start && end <= child.end_byte()
                };
                if contains {
                    node = child;
                    continue 'descend;
                }
            }
            return Some(node);
        }
    }

    pub fn named_descendant_for_byte_range(&self, start: usize, end: usize) -> Option<Node<'t>> {
        let mut node = self.descendant_for_byte_range(start, end)?;
        while !node.is_named() {
            node = node.parent()?;
        }
        Some(node)
    }

    pub fn walk(&self) -> TreeCursor<'t> {
        TreeCursor::new(*self)
    }

    /// S-expression of named nodes, with field labels and MISSING markers.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        if self.is_missing() {
            if self.is_named() {
                write!(out, "(MISSING {})", self.kind()).unwrap();
            } else {
                write!(out, "(MISSING {:?})", self.kind()).unwrap();
            }
            return;
        }

        write!(out, "({}", self.kind()).unwrap();
        for child in self.children() {
            child.write_named(out);
        }
        out.push(')');
    }

    fn write_named(&self, out: &mut String) {
        if !self.is_named() && !self.is_missing() {
            for child in self.children() {
                child.write_named(out);
            }
            return;
        }
        out.push(' ');
        if let Some(field) = self.field_name() {
            write!(out, "{field}: ").unwrap();
        }
        self.write_sexp(out);
    }

    /// Indented dump of every visible node with byte ranges, anonymous ones included.
    pub fn to_raw_sexp(&self) -> String {
        let mut out = String::new();
        self.write_raw(&mut out, 0);
        out
    }

    fn write_raw(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let field = self
            .field_name()
            .map(|f| format!("{f}: "))
            .unwrap_or_default();
        let range = self.byte_range();
        let kind = if self.is_named() {
            self.kind().to_string()
        } else {
            format!("{:?}", self.kind())
        };
        let marker = if self.is_missing() { "MISSING " } else { "" };

        let children = self.children();
        if children.is_empty() && !self.is_named() {
            write!(out, "{indent}{field}{marker}{kind} {range:?}").unwrap();
            return;
        }
        write!(out, "{indent}{field}({marker}{kind} {range:?}").unwrap();
        for child in children {
            out.push('\n');
            child.write_raw(out, depth + 1);
        }
        out.push(')');
    }
}

fn find_parent<'t>(node: Node<'t>, target: &Node<'t>) -> Option<Node<'t>> {
    for child in node.children() {
        if child == *target {
            return Some(node);
        }
        if child.start_byte() <= target.start_byte()
            && target.end_byte() <= child.end_byte()
            && let Some(parent) = find_parent(child, target)
        {
            return Some(parent);
        }
    }
    None
}
