//! Walks the edited previous tree in step with the parser position.

use std::sync::Arc;

use crate::subtree::Subtree;

struct Entry {
    tree: Arc<Subtree>,
    start: usize,
    /// Index within the parent's children.
    index: usize,
}

/// Pre-order position in an old tree, offering subtrees that start where the
/// parser currently is.
pub(super) struct ReuseCursor {
    stack: Vec<Entry>,
    /// Scanner state after the last external token passed over.
    last_external: Option<Arc<[u8]>>,
}

impl ReuseCursor {
    pub fn new(root: Arc<Subtree>) -> Self {
        Self {
            stack: vec![Entry {
                tree: root,
                start: 0,
                index: 0,
            }],
            last_external: None,
        }
    }

    /// The outermost non-empty subtree starting exactly at `pos`.
    ///
    /// Subtrees that end before `pos` are skipped and subtrees straddling it
    /// are entered. Returns `None` when the next subtree starts after `pos`.
    pub fn candidate(&mut self, pos: usize) -> Option<Arc<Subtree>> {
        loop {
            let entry = self.stack.last()?;
            let start = entry.start;
            let end = start + entry.tree.size;
            if start > pos {
                return None;
            }
            if start == pos && end > pos {
                return Some(Arc::clone(&entry.tree));
            }
            if end <= pos || entry.tree.children.is_empty() {
                self.advance();
            } else {
                self.descend();
            }
        }
    }

    /// Replace the current subtree by its first child.
    pub fn descend(&mut self) -> bool {
        let Some(entry) = self.stack.last() else {
            return false;
        };
        let Some(first) = entry.tree.children.first().cloned() else {
            return false;
        };
        let start = entry.start;
        self.stack.push(Entry {
            tree: first,
            start,
            index: 0,
        });
        true
    }

    /// Move past the current subtree to whatever follows it.
    pub fn advance(&mut self) {
        let Some(entry) = self.stack.pop() else {
            return;
        };
        if let Some(state) = entry.tree.last_external_state() {
            self.last_external = Some(Arc::clone(state));
        }

        let end = entry.start + entry.tree.size;
        let mut next = entry.index + 1;
        loop {
            let Some(parent) = self.stack.last() else {
                return;
            };
            match parent.tree.children.get(next).cloned() {
                Some(sibling) => {
                    self.stack.push(Entry {
                        tree: sibling,
                        start: end,
                        index: next,
                    });
                    return;
                }
                None => {
                    let Some(parent) = self.stack.pop() else {
                        return;
                    };
                    next = parent.index + 1;
                }
            }
        }
    }

    /// Scanner state the old parse had at the current subtree.
    pub fn external_state(&self) -> Option<&[u8]> {
        self.last_external.as_deref()
    }
}
