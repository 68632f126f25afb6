//! Text edits and their effect on a persistent tree.

use std::sync::Arc;

use crate::subtree::Subtree;

/// A single text replacement: bytes `start_byte..old_end_byte` of the old
/// text became `start_byte..new_end_byte` of the new text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
}

impl Edit {
    pub fn new(start_byte: usize, old_end_byte: usize, new_end_byte: usize) -> Self {
        Self {
            start_byte,
            old_end_byte,
            new_end_byte,
        }
    }

    /// Smallest single edit turning `old` into `new`, or `None` if they are equal.
    ///
    /// The common prefix and suffix are kept on UTF-8 character boundaries.
    pub fn diff(old: &str, new: &str) -> Option<Edit> {
        if old == new {
            return None;
        }

        let prefix = old
            .char_indices()
            .zip(new.chars())
            .find(|((_, a), b)| a != b)
            .map_or(old.len().min(new.len()), |((i, _), _)| i);

        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old[prefix..]
            .chars()
            .rev()
            .zip(new[prefix..].chars().rev())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .scan(0, |total, len| {
                *total += len;
                Some(*total)
            })
            .take_while(|&total| total <= max_suffix)
            .last()
            .unwrap_or(0);

        Some(Edit {
            start_byte: prefix,
            old_end_byte: old.len() - suffix,
            new_end_byte: new.len() - suffix,
        })
    }

    pub(crate) fn delta(&self) -> isize {
        self.new_end_byte as isize - self.old_end_byte as isize
    }

    /// Whether a subtree starting at `start` that depended on bytes up to
    /// `dependency_end` can be affected.
    pub(crate) fn touches(&self, start: usize, dependency_end: usize) -> bool {
        self.start_byte < dependency_end && self.old_end_byte >= start
    }

    /// Translate an old offset into the new text.
    ///
    /// Offsets inside the replaced range collapse onto its new end. The end
    /// of the old text always follows the edit, so an insertion at the very
    /// end lands inside the root.
    pub(crate) fn map(&self, offset: usize, old_len: usize) -> usize {
        if offset <= self.start_byte && offset != old_len {
            offset
        } else if offset >= self.old_end_byte {
            offset.saturating_add_signed(self.delta())
        } else {
            self.new_end_byte
        }
    }

    /// Apply to a root of `old_len` bytes, path-copying touched subtrees.
    pub(crate) fn apply(&self, root: &Arc<Subtree>, old_len: usize) -> Arc<Subtree> {
        let mut edited = self.apply_at(root, 0, old_len);
        let new_len = old_len.saturating_add_signed(self.delta());
        if edited.size != new_len {
            let root = Arc::make_mut(&mut edited);
            root.size = new_len;
            root.has_changes = true;
        }
        edited
    }

    fn apply_at(&self, node: &Arc<Subtree>, start: usize, old_len: usize) -> Arc<Subtree> {
        let end = start + node.size;
        if !self.touches(start, end + node.lookahead_bytes) {
            return Arc::clone(node);
        }

        let mut copy = Subtree::clone(node);
        copy.has_changes = true;
        copy.size = self.map(end, old_len) - self.map(start, old_len);

        let mut child_start = start;
        copy.children = node
            .children
            .iter()
            .map(|child| {
                let edited = self.apply_at(child, child_start, old_len);
                child_start += child.size;
                edited
            })
            .collect();
        Arc::new(copy)
    }
}
