use super::Node;

/// Stateful pre-order walker over visible nodes.
///
/// The cursor never leaves the node it was created on.
pub struct TreeCursor<'t> {
    /// Sibling lists from the start node down to the current node.
    stack: Vec<(Vec<Node<'t>>, usize)>,
    exhausted: bool,
}

impl<'t> TreeCursor<'t> {
    pub(crate) fn new(node: Node<'t>) -> Self {
        Self {
            stack: vec![(vec![node], 0)],
            exhausted: false,
        }
    }

    pub fn node(&self) -> Node<'t> {
        let (siblings, index) = &self.stack[self.stack.len() - 1];
        siblings[*index]
    }

    pub fn field_name(&self) -> Option<&'t str> {
        self.node().field_name()
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    pub fn goto_first_child(&mut self) -> bool {
        let children = self.node().children();
        if children.is_empty() {
            return false;
        }
        self.stack.push((children, 0));
        true
    }

    pub fn goto_next_sibling(&mut self) -> bool {
        if self.stack.len() == 1 {
            return false;
        }
        let Some((siblings, index)) = self.stack.last_mut() else {
            return false;
        };
        if *index + 1 >= siblings.len() {
            return false;
        }
        *index += 1;
        true
    }

    pub fn goto_parent(&mut self) -> bool {
        if self.stack.len() == 1 {
            return false;
        }
        self.stack.pop();
        true
    }

    /// Move to the next node in pre-order. Returns false after the last one.
    pub fn goto_next(&mut self) -> bool {
        if self.goto_first_child() {
            return true;
        }
        loop {
            if self.goto_next_sibling() {
                return true;
            }
            if !self.goto_parent() {
                return false;
            }
        }
    }

    /// Move to the first child containing `offset`, returning its index.
    pub fn goto_first_child_for_byte(&mut self, offset: usize) -> Option<usize> {
        let children = self.node().children();
        let index = children.iter().position(|c| offset < c.end_byte())?;
        self.stack.push((children, index));
        Some(index)
    }
}

impl<'t> Iterator for TreeCursor<'t> {
    type Item = Node<'t>;

    /// Yields the current node, then advances in pre-order.
    fn next(&mut self) -> Option<Node<'t>> {
        if self.exhausted {
            return None;
        }
        let node = self.node();
        self.exhausted = !self.goto_next();
        Some(node)
    }
}
