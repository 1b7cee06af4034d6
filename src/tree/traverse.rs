//! Depth-first and breadth-first walks over the binary encoding.
//!
//! Both orders start at the root's first child and follow the encoding, not
//! the n-ary structure:
//! - depth-first is the binary in-order walk (first-child subtree, node, sibling
//!   chain), so a node is visited after all of its descendants;
//! - breadth-first dequeues a node, then enqueues its next sibling and its first
//!   child, which is not strict n-ary level order when subtree depths differ.

use std::cell::Cell;
use std::collections::VecDeque;

use tracing::{instrument, trace};

use crate::domain::{NodeId, NodeRef};
use crate::tree::Tree;

/// Traversal order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Traversal {
    #[default]
    DepthFirst,
    BreadthFirst,
}

/// Cooperative cancellation flag handed to traversal callbacks.
///
/// The flag is checked before every visit: once a callback calls
/// [`Cancel::cancel`], that callback returns normally and no other callback
/// fires.
#[derive(Debug, Default)]
pub struct Cancel {
    stopped: Cell<bool>,
}

impl Cancel {
    pub fn cancel(&self) {
        self.stopped.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.get()
    }
}

/// Binary in-order iterator (first child, node, next sibling).
pub struct DepthFirstIter<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
    cursor: Option<NodeId>,
}

impl<'a> DepthFirstIter<'a> {
    pub(crate) fn new(tree: &'a Tree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            stack: Vec::new(),
            cursor: start,
        }
    }
}

impl<'a> Iterator for DepthFirstIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Descend along first-child links, remembering the way back
        while let Some(id) = self.cursor {
            self.stack.push(id);
            self.cursor = self.tree.first_child_of(id);
        }
        let id = self.stack.pop()?;
        let node = self.tree.node(id)?;
        self.cursor = node.next_sibling;
        Some(NodeRef::new(id, node))
    }
}

/// Queue-based iterator over the binary encoding (next sibling before first child).
pub struct BreadthFirstIter<'a> {
    tree: &'a Tree,
    queue: VecDeque<NodeId>,
}

impl<'a> BreadthFirstIter<'a> {
    pub(crate) fn new(tree: &'a Tree, start: Option<NodeId>) -> Self {
        Self {
            tree,
            queue: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for BreadthFirstIter<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.queue.pop_front()?;
        let node = self.tree.node(id)?;
        if let Some(sibling) = node.next_sibling {
            self.queue.push_back(sibling);
        }
        if let Some(child) = node.first_child {
            self.queue.push_back(child);
        }
        Some(NodeRef::new(id, node))
    }
}

impl Tree {
    /// Iterates the whole tree (root excluded) in the given order.
    pub fn iter(&self, order: Traversal) -> Box<dyn Iterator<Item = NodeRef<'_>> + '_> {
        self.iter_from(self.first_child_of(self.root), order)
    }

    /// Iterates the encoding reachable from `start`, its sibling chain included.
    pub(crate) fn iter_from(
        &self,
        start: Option<NodeId>,
        order: Traversal,
    ) -> Box<dyn Iterator<Item = NodeRef<'_>> + '_> {
        match order {
            Traversal::DepthFirst => Box::new(DepthFirstIter::new(self, start)),
            Traversal::BreadthFirst => Box::new(BreadthFirstIter::new(self, start)),
        }
    }

    /// Visits every node (root excluded) in the given order.
    ///
    /// The callback receives a [`Cancel`] handle; after `cancel()` no further
    /// node is visited.
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use xtree::{Traversal, Tree};
    ///
    /// let tree = Tree::from_data(&json!([
    ///     {"value": "A", "children": [{"value": "A1"}, {"value": "A2"}]},
    ///     {"value": "B"}
    /// ]))
    /// .unwrap();
    ///
    /// let mut seen = Vec::new();
    /// tree.traverse(Traversal::DepthFirst, |node, cancel| {
    ///     seen.push(node.value().to_string());
    ///     if node.value() == "A" {
    ///         cancel.cancel();
    ///     }
    /// });
    /// assert_eq!(seen, ["A1", "A2", "A"]);
    /// ```
    #[instrument(level = "trace", skip(self, callback))]
    pub fn traverse<F>(&self, order: Traversal, mut callback: F)
    where
        F: FnMut(NodeRef<'_>, &Cancel),
    {
        let cancel = Cancel::default();
        for node in self.iter(order) {
            if cancel.is_cancelled() {
                trace!(at = %node.value(), "traversal cancelled");
                break;
            }
            callback(node, &cancel);
        }
    }
}
