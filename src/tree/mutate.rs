//! Structural mutations.
//!
//! Each successful mutation moves the change token exactly once. Absent or
//! stale handles are ignored (`false`); contract violations raise
//! [`TreeError::InvalidOperation`].

use tracing::{debug, instrument, warn};

use crate::domain::{NodeId, TreeError, TreeResult};
use crate::tree::Tree;

/// Where [`Tree::insert_child`] places the new child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Position {
    /// Before the current first child
    Leading,
    /// After the current last child
    #[default]
    Trailing,
}

impl Tree {
    /// Attaches `node` as a child of `parent` (the root when `None`).
    ///
    /// A node that is currently attached elsewhere is moved. Inserting the root,
    /// or inserting a node below itself, is rejected.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_child(
        &mut self,
        node: NodeId,
        parent: Option<NodeId>,
        pos: Position,
    ) -> TreeResult<bool> {
        let parent = parent.unwrap_or(self.root);
        if !self.contains(node) || !self.contains(parent) {
            debug!("insert_child: absent node or parent");
            return Ok(false);
        }
        self.check_insertable(node, parent)?;

        self.detach(node);
        match (pos, self.children(parent).last().copied()) {
            (Position::Trailing, Some(last)) => self.splice_after(node, last),
            _ => {
                let first = self.first_child_of(parent);
                if let Some(p) = self.node_mut(parent) {
                    p.first_child = Some(node);
                }
                if let Some(n) = self.node_mut(node) {
                    n.next_sibling = first;
                    n.parent = Some(parent);
                }
            }
        }
        self.touch();
        Ok(true)
    }

    /// Splices `node` into the sibling chain right before `sibling`.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_before(&mut self, node: NodeId, sibling: NodeId) -> TreeResult<bool> {
        let Some(parent) = self.sibling_target(node, sibling)? else {
            return Ok(false);
        };
        self.check_insertable(node, parent)?;

        self.detach(node);
        match self.left_sibling(sibling) {
            Some(left) => self.splice_after(node, left),
            None => {
                if let Some(p) = self.node_mut(parent) {
                    p.first_child = Some(node);
                }
                if let Some(n) = self.node_mut(node) {
                    n.next_sibling = Some(sibling);
                    n.parent = Some(parent);
                }
            }
        }
        self.touch();
        Ok(true)
    }

    /// Splices `node` into the sibling chain right after `sibling`.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_after(&mut self, node: NodeId, sibling: NodeId) -> TreeResult<bool> {
        let Some(parent) = self.sibling_target(node, sibling)? else {
            return Ok(false);
        };
        self.check_insertable(node, parent)?;

        self.detach(node);
        self.splice_after(node, sibling);
        self.touch();
        Ok(true)
    }

    /// Detaches `node` and its subtree from the tree.
    ///
    /// Returns `false` for absent handles, the root, and nodes that are not
    /// attached. The subtree stays intact and its handle stays valid: it can be
    /// inserted again or released with [`Tree::discard`].
    #[instrument(level = "debug", skip(self, node))]
    pub fn remove(&mut self, node: impl Into<Option<NodeId>>) -> bool {
        let Some(id) = node.into().filter(|id| self.contains(*id)) else {
            return false;
        };
        if self.is_root_id(id) || !self.detach(id) {
            return false;
        }
        self.touch();
        true
    }

    /// Drops every node below the root in O(1).
    ///
    /// The former nodes stay allocated until the next [`Tree::parse`] or until
    /// they are released with [`Tree::discard`].
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        if let Some(root) = self.node_mut(self.root) {
            root.first_child = None;
        }
        self.touch();
    }

    /// Releases a detached node together with its subtree and returns the
    /// number of freed nodes.
    ///
    /// Only heads of detached subtrees qualify: removed nodes and the former
    /// top-level nodes of a cleared tree. Anything still listed as a child,
    /// and the root, is left alone (0).
    #[instrument(level = "debug", skip(self))]
    pub fn discard(&mut self, node: NodeId) -> usize {
        if !self.contains(node) || self.is_root_id(node) || self.is_listed_child(node) {
            return 0;
        }
        // A node of a cleared forest still points at its parent
        if let Some(n) = self.node_mut(node) {
            n.next_sibling = None;
        }
        self.free_subtree(node)
    }

    /// True when `node` is reachable from the root through child links.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if self.is_root_id(current) {
                return true;
            }
            let Some(parent) = self.parent_of(current) else {
                return false;
            };
            if !self.is_listed_child(current) {
                return false;
            }
            current = parent;
        }
    }

    /// True when `node` appears in its parent's child chain.
    pub(crate) fn is_listed_child(&self, node: NodeId) -> bool {
        self.parent_of(node).is_some_and(|parent| {
            self.siblings_from(self.first_child_of(parent)).any(|c| c == node)
        })
    }

    /// Frees `node`, its descendants and its sibling chain from the arena.
    pub(crate) fn free_subtree(&mut self, node: NodeId) -> usize {
        let mut stack = vec![node];
        let mut freed = 0;
        while let Some(id) = stack.pop() {
            if let Some(n) = self.arena.remove(id.0) {
                stack.extend(n.first_child);
                stack.extend(n.next_sibling);
                freed += 1;
            }
        }
        debug!(freed, "released nodes");
        freed
    }

    /// Parent of `sibling` when inserting next to it is possible.
    fn sibling_target(&self, node: NodeId, sibling: NodeId) -> TreeResult<Option<NodeId>> {
        if self.is_root_id(sibling) {
            warn!("rejected sibling insertion next to root");
            return Err(TreeError::invalid("cannot insert a sibling node to root"));
        }
        if node == sibling || !self.contains(node) || !self.is_listed_child(sibling) {
            return Ok(None);
        }
        Ok(self.parent_of(sibling))
    }

    /// Rejects inserting the root, or a node into its own subtree.
    fn check_insertable(&self, node: NodeId, parent: NodeId) -> TreeResult<()> {
        if self.is_root_id(node) {
            warn!("rejected insertion of root");
            return Err(TreeError::invalid("cannot insert the root node"));
        }
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == node {
                warn!("rejected insertion into own subtree");
                return Err(TreeError::invalid("cannot insert a node into its own subtree"));
            }
            current = self.parent_of(id);
        }
        Ok(())
    }

    /// Links `node` right after `left`, sharing its parent.
    fn splice_after(&mut self, node: NodeId, left: NodeId) {
        let parent = self.parent_of(left);
        let right = self.next_sibling_of(left);
        if let Some(l) = self.node_mut(left) {
            l.next_sibling = Some(node);
        }
        if let Some(n) = self.node_mut(node) {
            n.next_sibling = right;
            n.parent = parent;
        }
    }

    /// Unlinks `node` from its parent's chain and clears its parent and
    /// sibling links. Nodes that are not linked are left untouched.
    fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.parent_of(node) else {
            return false;
        };
        let right = self.next_sibling_of(node);
        let linked = if self.first_child_of(parent) == Some(node) {
            if let Some(p) = self.node_mut(parent) {
                p.first_child = right;
            }
            true
        } else if let Some(left) = self.left_sibling(node) {
            if let Some(l) = self.node_mut(left) {
                l.next_sibling = right;
            }
            true
        } else {
            false
        };
        if linked {
            if let Some(n) = self.node_mut(node) {
                n.parent = None;
                n.next_sibling = None;
            }
        }
        linked
    }
}
