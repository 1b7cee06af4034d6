//! The tree: a synthetic root plus an arena of LCRS-encoded nodes.
//!
//! Operations are split by concern:
//! - [`parser`]: nested data to encoding
//! - [`traverse`]: depth-first and breadth-first walks
//! - [`query`]: navigation and search
//! - [`mutate`]: insertion and removal
//! - [`project`]: flat and nested views
//! - [`display`]: terminal rendering

use std::fmt;
use std::ops::Index;

use generational_arena::Arena;
use tracing::{instrument, trace};
use uuid::Uuid;

use crate::config::TreeOptions;
use crate::domain::{Node, NodeId, NodeRef, NodeValue, Payload, TreeResult};

pub mod display;
pub mod mutate;
pub mod parser;
pub mod project;
pub mod query;
pub mod traverse;

pub use display::TreeDisplay;
pub use mutate::Position;
pub use query::{Query, Siblings};
pub use traverse::{BreadthFirstIter, Cancel, DepthFirstIter, Traversal};

/// Opaque marker that changes on every structural mutation.
///
/// Only inequality between two observations is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeToken(Uuid);

impl ChangeToken {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ChangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// N-ary tree stored as a left-child/right-sibling binary encoding.
///
/// The tree owns every node in a generational arena and always contains a
/// synthetic root whose value is [`ROOT_VALUE`](crate::domain::ROOT_VALUE).
/// Top-level data items are the root's children.
#[derive(Debug)]
pub struct Tree {
    arena: Arena<Node>,
    root: NodeId,
    token: ChangeToken,
    options: TreeOptions,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::with_options(TreeOptions::default())
    }

    pub fn with_options(options: TreeOptions) -> Self {
        let mut arena = Arena::new();
        let root = NodeId(arena.insert(Node::root()));
        Self {
            arena,
            root,
            token: ChangeToken::fresh(),
            options,
        }
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    /// Handle of the synthetic root.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> NodeRef<'_> {
        NodeRef::new(self.root, &self.arena[self.root.0])
    }

    /// Current change token.
    pub fn token(&self) -> ChangeToken {
        self.token
    }

    /// Looks a node up; `None` for absent or stale handles.
    pub fn get(&self, id: impl Into<Option<NodeId>>) -> Option<NodeRef<'_>> {
        let id = id.into()?;
        self.arena.get(id.0).map(|node| NodeRef::new(id, node))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    /// Number of nodes held by the arena, detached ones and the root included.
    pub fn allocated(&self) -> usize {
        self.arena.len()
    }

    /// Moves a detached node into the arena without linking it anywhere.
    #[instrument(level = "trace", skip(self))]
    pub fn adopt(&mut self, mut node: Node) -> NodeId {
        node.unlink();
        NodeId(self.arena.insert(node))
    }

    /// Creates a detached node in the arena.
    pub fn create_node(
        &mut self,
        value: impl Into<NodeValue>,
        payload: Payload,
    ) -> TreeResult<NodeId> {
        Ok(self.adopt(Node::new(value, payload)?))
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id.0)
    }

    pub(crate) fn first_child_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.first_child)
    }

    pub(crate) fn next_sibling_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.next_sibling)
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub(crate) fn is_root_id(&self, id: NodeId) -> bool {
        id == self.root
    }

    /// Marks a structural change.
    pub(crate) fn touch(&mut self) {
        self.token = ChangeToken::fresh();
        trace!(token = %self.token, "tree changed");
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    /// Panics on stale handles; use [`Tree::get`] for a checked lookup.
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.arena[id.0]
    }
}
