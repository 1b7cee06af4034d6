//! Navigation and search.
//!
//! Every query accepts an optional handle. Absent or stale handles yield an
//! empty or neutral result, never an error.

use tracing::instrument;

use crate::domain::{NodeId, NodeRef, NodeValue};
use crate::tree::{Traversal, Tree};

/// Which siblings [`Tree::siblings`] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Siblings {
    /// Siblings before the node, in order
    Left,
    /// Siblings after the node, in order
    Right,
    /// Left siblings followed by right siblings
    #[default]
    All,
}

/// Search criterion for [`Tree::find`].
pub enum Query<'a> {
    Value(NodeValue),
    Predicate(Box<dyn Fn(NodeRef<'_>) -> bool + 'a>),
    /// Matches nothing.
    Absent,
}

impl<'a> Query<'a> {
    pub fn predicate(f: impl Fn(NodeRef<'_>) -> bool + 'a) -> Self {
        Self::Predicate(Box::new(f))
    }

    fn matches(&self, node: NodeRef<'_>) -> bool {
        match self {
            Self::Value(value) => node.value() == value,
            Self::Predicate(predicate) => predicate(node),
            Self::Absent => false,
        }
    }
}

impl From<NodeValue> for Query<'_> {
    fn from(value: NodeValue) -> Self {
        Self::Value(value)
    }
}

impl From<&NodeValue> for Query<'_> {
    fn from(value: &NodeValue) -> Self {
        Self::Value(value.clone())
    }
}

impl From<&str> for Query<'_> {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Query<'_> {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<&String> for Query<'_> {
    fn from(value: &String) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Query<'_> {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for Query<'_> {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<Option<&str>> for Query<'_> {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, Self::from)
    }
}

impl From<Option<NodeValue>> for Query<'_> {
    fn from(value: Option<NodeValue>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

impl Tree {
    /// True when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.first_child_of(self.root).is_none()
    }

    /// Number of parent steps from `node` up to the root.
    ///
    /// 0 for the root, for absent handles, and for nodes whose parent chain
    /// does not end at the root (detached nodes).
    #[instrument(level = "trace", skip(self, node))]
    pub fn depth(&self, node: impl Into<Option<NodeId>>) -> usize {
        self.ancestor_chain(node.into()).map_or(0, |chain| chain.len())
    }

    /// Length of the longest downward path from `node` to a leaf.
    ///
    /// 0 for leaves, absent handles and the root of an empty tree. Only the
    /// node's own descendants count, not its siblings.
    #[instrument(level = "trace", skip(self, node))]
    pub fn height(&self, node: impl Into<Option<NodeId>>) -> usize {
        match node.into().and_then(|id| self.node(id)) {
            Some(node) => self.chain_height(node.first_child).map_or(0, |h| h + 1),
            None => 0,
        }
    }

    /// Height of the tallest node in a sibling chain; `None` for an empty chain.
    ///
    /// Moving across siblings adds nothing, descending into children adds one.
    fn chain_height(&self, first: Option<NodeId>) -> Option<usize> {
        self.siblings_from(first)
            .map(|id| self.chain_height(self.first_child_of(id)).map_or(0, |h| h + 1))
            .max()
    }

    /// Counts the nodes reachable from `node` through first-child and
    /// next-sibling links, `node` included.
    ///
    /// Without a start this counts the whole tree, root excluded. Note that a
    /// start with right siblings counts those siblings and their subtrees too.
    #[instrument(level = "trace", skip(self, node))]
    pub fn size(&self, node: impl Into<Option<NodeId>>) -> usize {
        let start = node
            .into()
            .or_else(|| self.first_child_of(self.root))
            .filter(|id| self.contains(*id));
        self.iter_from(start, Traversal::BreadthFirst).count()
    }

    /// Ancestors from nearest to farthest; the root sentinel comes last.
    ///
    /// Empty for the root itself, absent handles and detached nodes.
    #[instrument(level = "trace", skip(self, node))]
    pub fn parents(&self, node: impl Into<Option<NodeId>>) -> Vec<NodeId> {
        self.ancestor_chain(node.into()).unwrap_or_default()
    }

    /// Parent links from `node` up to the root, or `None` when the chain
    /// breaks before reaching it.
    fn ancestor_chain(&self, node: Option<NodeId>) -> Option<Vec<NodeId>> {
        let mut id = node?;
        let mut current = self.node(id)?;
        let mut chain = Vec::new();
        while !current.is_root() {
            let parent = current.parent?;
            // former top-level nodes of a cleared tree still point at the root
            if self.is_root_id(parent) && !self.is_listed_child(id) {
                return None;
            }
            chain.push(parent);
            id = parent;
            current = self.node(parent)?;
        }
        Some(chain)
    }

    /// The n-ary children of `node`, in order.
    pub fn children(&self, node: impl Into<Option<NodeId>>) -> Vec<NodeId> {
        let first = node.into().and_then(|id| self.first_child_of(id));
        self.siblings_from(first).collect()
    }

    /// Walks a sibling chain starting at `first`.
    pub(crate) fn siblings_from(&self, first: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(first.filter(|id| self.contains(*id)), |id| {
            self.next_sibling_of(*id)
        })
    }

    /// Siblings of `node` sharing its parent, excluding `node` itself.
    #[instrument(level = "trace", skip(self, node))]
    pub fn siblings(&self, node: impl Into<Option<NodeId>>, pos: Siblings) -> Vec<NodeId> {
        let Some(id) = node.into().filter(|id| self.contains(*id)) else {
            return Vec::new();
        };
        match pos {
            Siblings::Left => self.left_siblings(id),
            Siblings::Right => self.right_siblings(id),
            Siblings::All => {
                let mut all = self.left_siblings(id);
                all.extend(self.right_siblings(id));
                all
            }
        }
    }

    fn left_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let first = self.parent_of(id).and_then(|p| self.first_child_of(p));
        self.siblings_from(first).take_while(|s| *s != id).collect()
    }

    fn right_siblings(&self, id: NodeId) -> Vec<NodeId> {
        self.siblings_from(self.next_sibling_of(id)).collect()
    }

    /// Sibling immediately before `id` in its chain.
    pub(crate) fn left_sibling(&self, id: NodeId) -> Option<NodeId> {
        let first = self.first_child_of(self.parent_of(id)?);
        self.siblings_from(first)
            .find(|s| self.next_sibling_of(*s) == Some(id))
    }

    /// True when `node` is its parent's first child.
    pub fn is_first_child(&self, node: impl Into<Option<NodeId>>) -> bool {
        node.into().is_some_and(|id| {
            self.parent_of(id)
                .and_then(|p| self.first_child_of(p))
                .is_some_and(|first| first == id)
        })
    }

    /// First node, in depth-first order, matching a value or a predicate.
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use xtree::{Query, Tree};
    ///
    /// let tree = Tree::from_data(&json!([
    ///     {"value": "330000", "label": "Zhejiang", "children": [{"value": "330100", "label": "Hangzhou"}]}
    /// ]))
    /// .unwrap();
    ///
    /// let by_value = tree.find("330100").unwrap();
    /// let by_label = tree
    ///     .find(Query::predicate(|n| n.get("label") == Some(&json!("Hangzhou"))))
    ///     .unwrap();
    /// assert_eq!(by_value, by_label);
    /// assert!(tree.find("unknown").is_none());
    /// ```
    pub fn find<'q>(&self, query: impl Into<Query<'q>>) -> Option<NodeId> {
        let query = query.into();
        if matches!(query, Query::Absent) {
            return None;
        }
        self.iter(Traversal::DepthFirst)
            .find(|node| query.matches(*node))
            .map(|node| node.id())
    }

    /// Shorthand for `find(Query::predicate(predicate))`.
    pub fn find_by<P>(&self, predicate: P) -> Option<NodeId>
    where
        P: Fn(NodeRef<'_>) -> bool,
    {
        self.iter(Traversal::DepthFirst)
            .find(|node| predicate(*node))
            .map(|node| node.id())
    }

    /// All nodes matching `predicate`, in depth-first order.
    pub fn filter<P>(&self, predicate: P) -> Vec<NodeId>
    where
        P: Fn(NodeRef<'_>) -> bool,
    {
        self.iter(Traversal::DepthFirst)
            .filter(|node| predicate(*node))
            .map(|node| node.id())
            .collect()
    }

    /// Leaf nodes in depth-first order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.filter(|node| node.is_leaf())
    }
}
