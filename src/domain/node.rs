//! Binary tree cell of the left-child/right-sibling encoding.

use std::fmt;
use std::ops::Deref;

use generational_arena::Index;
use serde_json::{Map, Value};

use crate::domain::error::{TreeError, TreeResult};
use crate::domain::value::{NodeValue, ROOT_VALUE};

/// Opaque caller data carried by a node.
pub type Payload = Map<String, Value>;

/// Stable handle of a node inside its tree's arena.
///
/// Handles of discarded nodes go stale; every tree operation treats a stale
/// handle like an absent node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{slot}.{generation}")
    }
}

/// A node of the binary encoding.
///
/// `first_child` and `next_sibling` encode the n-ary structure; `parent` always
/// points at the n-ary parent, whatever the node's position in its sibling chain.
#[derive(Debug, Clone)]
pub struct Node {
    value: NodeValue,
    payload: Payload,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    /// Creates a detached node.
    ///
    /// Fails with [`TreeError::IllegalValue`] for an empty value or the reserved
    /// root value.
    pub fn new(value: impl Into<NodeValue>, payload: Payload) -> TreeResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(TreeError::illegal("value is empty"));
        }
        if value.is_root_value() {
            return Err(TreeError::illegal(format!("{ROOT_VALUE} is reserved")));
        }
        Ok(Self::unchecked(value, payload))
    }

    /// Creates a detached node without payload.
    pub fn leaf(value: impl Into<NodeValue>) -> TreeResult<Self> {
        Self::new(value, Payload::new())
    }

    /// Creates a detached node from a raw JSON value; `null` is rejected.
    pub fn from_json(value: &Value, payload: Payload) -> TreeResult<Self> {
        Self::new(NodeValue::from_json(value)?, payload)
    }

    pub(crate) fn root() -> Self {
        Self::unchecked(NodeValue::root(), Payload::new())
    }

    fn unchecked(value: NodeValue, payload: Payload) -> Self {
        Self {
            value,
            payload,
            first_child: None,
            next_sibling: None,
            parent: None,
        }
    }

    pub fn value(&self) -> &NodeValue {
        &self.value
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Payload {
        &mut self.payload
    }

    /// Shorthand for a payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.value.is_root_value()
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    pub(crate) fn unlink(&mut self) {
        self.first_child = None;
        self.next_sibling = None;
        self.parent = None;
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A borrowed node together with its handle.
///
/// Traversal callbacks and predicates receive this so that they can feed the
/// handle back into other tree queries.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    id: NodeId,
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(id: NodeId, node: &'a Node) -> Self {
        Self { id, node }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Self::Target {
        self.node
    }
}

impl From<NodeRef<'_>> for NodeId {
    fn from(node: NodeRef<'_>) -> Self {
        node.id
    }
}

impl From<NodeRef<'_>> for Option<NodeId> {
    fn from(node: NodeRef<'_>) -> Self {
        Some(node.id)
    }
}
