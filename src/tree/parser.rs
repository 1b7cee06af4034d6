//! Nested data to LCRS encoding.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::TreeOptions;
use crate::domain::{Node, NodeId, NodeValue, Payload, TreeError, TreeResult};
use crate::tree::Tree;

impl Tree {
    /// Builds a tree from nested data with default options.
    pub fn from_data(items: &Value) -> TreeResult<Self> {
        Self::from_data_with_options(items, TreeOptions::default())
    }

    pub fn from_data_with_options(items: &Value, options: TreeOptions) -> TreeResult<Self> {
        let mut tree = Self::with_options(options);
        tree.parse(items)?;
        Ok(tree)
    }

    /// Replaces the whole tree with `items`.
    ///
    /// A non-array input is ignored. Each item becomes a trailing child of the
    /// root and the change token moves once for the whole batch. Every former
    /// node is released, detached ones included, so their handles go stale. On
    /// error the tree is left as it was.
    #[instrument(level = "debug", skip(self, items))]
    pub fn parse(&mut self, items: &Value) -> TreeResult<()> {
        if !items.is_array() {
            debug!("parse input is not an array, ignoring");
            return Ok(());
        }

        let root = self.root;
        let former: Vec<NodeId> = self
            .arena
            .iter()
            .map(|(index, _)| NodeId(index))
            .filter(|id| *id != root)
            .collect();

        let nodes = self.parse_nodes(items)?;

        for id in &former {
            self.arena.remove(id.0);
        }
        if let Some(r) = self.node_mut(root) {
            r.first_child = None;
        }
        let mut tail: Option<NodeId> = None;
        for id in &nodes {
            self.link_after_tail(root, tail, *id);
            tail = Some(*id);
        }

        self.touch();
        debug!(top_level = nodes.len(), released = former.len(), "parsed tree data");
        Ok(())
    }

    /// Builds one detached node per item. A non-array input yields nothing.
    #[instrument(level = "trace", skip(self, items))]
    pub fn parse_nodes(&mut self, items: &Value) -> TreeResult<Vec<NodeId>> {
        let Some(items) = items.as_array() else {
            return Ok(Vec::new());
        };
        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            match self.parse_node(item) {
                Ok(id) => nodes.push(id),
                Err(e) => {
                    for id in nodes {
                        self.free_subtree(id);
                    }
                    return Err(e);
                }
            }
        }
        Ok(nodes)
    }

    /// Builds a detached subtree from a single item.
    ///
    /// The first entry of the children array becomes the first child; the
    /// others are chained as its siblings. Every child's parent is the node
    /// being built.
    pub fn parse_node(&mut self, item: &Value) -> TreeResult<NodeId> {
        let Value::Object(fields) = item else {
            return Err(TreeError::illegal(format!("item must be an object, got {item}")));
        };

        let value_key = self.options.value_key.clone();
        let children_key = self.options.children_key.clone();

        let value = fields
            .get(&value_key)
            .map(NodeValue::from_json)
            .unwrap_or_else(|| Err(TreeError::illegal(format!("missing `{value_key}`"))))?;
        let payload: Payload = fields
            .iter()
            .filter(|(k, _)| **k != value_key && **k != children_key)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let id = self.adopt(Node::new(value, payload)?);

        let children = fields
            .get(&children_key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut tail: Option<NodeId> = None;
        for child in children {
            let child_id = match self.parse_node(child) {
                Ok(child_id) => child_id,
                Err(e) => {
                    self.free_subtree(id);
                    return Err(e);
                }
            };
            self.link_after_tail(id, tail, child_id);
            tail = Some(child_id);
        }

        Ok(id)
    }

    /// Appends `node` to `parent`'s children given the current last child.
    pub(crate) fn link_after_tail(&mut self, parent: NodeId, tail: Option<NodeId>, node: NodeId) {
        match tail.and_then(|t| self.node_mut(t)) {
            Some(last) => last.next_sibling = Some(node),
            None => {
                if let Some(p) = self.node_mut(parent) {
                    p.first_child = Some(node);
                }
            }
        }
        if let Some(n) = self.node_mut(node) {
            n.parent = Some(parent);
        }
    }
}
