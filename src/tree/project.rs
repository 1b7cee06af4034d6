//! Flat and nested views of the tree.

use std::iter;

use serde_json::{Map, Value};
use tracing::instrument;

use crate::domain::{NodeId, NodeRef};
use crate::tree::{Traversal, Tree};

impl Tree {
    /// Breadth-first linearization using the configured parent key.
    ///
    /// See [`Tree::flatten_with_key`].
    pub fn flatten(&self, node: impl Into<Option<NodeId>>) -> Vec<Value> {
        self.flatten_with_key(node, &self.options.parent_key)
    }

    /// Breadth-first linearization into single-level objects
    /// `{...payload, <value_key>: value, <parent_key>: parent value}`.
    ///
    /// Without a start (or starting at the root) the whole tree is flattened
    /// and the root itself is skipped. Otherwise the start node comes first,
    /// followed by its descendants. Direct children of the root carry no
    /// parent key.
    #[instrument(level = "debug", skip(self, node))]
    pub fn flatten_with_key(&self, node: impl Into<Option<NodeId>>, parent_key: &str) -> Vec<Value> {
        let nodes: Box<dyn Iterator<Item = NodeRef<'_>> + '_> = match node.into() {
            None => self.iter(Traversal::BreadthFirst),
            Some(id) if self.is_root_id(id) => self.iter(Traversal::BreadthFirst),
            Some(id) => match self.get(id) {
                Some(start) => Box::new(
                    iter::once(start)
                        .chain(self.iter_from(start.first_child(), Traversal::BreadthFirst)),
                ),
                None => return Vec::new(),
            },
        };
        nodes.map(|node| self.flat_entry(node, parent_key)).collect()
    }

    fn flat_entry(&self, node: NodeRef<'_>, parent_key: &str) -> Value {
        let mut entry = node.payload().clone();
        entry.insert(self.options.value_key.clone(), node.value().to_json());
        let parent = node
            .parent()
            .filter(|p| !self.is_root_id(*p))
            .and_then(|p| self.node(p));
        match parent {
            Some(parent) => {
                entry.insert(parent_key.to_string(), parent.value().to_json());
            }
            None => {
                entry.remove(parent_key);
            }
        }
        Value::Object(entry)
    }

    /// Rebuilds a nested structure bottom-up.
    ///
    /// For every top-level node the children are projected first, then
    /// `callback(node, children)` builds the node's own projection. `children`
    /// is `None` for leaves.
    pub fn format<T, F>(&self, mut callback: F) -> Vec<T>
    where
        F: FnMut(NodeRef<'_>, Option<Vec<T>>) -> T,
    {
        self.children(self.root)
            .into_iter()
            .filter_map(|id| self.format_node(id, &mut callback))
            .collect()
    }

    fn format_node<T, F>(&self, id: NodeId, callback: &mut F) -> Option<T>
    where
        F: FnMut(NodeRef<'_>, Option<Vec<T>>) -> T,
    {
        let node = self.get(id)?;
        let mut children = Vec::new();
        for child in self.children(id) {
            children.extend(self.format_node(child, callback));
        }
        let children = (!children.is_empty()).then_some(children);
        Some(callback(node, children))
    }

    /// Nested data in the input shape: `{<value_key>, <children_key>?, ...payload}`.
    ///
    /// Empty children arrays are omitted.
    #[instrument(level = "debug", skip(self))]
    pub fn to_data(&self) -> Vec<Value> {
        let value_key = self.options.value_key.clone();
        let children_key = self.options.children_key.clone();
        self.format(|node, children| {
            let mut item = Map::new();
            item.insert(value_key.clone(), node.value().to_json());
            if let Some(children) = children {
                item.insert(children_key.clone(), Value::Array(children));
            }
            for (key, value) in node.payload() {
                item.entry(key.clone()).or_insert_with(|| value.clone());
            }
            Value::Object(item)
        })
    }
}
