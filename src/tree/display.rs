/*
Rendering goes through a trait so that both a whole tree and a single
subtree can be turned into a termtree::Tree<String>.
 */
use std::fmt;

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::{NodeId, NodeRef};
use crate::tree::Tree;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> TermTree<String>;
}

impl TreeDisplay for Tree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> TermTree<String> {
        subtree(self, self.root_node())
    }
}

impl TreeDisplay for (&Tree, NodeId) {
    fn to_tree_string(&self) -> TermTree<String> {
        let (tree, id) = *self;
        match tree.get(id) {
            Some(node) => subtree(tree, node),
            None => TermTree::new("<absent>".to_string()),
        }
    }
}

fn label(node: NodeRef<'_>) -> String {
    match node.get("label").and_then(|l| l.as_str()) {
        Some(label) => format!("{} ({label})", node.value()),
        None => node.value().to_string(),
    }
}

fn subtree(tree: &Tree, node: NodeRef<'_>) -> TermTree<String> {
    let leaves: Vec<_> = tree
        .children(node.id())
        .into_iter()
        .filter_map(|id| tree.get(id))
        .map(|child| subtree(tree, child))
        .collect();

    TermTree::new(label(node)).with_leaves(leaves)
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree_string())
    }
}
