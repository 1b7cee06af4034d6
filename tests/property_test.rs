//! Structural properties checked over generated nested data.

use std::collections::HashMap;

use proptest::prelude::*;
use serde_json::{json, Value};
use xtree::{NodeId, Payload, Position, Traversal, Tree};

fn item() -> impl Strategy<Value = Value> {
    let leaf = "[a-z]{1,4}".prop_map(|v| json!({ "value": v }));
    leaf.prop_recursive(4, 48, 4, |inner| {
        ("[a-z]{1,4}", prop::collection::vec(inner, 1..4))
            .prop_map(|(v, children)| json!({ "value": v, "children": children }))
    })
}

fn forest() -> impl Strategy<Value = Value> {
    prop::collection::vec(item(), 0..5).prop_map(Value::Array)
}

fn count(items: &Value) -> usize {
    items.as_array().map_or(0, |items| {
        items
            .iter()
            .map(|item| 1 + item.get("children").map_or(0, count))
            .sum()
    })
}

fn positions(tree: &Tree, order: Traversal) -> HashMap<NodeId, usize> {
    tree.iter(order)
        .enumerate()
        .map(|(i, node)| (node.id(), i))
        .collect()
}

proptest! {
    #[test]
    fn given_any_forest_when_parsed_then_size_counts_every_item(data in forest()) {
        let tree = Tree::from_data(&data).unwrap();
        prop_assert_eq!(tree.size(None), count(&data));
        prop_assert_eq!(tree.iter(Traversal::DepthFirst).count(), count(&data));
        prop_assert_eq!(tree.iter(Traversal::BreadthFirst).count(), count(&data));
    }

    #[test]
    fn given_any_forest_when_to_data_then_input_returned(data in forest()) {
        let tree = Tree::from_data(&data).unwrap();
        prop_assert_eq!(Value::Array(tree.to_data()), data);
    }

    #[test]
    fn given_any_node_then_depth_is_parent_count_and_height_zero_iff_leaf(data in forest()) {
        let tree = Tree::from_data(&data).unwrap();
        for node in tree.iter(Traversal::BreadthFirst) {
            prop_assert_eq!(tree.depth(node.id()), tree.parents(node.id()).len());
            prop_assert_eq!(tree.height(node.id()) == 0, node.is_leaf());
            for child in tree.children(node.id()) {
                prop_assert_eq!(tree.depth(child), tree.depth(node.id()) + 1);
                prop_assert!(tree.height(child) < tree.height(node.id()));
            }
        }
    }

    #[test]
    fn given_any_forest_then_depth_first_visits_children_before_parent(data in forest()) {
        let tree = Tree::from_data(&data).unwrap();
        let dfs = positions(&tree, Traversal::DepthFirst);
        let bfs = positions(&tree, Traversal::BreadthFirst);
        for node in tree.iter(Traversal::DepthFirst) {
            for child in tree.children(node.id()) {
                prop_assert!(dfs[&child] < dfs[&node.id()]);
                prop_assert!(bfs[&child] > bfs[&node.id()]);
            }
        }
    }

    #[test]
    fn given_cancel_after_k_visits_then_exactly_k_visited(data in forest(), k in 1usize..20) {
        let tree = Tree::from_data(&data).unwrap();
        for order in [Traversal::DepthFirst, Traversal::BreadthFirst] {
            let mut visited = 0;
            tree.traverse(order, |_, cancel| {
                visited += 1;
                if visited == k {
                    cancel.cancel();
                }
            });
            prop_assert_eq!(visited, k.min(tree.size(None)));
        }
    }

    #[test]
    fn given_any_forest_when_inserting_then_token_moves_and_size_grows(data in forest()) {
        let mut tree = Tree::from_data(&data).unwrap();
        let before = tree.size(None);
        let token = tree.token();
        let n = tree.create_node("new", Payload::new()).unwrap();
        prop_assert!(tree.insert_child(n, None, Position::Leading).unwrap());
        prop_assert_ne!(tree.token(), token);
        prop_assert_eq!(tree.size(None), before + 1);
        prop_assert_eq!(tree.children(tree.root())[0], n);
    }

    #[test]
    fn given_top_level_node_when_removed_then_size_drops_by_subtree(data in forest()) {
        let mut tree = Tree::from_data(&data).unwrap();
        let before = tree.size(None);
        if let Some(&first) = tree.children(tree.root()).first() {
            let subtree = 1 + tree.children(first).first().map_or(0, |c| tree.size(*c));
            prop_assert!(tree.remove(first));
            prop_assert_eq!(tree.size(None), before - subtree);
            prop_assert_eq!(tree.size(first), subtree);
        }
    }
}
