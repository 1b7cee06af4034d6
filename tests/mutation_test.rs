mod common;

use rstest::{fixture, rstest};
use serde_json::json;
use xtree::{Node, Payload, Position, Tree, TreeError};

use common::values;

#[fixture]
fn small() -> Tree {
    xtree::util::testing::init_test_setup();
    Tree::from_data(&json!([
        {"value": "A", "children": [{"value": "A1"}, {"value": "A2"}]},
        {"value": "B"}
    ]))
    .unwrap()
}

#[fixture]
fn areas() -> Tree {
    common::areas()
}

#[rstest]
fn given_new_node_when_insert_leading_under_root_then_first_top_level(mut small: Tree) {
    let c = small.create_node("C", Payload::new()).unwrap();
    let token = small.token();
    assert!(small.insert_child(c, None, Position::Leading).unwrap());
    assert_ne!(small.token(), token);
    assert_eq!(values(&small, small.children(small.root())), ["C", "A", "B"]);
    assert_eq!(small[c].parent(), Some(small.root()));
}

#[rstest]
fn given_new_node_when_insert_trailing_then_last_child(mut small: Tree) {
    let a = small.find("A");
    let a3 = small.create_node("A3", Payload::new()).unwrap();
    assert!(small.insert_child(a3, a, Position::Trailing).unwrap());
    assert_eq!(values(&small, small.children(a)), ["A1", "A2", "A3"]);
    assert_eq!(small.depth(a3), 2);
}

#[rstest]
fn given_adopted_node_when_insert_into_empty_tree_then_single_child() {
    let mut tree = Tree::new();
    let n = tree.adopt(Node::leaf("only").unwrap());
    assert!(!tree.is_attached(n));
    tree.insert_child(n, None, Position::Trailing).unwrap();
    assert!(tree.is_attached(n));
    assert_eq!(tree.size(None), 1);
    assert!(tree.is_first_child(n));
}

#[rstest]
fn given_sibling_when_insert_before_and_after_then_spliced(mut small: Tree) {
    let a1 = small.find("A1").unwrap();
    let a2 = small.find("A2").unwrap();
    let x = small.create_node("X", Payload::new()).unwrap();
    let y = small.create_node("Y", Payload::new()).unwrap();
    let z = small.create_node("Z", Payload::new()).unwrap();

    assert!(small.insert_before(x, a1).unwrap());
    assert!(small.insert_after(y, a1).unwrap());
    assert!(small.insert_after(z, a2).unwrap());

    let a = small.find("A");
    assert_eq!(values(&small, small.children(a)), ["X", "A1", "Y", "A2", "Z"]);
    assert!(small.is_first_child(x));
    assert_eq!(small[z].parent(), a);
}

#[rstest]
fn given_root_as_sibling_when_insert_then_invalid_operation(mut small: Tree) {
    let x = small.create_node("X", Payload::new()).unwrap();
    let root = small.root();
    let token = small.token();
    let err = small.insert_after(x, root).unwrap_err();
    assert_eq!(
        err,
        TreeError::InvalidOperation("cannot insert a sibling node to root".into())
    );
    assert!(small.insert_before(x, root).is_err());
    assert_eq!(small.token(), token);
}

#[rstest]
fn given_node_when_insert_next_to_itself_then_noop(mut small: Tree) {
    let a1 = small.find("A1").unwrap();
    let token = small.token();
    assert!(!small.insert_after(a1, a1).unwrap());
    assert!(!small.insert_before(a1, a1).unwrap());
    assert_eq!(small.token(), token);
}

#[rstest]
fn given_ancestor_when_insert_below_descendant_then_rejected(mut areas: Tree) {
    let zhejiang = areas.find("330000").unwrap();
    let xihu = areas.find("330106").unwrap();
    let err = areas
        .insert_child(zhejiang, Some(xihu), Position::Leading)
        .unwrap_err();
    assert!(matches!(err, TreeError::InvalidOperation(_)));
    assert!(areas.insert_after(zhejiang, xihu).is_err());
    assert_eq!(areas.size(None), 12);
}

#[rstest]
fn given_city_when_moved_to_other_province_then_subtree_follows(mut areas: Tree) {
    let ningbo = areas.find("330200").unwrap();
    let jiangsu = areas.find("320000");
    let token = areas.token();
    assert!(areas.insert_child(ningbo, jiangsu, Position::Trailing).unwrap());
    assert_ne!(areas.token(), token);
    assert_eq!(values(&areas, areas.children(jiangsu)), ["320100", "330200"]);
    assert_eq!(values(&areas, areas.children(areas.find("330000"))), ["330100"]);
    assert_eq!(areas.children(ningbo).len(), 2);
    assert_eq!(areas.size(None), 12);
}

#[rstest]
fn given_subtree_when_remove_then_detached_and_reinsertable(mut areas: Tree) {
    let hangzhou = areas.find("330100").unwrap();
    let token = areas.token();
    assert!(areas.remove(hangzhou));
    assert_ne!(areas.token(), token);
    assert_eq!(areas.size(None), 8);
    assert_eq!(areas.size(hangzhou), 4);
    assert!(areas.find("330106").is_none());
    assert_eq!(values(&areas, areas.children(areas.find("330000"))), ["330200"]);

    let token = areas.token();
    assert!(!areas.remove(hangzhou));
    assert!(!areas.remove(None));
    assert!(!areas.remove(areas.root()));
    assert_eq!(areas.token(), token);

    areas
        .insert_child(hangzhou, areas.find("710000"), Position::Leading)
        .unwrap();
    assert_eq!(areas.size(None), 12);
    assert_eq!(areas.depth(areas.find("330106")), 3);
}

#[rstest]
fn given_removed_subtree_when_discard_then_arena_released(mut areas: Tree) {
    let before = areas.allocated();
    let hangzhou = areas.find("330100").unwrap();
    areas.remove(hangzhou);
    assert_eq!(areas.allocated(), before);
    assert_eq!(areas.discard(hangzhou), 4);
    assert_eq!(areas.allocated(), before - 4);
    assert!(areas.get(hangzhou).is_none());
}

#[rstest]
fn given_tree_when_clear_then_empty_and_token_moves(mut areas: Tree) {
    let token = areas.token();
    areas.clear();
    assert_ne!(areas.token(), token);
    assert!(areas.is_empty());
    assert_eq!(areas.size(None), 0);
    assert!(areas.find("330000").is_none());
    assert!(areas.to_data().is_empty());

    let n = areas.create_node("fresh", Payload::new()).unwrap();
    areas.insert_child(n, None, Position::Trailing).unwrap();
    assert_eq!(areas.size(None), 1);
}

#[rstest]
#[case(json!(""))]
#[case(json!(null))]
fn given_illegal_value_when_create_node_then_rejected(#[case] value: serde_json::Value) {
    let err = Node::from_json(&value, Payload::new()).unwrap_err();
    assert!(matches!(err, TreeError::IllegalValue(_)));
}

#[rstest]
fn given_reserved_value_when_create_node_then_rejected(mut small: Tree) {
    assert!(matches!(
        small.create_node(xtree::ROOT_VALUE, Payload::new()),
        Err(TreeError::IllegalValue(_))
    ));
}

#[rstest]
fn given_removed_subtree_when_parse_then_old_handles_are_stale(mut areas: Tree) {
    let ningbo = areas.find("330200").unwrap();
    let haishu = areas.find("330203").unwrap();
    let taiwan = areas.find("710000").unwrap();
    areas.remove(ningbo);

    areas.parse(&json!([{"value": "X"}, {"value": "Y"}])).unwrap();

    for old in [ningbo, haishu, taiwan] {
        assert!(areas.get(old).is_none());
        assert!(!areas.insert_child(old, None, Position::Leading).unwrap());
    }
    assert_eq!(values(&areas, areas.children(areas.root())), ["X", "Y"]);
    assert_eq!(areas.allocated(), 3);
}

#[rstest]
fn given_cleared_tree_when_querying_former_nodes_then_detached(mut areas: Tree) {
    let zhejiang = areas.find("330000").unwrap();
    let xihu = areas.find("330106").unwrap();
    let jiangsu = areas.find("320000").unwrap();
    areas.clear();

    assert_eq!(areas.depth(xihu), 0);
    assert!(areas.parents(xihu).is_empty());
    assert_eq!(areas.depth(zhejiang), 0);
    assert!(!areas.is_attached(xihu));

    let n = areas.create_node("N", Payload::new()).unwrap();
    let token = areas.token();
    assert!(!areas.insert_after(n, jiangsu).unwrap());
    assert!(!areas.insert_before(n, jiangsu).unwrap());
    assert_eq!(areas.token(), token);
}
