#![allow(dead_code)]

use std::fs;

use serde_json::Value;
use xtree::util::testing;
use xtree::{NodeId, Tree, TreeOptions};

pub const AREAS: &str = "./tests/resources/areas.json";
pub const AREAS_CODED: &str = "./tests/resources/areas_coded.json";

pub fn read_json(path: &str) -> Value {
    testing::init_test_setup();
    let content = fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

pub fn areas() -> Tree {
    Tree::from_data(&read_json(AREAS)).unwrap()
}

pub fn coded_options() -> TreeOptions {
    TreeOptions {
        value_key: "code".into(),
        children_key: "districts".into(),
        parent_key: "parentCode".into(),
    }
}

pub fn values(tree: &Tree, ids: impl IntoIterator<Item = NodeId>) -> Vec<String> {
    ids.into_iter().map(|id| tree[id].value().to_string()).collect()
}
