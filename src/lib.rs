//! N-ary trees over a left-child/right-sibling (LCRS) binary encoding.
//!
//! Every node holds a value, an opaque JSON payload and three links: its first
//! child, its next sibling and its n-ary parent. A [`Tree`] owns its nodes in a
//! generational arena under a synthetic root and offers n-ary navigation,
//! traversal, search, mutation and round-trips to nested data.
//!
//! # Example
//! ```
//! use serde_json::json;
//! use xtree::{Position, Traversal, Tree};
//!
//! let mut tree = Tree::from_data(&json!([
//!     {"value": "A", "children": [{"value": "A1"}, {"value": "A2"}]},
//!     {"value": "B"}
//! ]))
//! .unwrap();
//!
//! let a1 = tree.find("A1").unwrap();
//! assert_eq!(tree.depth(a1), 2);
//! assert_eq!(tree.height(tree.find("A")), 1);
//!
//! let order: Vec<String> = tree
//!     .iter(Traversal::DepthFirst)
//!     .map(|n| n.value().to_string())
//!     .collect();
//! assert_eq!(order, ["A1", "A2", "A", "B"]);
//!
//! let c = tree.create_node("C", Default::default()).unwrap();
//! tree.insert_child(c, None, Position::Leading).unwrap();
//! assert_eq!(tree.children(tree.root()).len(), 3);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod tree;
pub mod util;

pub use config::{ConfigError, TreeOptions};
pub use domain::{Node, NodeId, NodeRef, NodeValue, Payload, TreeError, TreeResult, ROOT_VALUE};
pub use tree::{
    BreadthFirstIter, Cancel, ChangeToken, DepthFirstIter, Position, Query, Siblings, Traversal,
    Tree, TreeDisplay,
};
