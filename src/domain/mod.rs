//! Domain layer: node model and errors
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod node;
pub mod value;

pub use error::{TreeError, TreeResult};
pub use node::{Node, NodeId, NodeRef, Payload};
pub use value::{NodeValue, ROOT_VALUE};
