//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::Shell;

use crate::tree::{Siblings, Traversal};

/// Inspect hierarchical JSON data through an LCRS-encoded tree
#[derive(Parser, Debug)]
#[command(name = "xtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (repeat for more: -d -d -d)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Options file (TOML) with value_key, children_key, parent_key
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Key holding node values (overrides config)
    #[arg(long, global = true)]
    pub value_key: Option<String>,

    /// Key holding child arrays (overrides config)
    #[arg(long, global = true)]
    pub children_key: Option<String>,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// JSON file holding an array of nested items.
#[derive(Args, Debug, Clone)]
pub struct Input {
    /// Path to the JSON data
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the tree
    Show {
        #[command(flatten)]
        input: Input,
    },

    /// Print size, height and leaf count
    Stats {
        #[command(flatten)]
        input: Input,
    },

    /// Print node values in traversal order
    Traverse {
        #[command(flatten)]
        input: Input,

        /// Traversal order
        #[arg(short, long, value_enum, default_value_t = Order::Depth)]
        order: Order,

        /// Stop after this value has been visited
        #[arg(long)]
        until: Option<String>,
    },

    /// Locate a node by value and print its position
    Find {
        #[command(flatten)]
        input: Input,

        /// Node value
        value: String,

        /// Also list siblings
        #[arg(long, value_enum)]
        siblings: Option<SiblingArg>,
    },

    /// Print the breadth-first flattened data as JSON
    Flatten {
        #[command(flatten)]
        input: Input,

        /// Start from this node instead of the whole tree
        #[arg(long)]
        from: Option<String>,

        /// Key for the parent value (overrides config)
        #[arg(long)]
        parent_key: Option<String>,
    },

    /// Parse and print the data back in nested form
    ToData {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Depth,
    Breadth,
}

impl From<Order> for Traversal {
    fn from(order: Order) -> Self {
        match order {
            Order::Depth => Traversal::DepthFirst,
            Order::Breadth => Traversal::BreadthFirst,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingArg {
    Left,
    Right,
    All,
}

impl From<SiblingArg> for Siblings {
    fn from(arg: SiblingArg) -> Self {
        match arg {
            SiblingArg::Left => Siblings::Left,
            SiblingArg::Right => Siblings::Right,
            SiblingArg::All => Siblings::All,
        }
    }
}
