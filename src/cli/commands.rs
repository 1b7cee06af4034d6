//! Command dispatch for the `xtree` binary.

use std::path::Path;

use itertools::Itertools;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, Input, Order, SiblingArg};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{RawTreeOptions, TreeOptions};
use crate::domain::NodeId;
use crate::tree::{Traversal, Tree};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };
    let options = resolve_options(cli)?;

    match command {
        Commands::Show { input } => _show(input, options),
        Commands::Stats { input } => _stats(input, options),
        Commands::Traverse {
            input,
            order,
            until,
        } => _traverse(input, options, *order, until.as_deref()),
        Commands::Find {
            input,
            value,
            siblings,
        } => _find(input, options, value, *siblings),
        Commands::Flatten {
            input,
            from,
            parent_key,
        } => _flatten(input, options, from.as_deref(), parent_key.as_deref()),
        Commands::ToData { input } => _to_data(input, options),
    }
}

/// Config file and `XTREE_*` variables, then command line flags.
#[instrument(level = "debug", skip(cli))]
pub fn resolve_options(cli: &Cli) -> CliResult<TreeOptions> {
    let options = TreeOptions::load(cli.config.as_deref())?.merge(&RawTreeOptions {
        value_key: cli.value_key.clone(),
        children_key: cli.children_key.clone(),
        parent_key: None,
    });
    options.validate()?;
    Ok(options)
}

/// Reads a JSON array from `path` and parses it into a tree.
#[instrument(level = "debug", skip(options))]
pub fn load_tree(path: &Path, options: TreeOptions) -> CliResult<Tree> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let data: Value = serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if !data.is_array() {
        return Err(CliError::InvalidArgs(format!(
            "{} must contain a JSON array",
            path.display()
        )));
    }
    let tree = Tree::from_data_with_options(&data, options)?;
    debug!(nodes = tree.size(None), "loaded tree");
    Ok(tree)
}

fn find_node(tree: &Tree, value: &str) -> CliResult<NodeId> {
    tree.find(value)
        .ok_or_else(|| CliError::NotFound(value.to_string()))
}

fn values(tree: &Tree, ids: &[NodeId]) -> String {
    ids.iter().map(|id| tree[*id].value()).join(", ")
}

#[instrument]
fn _show(input: &Input, options: TreeOptions) -> CliResult<()> {
    let tree = load_tree(&input.file, options)?;
    output::info(&tree);
    Ok(())
}

#[instrument]
fn _stats(input: &Input, options: TreeOptions) -> CliResult<()> {
    let tree = load_tree(&input.file, options)?;
    output::field("nodes", &tree.size(None));
    output::field("top-level", &tree.children(tree.root()).len());
    output::field("height", &tree.height(tree.root()));
    output::field("leaves", &tree.leaves().len());
    Ok(())
}

#[instrument]
fn _traverse(
    input: &Input,
    options: TreeOptions,
    order: Order,
    until: Option<&str>,
) -> CliResult<()> {
    let tree = load_tree(&input.file, options)?;
    tree.traverse(Traversal::from(order), |node, cancel| {
        output::info(node.value());
        if until.is_some_and(|stop| *node.value() == *stop) {
            cancel.cancel();
        }
    });
    Ok(())
}

#[instrument]
fn _find(
    input: &Input,
    options: TreeOptions,
    value: &str,
    siblings: Option<SiblingArg>,
) -> CliResult<()> {
    let tree = load_tree(&input.file, options)?;
    let id = find_node(&tree, value)?;
    let node = &tree[id];

    let mut path = tree.parents(id);
    path.pop(); // root sentinel
    path.reverse();

    output::header(node.value());
    output::field("depth", &tree.depth(id));
    output::field("height", &tree.height(id));
    output::field("path", &values(&tree, &path));
    output::field("children", &values(&tree, &tree.children(id)));
    if let Some(pos) = siblings {
        output::field("siblings", &values(&tree, &tree.siblings(id, pos.into())));
    }
    if !node.payload().is_empty() {
        output::header("payload");
        for (key, value) in node.payload() {
            output::detail(&format!("{key}: {value}"));
        }
    }
    Ok(())
}

#[instrument]
fn _flatten(
    input: &Input,
    options: TreeOptions,
    from: Option<&str>,
    parent_key: Option<&str>,
) -> CliResult<()> {
    let parent_key = parent_key.unwrap_or(&options.parent_key).to_string();
    let tree = load_tree(&input.file, options)?;
    let start = from.map(|value| find_node(&tree, value)).transpose()?;
    if let Some(node) = tree.get(start).filter(|node| node.is_leaf()) {
        output::warning(&format!("{} has no descendants", node.value()));
    }
    let flat = tree.flatten_with_key(start, &parent_key);
    output::info(&format!("{:#}", Value::Array(flat)));
    Ok(())
}

#[instrument]
fn _to_data(input: &Input, options: TreeOptions) -> CliResult<()> {
    let tree = load_tree(&input.file, options)?;
    output::info(&format!("{:#}", Value::Array(tree.to_data())));
    Ok(())
}
