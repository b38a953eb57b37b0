//! Per-tree statistics over a built forest.

use std::collections::HashMap;

use crate::models::{
    BranchEndpoint, ForkPoint, Forest, LatestSessionSummary, NodeId, SessionTreeListing,
    TreeSummary,
};

/// Nodes with two or more children, in pre-order.
pub fn fork_points(forest: &Forest, root: NodeId) -> Vec<ForkPoint> {
    forest
        .preorder(root)
        .into_iter()
        .map(|id| forest.node(id))
        .filter(|node| node.is_fork())
        .map(|node| ForkPoint {
            located_at: node.filename.clone(),
            session_id: node.session_id.clone(),
            branch_count: node.children.len(),
            child_filenames: node
                .children
                .iter()
                .map(|&c| forest.node(c).filename.clone())
                .collect(),
        })
        .collect()
}

/// Leaf nodes, in pre-order, each with its path from the root.
pub fn branch_endpoints(forest: &Forest, root: NodeId) -> Vec<BranchEndpoint> {
    leaves(forest, root)
        .map(|id| {
            let node = forest.node(id);
            BranchEndpoint {
                endpoint: node.filename.clone(),
                session_id: node.session_id.clone(),
                message_count: node.message_count,
                last_message_text: node.last_message_text.clone(),
                path_from_root: forest.path_from_root(id),
            }
        })
        .collect()
}

fn leaves(forest: &Forest, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    forest
        .preorder(root)
        .into_iter()
        .filter(|&id| forest.node(id).is_leaf())
}

/// 1 for a leaf, otherwise one more than the deepest child.
pub fn max_depth(forest: &Forest, root: NodeId) -> usize {
    let mut depth: HashMap<NodeId, usize> = HashMap::new();
    let mut deepest = 0;
    // Pre-order reaches every parent before its children
    for id in forest.preorder(root) {
        let d = forest
            .node(id)
            .parent
            .and_then(|p| depth.get(&p))
            .map_or(1, |parent_depth| parent_depth + 1);
        depth.insert(id, d);
        deepest = deepest.max(d);
    }
    deepest
}

/// Last user message of the most recently modified node that has one.
///
/// Keyed by the file's modification time, not by message timestamps. Ties go
/// to the node met first in pre-order.
pub fn latest_user_message(forest: &Forest, root: NodeId) -> Option<String> {
    let mut latest: Option<(NodeId, &str)> = None;
    for id in forest.preorder(root) {
        let node = forest.node(id);
        let Some(text) = node.last_user_message_text.as_deref() else {
            continue;
        };
        let newer = latest.is_none_or(|(best, _)| node.modified > forest.node(best).modified);
        if newer {
            latest = Some((id, text));
        }
    }
    latest.map(|(_, text)| text.to_string())
}

/// Full summary of the tree rooted at `root`.
pub fn analyze_tree(forest: &Forest, root: NodeId) -> TreeSummary {
    let node = forest.node(root);
    let fork_points = fork_points(forest, root);

    TreeSummary {
        root_session_id: node.session_id.clone(),
        root_filename: node.filename.clone(),
        first_message_text: node.first_message_text.clone(),
        latest_user_message_text: latest_user_message(forest, root),
        total_fork_count: fork_points.len(),
        max_depth: max_depth(forest, root),
        branch_endpoints: branch_endpoints(forest, root),
        fork_points,
        structure: forest.to_tree(root),
    }
}

/// Summaries for every tree, in root order.
pub fn analyze_forest(forest: &Forest) -> SessionTreeListing {
    let trees: Vec<TreeSummary> = forest
        .roots
        .iter()
        .map(|&root| analyze_tree(forest, root))
        .collect();

    SessionTreeListing {
        total_trees: trees.len(),
        total_files: forest.len(),
        trees,
    }
}

/// Nearest strict ancestor of `id` with two or more children.
fn nearest_fork_ancestor(forest: &Forest, id: NodeId) -> Option<NodeId> {
    let mut current = forest.node(id).parent;
    while let Some(ancestor) = current {
        if forest.node(ancestor).is_fork() {
            return Some(ancestor);
        }
        current = forest.node(ancestor).parent;
    }
    None
}

/// The most advanced session of every branch.
///
/// A tree with a single leaf reports it as a plain continuation. A tree with
/// several leaves reports all of them as forks, each naming the nearest fork
/// point above it.
pub fn latest_sessions(forest: &Forest) -> Vec<LatestSessionSummary> {
    let mut latest = Vec::new();

    for &root in &forest.roots {
        let root_session_id = &forest.node(root).session_id;
        let tree_leaves: Vec<NodeId> = leaves(forest, root).collect();
        let is_fork = tree_leaves.len() > 1;

        for id in tree_leaves {
            let node = forest.node(id);
            let fork_from = if is_fork {
                nearest_fork_ancestor(forest, id).map(|f| forest.node(f))
            } else {
                None
            };

            latest.push(LatestSessionSummary {
                root_session_id: root_session_id.clone(),
                session_id: node.session_id.clone(),
                filename: node.filename.clone(),
                message_count: node.message_count,
                last_message_text: node.last_message_text.clone(),
                is_fork,
                fork_from_session_id: fork_from.map(|f| f.session_id.clone()),
                fork_from_filename: fork_from.map(|f| f.filename.clone()),
                path_from_root: forest.path_from_root(id),
            });
        }
    }

    latest
}
