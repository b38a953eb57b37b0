//! Forest construction from resolved lineage.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::lineage::Lineage;
use crate::models::{Forest, NodeId, SessionNode};
use crate::scan::ScannedFile;

fn node_from_file(file: &ScannedFile) -> SessionNode {
    let record = &file.record;
    SessionNode {
        session_id: record.resolved_session_id(),
        filename: record.filename(),
        path: record.file_path.to_string_lossy().into_owned(),
        message_count: record.len(),
        first_message_text: record.first_text().map(String::from),
        last_message_text: record.last_text().map(String::from),
        last_user_message_text: record.last_user_text().map(String::from),
        size_bytes: file.meta.size_bytes,
        modified: file.meta.modified,
        created: file.meta.created,
        parent: None,
        children: Vec::new(),
    }
}

/// Newest first, file name as the tie-break.
fn newest_first(nodes: &[SessionNode], a: NodeId, b: NodeId) -> Ordering {
    nodes[b]
        .modified
        .cmp(&nodes[a].modified)
        .then_with(|| nodes[a].filename.cmp(&nodes[b].filename))
}

/// Materialize the forest.
///
/// Files without messages are left out. A file is a root when `lineage` has
/// no parent for it. Children are attached with an explicit stack, and a
/// visited set guarantees every node is placed once even if the lineage were
/// inconsistent.
pub fn build_forest(files: &[ScannedFile], lineage: &Lineage) -> Forest {
    let mut nodes: Vec<SessionNode> = Vec::with_capacity(files.len());
    for file in files {
        if file.record.is_empty() {
            debug!(path = %file.record.file_path.display(), "Skipping session log with no messages");
            continue;
        }
        nodes.push(node_from_file(file));
    }

    let ids: HashMap<String, NodeId> = nodes
        .iter()
        .enumerate()
        .map(|(id, node)| (node.filename.clone(), id))
        .collect();

    let mut roots: Vec<NodeId> = (0..nodes.len())
        .filter(|&id| {
            lineage
                .parent(&nodes[id].filename)
                .is_none_or(|parent| !ids.contains_key(parent))
        })
        .collect();
    roots.sort_by(|&a, &b| newest_first(&nodes, a, b));

    let mut visited: HashSet<NodeId> = roots.iter().copied().collect();
    let mut stack: Vec<NodeId> = roots.clone();

    while let Some(id) = stack.pop() {
        let mut children: Vec<NodeId> = lineage
            .children(&nodes[id].filename)
            .filter_map(|name| ids.get(name).copied())
            .filter(|&child| visited.insert(child))
            .collect();
        children.sort_by(|&a, &b| newest_first(&nodes, a, b));

        for &child in &children {
            nodes[child].parent = Some(id);
        }
        stack.extend(children.iter().copied());
        nodes[id].children = children;
    }

    // Only reachable through a cycle; keep them as their own roots
    for id in 0..nodes.len() {
        if !visited.contains(&id) {
            warn!(filename = %nodes[id].filename, "Session log unreachable from any root");
            nodes[id].parent = None;
            roots.push(id);
        }
    }

    Forest { nodes, roots }
}
