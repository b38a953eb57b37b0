//! Session tree nodes, stored in an arena.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Index of a node in a [`Forest`].
pub type NodeId = usize;

/// File metadata captured when a log is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    /// Falls back to `modified` where the filesystem has no birth time.
    pub created: DateTime<Utc>,
}

impl Default for FileMeta {
    fn default() -> Self {
        Self {
            size_bytes: 0,
            modified: DateTime::<Utc>::UNIX_EPOCH,
            created: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

/// One log file in the session forest.
#[derive(Debug, Clone)]
pub struct SessionNode {
    pub session_id: String,
    pub filename: String,
    pub path: String,
    pub message_count: usize,
    pub first_message_text: Option<String>,
    pub last_message_text: Option<String>,
    /// Text of the last user-authored message in this file.
    pub last_user_message_text: Option<String>,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub parent: Option<NodeId>,
    /// Newest modified first.
    pub children: Vec<NodeId>,
}

impl SessionNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_fork(&self) -> bool {
        self.children.len() > 1
    }
}

/// All session trees of one directory.
///
/// Nodes live in a flat arena; `roots` lists the tree roots in display order.
/// Every node belongs to exactly one tree.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    pub nodes: Vec<SessionNode>,
    pub roots: Vec<NodeId>,
}

impl Forest {
    pub fn node(&self, id: NodeId) -> &SessionNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order walk of the subtree rooted at `root`, children in stored order.
    pub fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        order
    }

    /// File names from the tree root down to `id`, inclusive.
    pub fn path_from_root(&self, id: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            path.push(node.filename.clone());
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Root of the tree containing `id`.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            current = parent;
        }
        current
    }

    /// Owned nested copy of the subtree at `id`, built bottom-up without recursion.
    pub fn to_tree(&self, id: NodeId) -> SessionTree {
        let order = self.preorder(id);
        let mut built: HashMap<NodeId, SessionTree> = HashMap::with_capacity(order.len());
        for &node_id in order.iter().rev() {
            let node = &self.nodes[node_id];
            let children = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            let mut tree = SessionTree::from_node(node);
            tree.children = children;
            built.insert(node_id, tree);
        }
        built.remove(&id).unwrap_or_else(|| SessionTree::from_node(&self.nodes[id]))
    }
}

/// Nested, serializable form of a session tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTree {
    pub session_id: String,
    pub filename: String,
    pub path: String,
    pub message_count: usize,
    pub first_message_text: Option<String>,
    pub last_message_text: Option<String>,
    pub size_bytes: u64,
    pub modified_time: DateTime<Utc>,
    pub created_time: DateTime<Utc>,
    pub children: Vec<SessionTree>,
}

impl SessionTree {
    fn from_node(node: &SessionNode) -> Self {
        Self {
            session_id: node.session_id.clone(),
            filename: node.filename.clone(),
            path: node.path.clone(),
            message_count: node.message_count,
            first_message_text: node.first_message_text.clone(),
            last_message_text: node.last_message_text.clone(),
            size_bytes: node.size_bytes,
            modified_time: node.modified,
            created_time: node.created,
            children: Vec::new(),
        }
    }
}
