//! Derived analysis results returned to callers.

use serde::Serialize;

use super::node::SessionTree;

/// A node from which two or more continuations diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkPoint {
    /// File name of the forking node.
    pub located_at: String,
    pub session_id: String,
    pub branch_count: usize,
    pub child_filenames: Vec<String>,
}

/// A leaf: the most advanced point of one continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchEndpoint {
    /// File name of the leaf.
    pub endpoint: String,
    pub session_id: String,
    pub message_count: usize,
    pub last_message_text: Option<String>,
    pub path_from_root: Vec<String>,
}

/// Statistics for one tree of the forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    pub root_session_id: String,
    pub root_filename: String,
    pub first_message_text: Option<String>,
    pub latest_user_message_text: Option<String>,
    pub total_fork_count: usize,
    pub max_depth: usize,
    pub branch_endpoints: Vec<BranchEndpoint>,
    pub fork_points: Vec<ForkPoint>,
    pub structure: SessionTree,
}

/// Result of listing every tree in a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTreeListing {
    pub total_trees: usize,
    pub total_files: usize,
    pub trees: Vec<TreeSummary>,
}

/// One "latest" session: a branch endpoint, tagged with where it forked from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestSessionSummary {
    pub root_session_id: String,
    pub session_id: String,
    pub filename: String,
    pub message_count: usize,
    pub last_message_text: Option<String>,
    pub is_fork: bool,
    pub fork_from_session_id: Option<String>,
    pub fork_from_filename: Option<String>,
    pub path_from_root: Vec<String>,
}
