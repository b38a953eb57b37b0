//! Newest-descendant lookup.

use chrono::{DateTime, Utc};

use crate::models::{Forest, NodeId};

/// First node, in pre-order over the roots, whose session id is `session_id`.
pub fn find_session(forest: &Forest, session_id: &str) -> Option<NodeId> {
    forest
        .roots
        .iter()
        .flat_map(|&root| forest.preorder(root))
        .find(|&id| forest.node(id).session_id == session_id)
}

/// Strict descendants of `id` with their modification times, in pre-order.
pub fn descendants(forest: &Forest, id: NodeId) -> Vec<(NodeId, DateTime<Utc>)> {
    forest
        .preorder(id)
        .into_iter()
        .skip(1)
        .map(|d| (d, forest.node(d).modified))
        .collect()
}

/// Session id of the most recently modified strict descendant of `session_id`.
///
/// Any descendant qualifies, not only leaves. Ties go to the one met first in
/// pre-order. An unknown session, or one without descendants, returns
/// `session_id` unchanged.
pub fn latest_descendant(forest: &Forest, session_id: &str) -> String {
    let Some(start) = find_session(forest, session_id) else {
        return session_id.to_string();
    };

    let mut newest: Option<(NodeId, DateTime<Utc>)> = None;
    for (id, modified) in descendants(forest, start) {
        if newest.is_none_or(|(_, best)| modified > best) {
            newest = Some((id, modified));
        }
    }

    newest.map_or_else(
        || session_id.to_string(),
        |(id, _)| forest.node(id).session_id.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::test_support::{forest_of, FileSpec};

    #[test]
    fn leaf_returns_itself() {
        let forest = forest_of(&[
            FileSpec::new("a.jsonl", &["m1"], 0).session("A"),
            FileSpec::new("b.jsonl", &["m1", "m2"], 1).session("B"),
        ]);
        assert_eq!(latest_descendant(&forest, "B"), "B");
    }

    #[test]
    fn unknown_session_returns_itself() {
        let forest = forest_of(&[FileSpec::new("a.jsonl", &["m1"], 0).session("A")]);
        assert_eq!(latest_descendant(&forest, "missing"), "missing");
    }

    #[test]
    fn resume_points_to_child() {
        let forest = forest_of(&[
            FileSpec::new("a.jsonl", &["m1", "m2"], 0).session("A"),
            FileSpec::new("b.jsonl", &["m1", "m2", "m3"], 1).session("B"),
        ]);
        assert_eq!(latest_descendant(&forest, "A"), "B");
    }

    #[test]
    fn intermediate_node_can_win() {
        // b is a fork point modified after both of its leaves
        let forest = forest_of(&[
            FileSpec::new("a.jsonl", &["m1"], 0).session("A"),
            FileSpec::new("b.jsonl", &["m1", "m2"], 100).session("B"),
            FileSpec::new("c.jsonl", &["m1", "m2", "m3"], 10).session("C"),
            FileSpec::new("d.jsonl", &["m1", "m2", "m4"], 20).session("D"),
        ]);
        assert_eq!(latest_descendant(&forest, "A"), "B");
        assert_eq!(latest_descendant(&forest, "B"), "D");
    }

    #[test]
    fn only_searches_within_subtree() {
        let forest = forest_of(&[
            FileSpec::new("a.jsonl", &["m1"], 0).session("A"),
            FileSpec::new("b.jsonl", &["m1", "m2"], 5).session("B"),
            FileSpec::new("x.jsonl", &["other"], 1).session("X"),
            FileSpec::new("y.jsonl", &["other", "newer"], 99).session("Y"),
        ]);
        assert_eq!(latest_descendant(&forest, "A"), "B");
        assert_eq!(latest_descendant(&forest, "X"), "Y");
    }

    #[test]
    fn ties_go_to_first_in_preorder() {
        let forest = forest_of(&[
            FileSpec::new("a.jsonl", &["m1"], 0).session("A"),
            FileSpec::new("b.jsonl", &["m1", "b"], 7).session("B"),
            FileSpec::new("c.jsonl", &["m1", "c"], 7).session("C"),
        ]);
        // Equal times order children by file name, so b comes first
        assert_eq!(latest_descendant(&forest, "A"), "B");
        assert_eq!(descendants(&forest, forest.roots[0]).len(), 2);
    }
}
