//! Lineage inference by longest shared message prefix.
//!
//! Resuming or forking a session writes a fresh log that repeats the earlier
//! conversation and then appends to it, so ancestry has to be recovered from
//! content: file A is a candidate parent of file B when A's message texts are
//! an exact positional prefix of B's and A is strictly shorter. B's parent is
//! the candidate with the longest prefix.
//!
//! Candidates are found through cumulative prefix hashes. Every record is
//! indexed under `(length, hash of all its texts)`; a record then probes the
//! index with the hash of each of its own proper prefixes, longest first, and
//! confirms a hit with an exact comparison.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::models::SessionRecord;

/// Parent and children mappings keyed by file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lineage {
    /// Child file name -> parent file name.
    pub parent_of: BTreeMap<String, String>,
    /// Parent file name -> child file names.
    pub children_of: BTreeMap<String, BTreeSet<String>>,
}

impl Lineage {
    pub fn parent(&self, filename: &str) -> Option<&str> {
        self.parent_of.get(filename).map(String::as_str)
    }

    pub fn children(&self, filename: &str) -> impl Iterator<Item = &str> {
        self.children_of
            .get(filename)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    pub(crate) fn link(&mut self, child: &str, parent: &str) {
        self.parent_of.insert(child.to_string(), parent.to_string());
        self.children_of
            .entry(parent.to_string())
            .or_default()
            .insert(child.to_string());
    }
}

/// `hashes[k]` is the hash of the first `k + 1` texts.
fn prefix_hashes(record: &SessionRecord) -> Vec<u64> {
    let mut hasher = DefaultHasher::new();
    record
        .texts()
        .map(|text| {
            text.hash(&mut hasher);
            hasher.finish()
        })
        .collect()
}

/// Infer the parent of every record.
///
/// Records with no messages never take part: an empty prefix is not evidence
/// of ancestry. When two candidates share the same longest prefix (identical
/// content), the one with the smaller file name wins, so the result does not
/// depend on input order.
pub fn resolve_lineage(records: &[&SessionRecord]) -> Lineage {
    let mut ordered: Vec<(String, &SessionRecord)> = records
        .iter()
        .filter(|r| !r.is_empty())
        .map(|r| (r.filename(), *r))
        .collect();
    ordered.sort_by(|a, b| a.0.cmp(&b.0));

    let hashes: Vec<Vec<u64>> = ordered.iter().map(|(_, r)| prefix_hashes(r)).collect();

    // (length, full hash) -> indices into `ordered`, in file name order
    let mut index: HashMap<(usize, u64), Vec<usize>> = HashMap::new();
    for (i, record_hashes) in hashes.iter().enumerate() {
        if let Some(&full) = record_hashes.last() {
            index.entry((record_hashes.len(), full)).or_default().push(i);
        }
    }

    let mut lineage = Lineage::default();

    for (child_idx, (child_name, child)) in ordered.iter().enumerate() {
        let child_hashes = &hashes[child_idx];

        // Proper prefixes only, longest first
        let parent = (1..child.len()).rev().find_map(|len| {
            index
                .get(&(len, child_hashes[len - 1]))?
                .iter()
                .copied()
                .find(|&candidate| ordered[candidate].1.is_prefix_of(child))
        });

        if let Some(parent_idx) = parent {
            let parent_name = &ordered[parent_idx].0;
            debug!(
                child = %child_name,
                parent = %parent_name,
                shared = ordered[parent_idx].1.len(),
                "Resolved session parent"
            );
            lineage.link(child_name, parent_name);
        }
    }

    lineage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageRole, SessionMessage};

    fn record(name: &str, texts: &[&str]) -> SessionRecord {
        let mut record = SessionRecord::new(format!("/logs/{name}"));
        record.messages = texts
            .iter()
            .map(|t| SessionMessage {
                text: (*t).to_string(),
                id: None,
                parent_id: None,
                role: MessageRole::User,
            })
            .collect();
        record
    }

    fn resolve(records: &[SessionRecord]) -> Lineage {
        let refs: Vec<&SessionRecord> = records.iter().collect();
        resolve_lineage(&refs)
    }

    #[test]
    fn simple_resume() {
        let records = [
            record("a.jsonl", &["m1", "m2"]),
            record("b.jsonl", &["m1", "m2", "m3"]),
        ];
        let lineage = resolve(&records);
        assert_eq!(lineage.parent("b.jsonl"), Some("a.jsonl"));
        assert_eq!(lineage.parent("a.jsonl"), None);
        assert_eq!(lineage.children("a.jsonl").collect::<Vec<_>>(), vec!["b.jsonl"]);
    }

    #[test]
    fn fork_gives_two_children() {
        let records = [
            record("a.jsonl", &["m1", "m2"]),
            record("b.jsonl", &["m1", "m2", "m3"]),
            record("c.jsonl", &["m1", "m2", "m4"]),
        ];
        let lineage = resolve(&records);
        assert_eq!(lineage.parent("b.jsonl"), Some("a.jsonl"));
        assert_eq!(lineage.parent("c.jsonl"), Some("a.jsonl"));
        assert_eq!(
            lineage.children("a.jsonl").collect::<Vec<_>>(),
            vec!["b.jsonl", "c.jsonl"]
        );
    }

    #[test]
    fn picks_deepest_ancestor_over_grandparent() {
        let records = [
            record("grand.jsonl", &["m1"]),
            record("parent.jsonl", &["m1", "m2"]),
            record("child.jsonl", &["m1", "m2", "m3"]),
        ];
        let lineage = resolve(&records);
        assert_eq!(lineage.parent("child.jsonl"), Some("parent.jsonl"));
        assert_eq!(lineage.parent("parent.jsonl"), Some("grand.jsonl"));
    }

    #[test]
    fn equal_length_is_not_a_parent() {
        let records = [record("a.jsonl", &["m1", "m2"]), record("b.jsonl", &["m1", "m2"])];
        let lineage = resolve(&records);
        assert!(lineage.parent_of.is_empty());
    }

    #[test]
    fn divergent_content_is_not_a_parent() {
        let records = [
            record("a.jsonl", &["m1", "x"]),
            record("b.jsonl", &["m1", "m2", "m3"]),
        ];
        let lineage = resolve(&records);
        assert!(lineage.parent_of.is_empty());
    }

    #[test]
    fn empty_records_never_become_parents() {
        let records = [record("empty.jsonl", &[]), record("b.jsonl", &["m1", "m2"])];
        let lineage = resolve(&records);
        assert!(lineage.parent_of.is_empty());
    }

    #[test]
    fn ties_break_on_file_name() {
        let records = [
            record("z-copy.jsonl", &["m1"]),
            record("child.jsonl", &["m1", "m2"]),
            record("a-copy.jsonl", &["m1"]),
        ];
        let lineage = resolve(&records);
        assert_eq!(lineage.parent("child.jsonl"), Some("a-copy.jsonl"));
    }

    #[test]
    fn input_order_does_not_matter() {
        let records = vec![
            record("a.jsonl", &["m1", "m2"]),
            record("b.jsonl", &["m1", "m2", "m3"]),
            record("c.jsonl", &["m1", "m2", "m4"]),
            record("d.jsonl", &["m1", "m2", "m3", "m5"]),
            record("e.jsonl", &["other"]),
            record("f.jsonl", &["m1"]),
        ];
        let expected = resolve(&records);

        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(resolve(&reversed), expected);

        let mut rotated = records;
        rotated.rotate_left(2);
        assert_eq!(resolve(&rotated), expected);
    }

    #[test]
    fn asserted_parents_satisfy_prefix_invariant() {
        let records = [
            record("a.jsonl", &["m1", "m2"]),
            record("b.jsonl", &["m1", "m2", "m3"]),
            record("c.jsonl", &["m1"]),
            record("d.jsonl", &["m1", "m2", "m3", "m4"]),
            record("e.jsonl", &["m1", "q"]),
        ];
        let lineage = resolve(&records);
        let by_name: HashMap<String, &SessionRecord> =
            records.iter().map(|r| (r.filename(), r)).collect();

        for (child, parent) in &lineage.parent_of {
            let child = by_name[child];
            let parent = by_name[parent];
            assert!(parent.len() < child.len());
            assert!(parent.is_prefix_of(child));
            // No other strictly shorter prefix is longer than the chosen one
            for other in &records {
                if other.len() < child.len() && other.is_prefix_of(child) {
                    assert!(other.len() <= parent.len());
                }
            }
        }
        assert_eq!(lineage.parent_of.len(), 4);
    }
}
