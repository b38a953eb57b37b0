//! Session forest construction and analysis.

mod analyze;
mod builder;
mod descendants;

pub use analyze::{
    analyze_forest, analyze_tree, branch_endpoints, fork_points, latest_sessions,
    latest_user_message, max_depth,
};
pub use builder::build_forest;
pub use descendants::{descendants, find_session, latest_descendant};

use crate::lineage::resolve_lineage;
use crate::models::{Forest, SessionRecord};
use crate::scan::ScannedFile;

/// Resolve lineage for `files` and build their forest.
pub fn forest_from_files(files: &[ScannedFile]) -> Forest {
    let records: Vec<&SessionRecord> = files.iter().map(|f| &f.record).collect();
    let lineage = resolve_lineage(&records);
    build_forest(files, &lineage)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{TimeZone, Utc};

    use super::forest_from_files;
    use crate::models::{FileMeta, Forest, MessageRole, SessionMessage, SessionRecord};
    use crate::scan::ScannedFile;

    /// In-memory description of one log file.
    pub struct FileSpec {
        name: String,
        texts: Vec<String>,
        modified: i64,
        session: Option<String>,
    }

    impl FileSpec {
        pub fn new(name: &str, texts: &[&str], modified: i64) -> Self {
            Self {
                name: name.to_string(),
                texts: texts.iter().map(|t| (*t).to_string()).collect(),
                modified,
                session: None,
            }
        }

        pub fn session(mut self, id: &str) -> Self {
            self.session = Some(id.to_string());
            self
        }

        pub fn scanned(&self) -> ScannedFile {
            let mut record = SessionRecord::new(format!("/logs/{}", self.name));
            record.session_id.clone_from(&self.session);
            record.messages = self
                .texts
                .iter()
                .map(|text| SessionMessage {
                    text: text.clone(),
                    id: None,
                    parent_id: None,
                    role: MessageRole::User,
                })
                .collect();
            let modified = Utc.timestamp_opt(1_700_000_000 + self.modified, 0).unwrap();
            ScannedFile {
                record,
                meta: FileMeta {
                    size_bytes: 0,
                    modified,
                    created: modified,
                },
            }
        }
    }

    pub fn forest_of(specs: &[FileSpec]) -> Forest {
        let files: Vec<ScannedFile> = specs.iter().map(FileSpec::scanned).collect();
        forest_from_files(&files)
    }
}
