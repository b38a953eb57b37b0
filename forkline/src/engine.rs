//! Entry points of the lineage engine.
//!
//! Every call rebuilds its view from the files on disk. Nothing is cached
//! and nothing here fails: unreadable input shows up as missing sessions.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::lookup;
use crate::models::{Forest, LatestSessionSummary, SessionTreeListing};
use crate::scan::scan_directory;
use crate::tree;

/// Lineage queries over a projects root.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
}

impl Engine {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Read `dir` and build its session forest.
    pub async fn build_forest(&self, dir: &Path) -> Forest {
        let files = scan_directory(dir, self.config.max_concurrent_reads).await;
        let forest = tree::forest_from_files(&files);
        info!(
            dir = %dir.display(),
            files = files.len(),
            nodes = forest.len(),
            trees = forest.roots.len(),
            "Built session forest"
        );
        forest
    }

    /// Every session tree in `dir` with its statistics.
    pub async fn list_session_trees(&self, dir: &Path) -> SessionTreeListing {
        let forest = self.build_forest(dir).await;
        tree::analyze_forest(&forest)
    }

    /// The most advanced session of every branch in `dir`.
    pub async fn list_latest_sessions(&self, dir: &Path) -> Vec<LatestSessionSummary> {
        let forest = self.build_forest(dir).await;
        tree::latest_sessions(&forest)
    }

    /// Newest continuation of `session_id` within `project_id`, or `session_id` itself.
    pub async fn latest_descendant(&self, project_id: &str, session_id: &str) -> String {
        let dir = self.config.project_dir(project_id);
        let forest = self.build_forest(&dir).await;
        tree::latest_descendant(&forest, session_id)
    }

    /// Raw records of `session_id` across every log of `project_id`, oldest first.
    pub async fn messages_for_session(&self, project_id: &str, session_id: &str) -> Vec<Value> {
        let dir = self.config.project_dir(project_id);
        lookup::messages_for_session(&dir, session_id, self.config.max_concurrent_reads).await
    }
}

pub async fn list_session_trees(dir: &Path) -> SessionTreeListing {
    engine_for(dir).list_session_trees(dir).await
}

pub async fn list_latest_sessions(dir: &Path) -> Vec<LatestSessionSummary> {
    engine_for(dir).list_latest_sessions(dir).await
}

pub async fn latest_descendant(project_id: &str, session_id: &str, base_dir: &Path) -> String {
    engine_for(base_dir)
        .latest_descendant(project_id, session_id)
        .await
}

pub async fn messages_for_session(project_id: &str, session_id: &str, base_dir: &Path) -> Vec<Value> {
    engine_for(base_dir)
        .messages_for_session(project_id, session_id)
        .await
}

fn engine_for(base_dir: &Path) -> Engine {
    Engine::new(Config::new(base_dir))
}
