//! Forkline - reconstruct the lineage of recorded assistant sessions.
//!
//! Resuming or forking a conversation produces a new log file that repeats
//! the earlier messages, with no reliable pointer back to where it came from.
//! Forkline recovers the parent/child relationships from message content,
//! arranges the logs of a directory into a forest, and answers questions
//! about it: where conversations forked, which branches are most advanced,
//! and which session is the newest continuation of a given one.
//!
//! Pipeline:
//! - `scan` / `log` read every log of a directory concurrently
//! - `lineage` infers parents by longest shared message prefix
//! - `tree` builds the forest and derives statistics
//! - `lookup` is a separate path returning a session's raw records
//! - `engine` exposes the four entry points

pub mod config;
pub mod engine;
pub mod error;
pub mod lineage;
pub mod log;
pub mod lookup;
pub mod models;
pub mod scan;
pub mod tree;

pub use config::Config;
pub use engine::{
    latest_descendant, list_latest_sessions, list_session_trees, messages_for_session, Engine,
};
pub use error::LineageError;
