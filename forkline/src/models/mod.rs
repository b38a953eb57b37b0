//! Data models for session lineage.

mod message;
mod node;
mod record;
mod summary;

pub use message::{MessageRole, SessionMessage};
pub use node::{FileMeta, Forest, NodeId, SessionNode, SessionTree};
pub use record::SessionRecord;
pub use summary::{
    BranchEndpoint, ForkPoint, LatestSessionSummary, SessionTreeListing, TreeSummary,
};
