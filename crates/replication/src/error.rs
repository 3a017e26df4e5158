//! Error types for ownership simulation.

use corelib::NodeId;
use thiserror::Error;

/// Result type for replication operations.
pub type Result<T> = std::result::Result<T, ReplicationError>;

/// Errors that can occur while simulating ownership.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    /// Ring model error.
    #[error(transparent)]
    Ring(#[from] corelib::Error),

    /// Ownership was requested for a node the view has removed.
    #[error("node {0} is not part of this ring view")]
    NodeRemoved(NodeId),

    /// A surviving node's token is missing from the view.
    #[error("token {token} of node {node} is missing from the ring view")]
    TokenMissing { token: i64, node: NodeId },

    /// Unrecognized strategy name.
    #[error("unknown replication strategy {0:?} (expected rack-aware or simple)")]
    UnknownStrategy(String),
}
