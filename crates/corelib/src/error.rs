//! Error types for the core library.

use thiserror::Error;

use crate::node::NodeId;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or querying the ring model.
///
/// All of these are structural: a ring that fails to build cannot be
/// simulated at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The same address was reported under two different datacenter/rack pairs.
    #[error("inconsistent node record for {address}: seen in {existing}, then in {incoming}")]
    InconsistentNodeRecord {
        address: String,
        existing: String,
        incoming: String,
    },

    /// Two entries claim the same ring position.
    #[error("token {token} is owned by both {first} and {second}")]
    DuplicateToken {
        token: i64,
        first: String,
        second: String,
    },

    /// No node records at all.
    #[error("ring is empty")]
    EmptyRing,

    /// Node records exist but none of them owns a token.
    #[error("ring contains no tokens")]
    NoTokens,

    /// A node id that the topology never assigned.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
}
