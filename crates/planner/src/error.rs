//! Error types for planning.

use replication::ReplicationError;
use thiserror::Error;

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, PlanError>;

/// Errors that can occur while planning.
///
/// [`PlanError::InsufficientRackSize`] and [`PlanError::SearchSpaceTooLarge`]
/// are per-rack: the planner turns them into a rack status and carries on.
/// Everything else aborts the run.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Ring model error.
    #[error(transparent)]
    Ring(#[from] corelib::Error),

    /// Ownership simulation error.
    #[error(transparent)]
    Replication(#[from] ReplicationError),

    /// The rack does not have more nodes than the removal count.
    #[error("rack {rack} has {available} nodes, cannot remove {removal_count}")]
    InsufficientRackSize {
        rack: String,
        available: usize,
        removal_count: usize,
    },

    /// The combination count exceeds the configured guards.
    #[error("rack {rack}: choosing {removal_count} of {nodes} nodes exceeds the search limits")]
    SearchSpaceTooLarge {
        rack: String,
        nodes: usize,
        removal_count: usize,
    },

    /// A datacenter present in the ring has no configuration.
    #[error("no configuration for datacenter {0}")]
    MissingDatacenterConfig(String),

    /// Invalid configuration parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A scoring worker thread panicked.
    #[error("candidate scoring worker panicked")]
    WorkerPanicked,
}
