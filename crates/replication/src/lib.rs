//! Replica-aware ownership simulation.
//!
//! This crate answers "how much of the ring would this node control" for a
//! reduced ring view:
//! - Replication strategies decide how far a token's replica window reaches
//! - The ownership calculator turns windows into owned token widths

pub mod error;
pub mod ownership;
pub mod strategy;

pub use error::{ReplicationError, Result};
pub use ownership::{Ownership, OwnershipCalculator};
pub use strategy::{
    NetworkTopologyStrategy, ReplicationStrategy, SimpleStrategy, StrategyKind,
    DEFAULT_LOOKAHEAD,
};
