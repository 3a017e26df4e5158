//! Replication strategy abstractions.
//!
//! A strategy decides which entries following a token would hold its
//! replicas. The ownership calculator only needs the far end of that window:
//! past it, another rack already holds a copy no matter which node owns the
//! token.
//!
//! - **NetworkTopologyStrategy**: one replica per distinct rack in the
//!   datacenter (the canonical choice)
//! - **SimpleStrategy**: the next distinct nodes, racks ignored
//!
//! Both look a bounded number of entries ahead. This approximates placement;
//! it is not a faithful model of any particular cluster's replica sets.

pub mod network_topology;
pub mod simple;

use std::fmt;
use std::str::FromStr;

use corelib::RingView;
use serde::{Deserialize, Serialize};

use crate::error::ReplicationError;

pub use network_topology::NetworkTopologyStrategy;
pub use simple::SimpleStrategy;

/// How many entries past a token a window may inspect.
pub const DEFAULT_LOOKAHEAD: usize = 10;

/// Trait for replication strategies.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync): one strategy is shared
/// by every trial of a rack.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Get the number of replicas this strategy creates.
    fn replication_factor(&self) -> usize;

    /// Indices into `view` of the entries holding replicas of the range that
    /// starts at `origin`, primary (`origin`) first.
    ///
    /// All returned entries are in the origin's datacenter and appear in ring
    /// order. Empty only when `origin` is out of range.
    fn replica_window(&self, view: &RingView<'_>, origin: usize) -> Vec<usize>;

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Selectable strategy, for configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    RackAware,
    Simple,
}

impl StrategyKind {
    pub fn build(self, replication_factor: usize, lookahead: usize) -> Box<dyn ReplicationStrategy> {
        match self {
            StrategyKind::RackAware => {
                Box::new(NetworkTopologyStrategy::new(replication_factor).with_lookahead(lookahead))
            }
            StrategyKind::Simple => {
                Box::new(SimpleStrategy::new(replication_factor).with_lookahead(lookahead))
            }
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::RackAware => f.write_str("rack-aware"),
            StrategyKind::Simple => f.write_str("simple"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = ReplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "rack-aware" | "network-topology" => Ok(StrategyKind::RackAware),
            "simple" => Ok(StrategyKind::Simple),
            _ => Err(ReplicationError::UnknownStrategy(s.to_string())),
        }
    }
}
