//! Rack-aware replication strategy.
//!
//! Walks clockwise from a token and keeps the first entry of each rack in
//! the token's datacenter, until it has one entry per replica.
//!
//! # Termination
//!
//! A datacenter with fewer racks than the replication factor can never fill
//! the window, so the rack target is capped at the datacenter's rack count and
//! the walk at `lookahead` entries (and at one lap of the ring).

use corelib::RingView;

use crate::strategy::{ReplicationStrategy, DEFAULT_LOOKAHEAD};

/// One replica per distinct rack, within the origin's datacenter.
#[derive(Debug, Clone)]
pub struct NetworkTopologyStrategy {
    /// Replicas per datacenter (including primary).
    replication_factor: usize,
    /// Maximum entries inspected past the origin.
    lookahead: usize,
}

impl NetworkTopologyStrategy {
    pub fn new(replication_factor: usize) -> Self {
        Self {
            replication_factor,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }

    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }
}

impl ReplicationStrategy for NetworkTopologyStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replica_window(&self, view: &RingView<'_>, origin: usize) -> Vec<usize> {
        let Some(origin_node) = view.node_at(origin) else {
            return Vec::new();
        };
        let racks = view.topology().racks_in_datacenter(&origin_node.datacenter);
        let rack_limit = self.replication_factor.min(racks).max(1);
        let window = view.successor_window(origin, self.lookahead);
        view.distinct_rack_filter(origin, window, rack_limit)
    }

    fn name(&self) -> &'static str {
        "NetworkTopologyStrategy"
    }
}
