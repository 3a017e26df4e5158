//! Simple replication strategy.
//!
//! Places N replicas on the next distinct nodes clockwise from the primary,
//! within the primary's datacenter. Rack membership is ignored, so two
//! replicas may share a failure domain.
//!
//! # Algorithm
//!
//! 1. Start at the primary entry
//! 2. Continue clockwise (at most `lookahead` entries) collecting unseen nodes
//! 3. Stop once N nodes are collected

use std::collections::HashSet;

use corelib::RingView;

use crate::strategy::{ReplicationStrategy, DEFAULT_LOOKAHEAD};

/// Simple replication strategy: N replicas on consecutive distinct nodes.
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including primary).
    replication_factor: usize,
    lookahead: usize,
}

impl SimpleStrategy {
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

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replica_window(&self, view: &RingView<'_>, origin: usize) -> Vec<usize> {
        let Some(primary) = view.node_at(origin) else {
            return Vec::new();
        };
        let wanted = self.replication_factor.max(1);

        let mut replicas = Vec::with_capacity(wanted);
        let mut seen_nodes = HashSet::new();
        replicas.push(origin);
        seen_nodes.insert(primary.id);

        for index in view.successor_window(origin, self.lookahead) {
            if replicas.len() >= wanted {
                break;
            }
            let Some(node) = view.node_at(index) else {
                continue;
            };
            if node.datacenter != primary.datacenter {
                continue;
            }
            if seen_nodes.insert(node.id) {
                replicas.push(index);
            }
        }

        replicas
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}
