//! Owned token width per surviving node.
//!
//! For every token of a node, the node "controls" the ring from that token up
//! to the next same-datacenter token after the token's replica window. Past
//! that point a replica on another rack already covers the range, so who owns
//! the token no longer matters. Summing over a node's tokens gives its owned
//! width.
//!
//! Widths are recomputed from scratch for every ring view; nothing is cached
//! across trials.

use std::collections::BTreeMap;

use corelib::{NodeId, RingView, Token, RING_SIZE};
use tracing::trace;

use crate::error::{ReplicationError, Result};
use crate::strategy::ReplicationStrategy;

/// Owned width per node, in token units.
pub type Ownership = BTreeMap<NodeId, u128>;

/// Computes owned widths using a replication strategy's windows.
#[derive(Clone, Copy)]
pub struct OwnershipCalculator<'s> {
    strategy: &'s dyn ReplicationStrategy,
}

impl<'s> OwnershipCalculator<'s> {
    pub fn new(strategy: &'s dyn ReplicationStrategy) -> Self {
        Self { strategy }
    }

    /// Width controlled by the entry at `origin`.
    ///
    /// The full ring (2^64) when the window laps the whole datacenter.
    pub fn token_width(&self, view: &RingView<'_>, origin: usize) -> u128 {
        let (Some(start), Some(origin_node)) = (view.entry(origin), view.node_at(origin)) else {
            return 0;
        };
        let window = self.strategy.replica_window(view, origin);
        let last = window.last().copied().unwrap_or(origin);
        let next = view
            .next_in_datacenter(last, &origin_node.datacenter)
            .unwrap_or(origin);
        if next == origin {
            return RING_SIZE;
        }
        match view.entry(next) {
            Some(end) => u128::from(start.token.distance_to(&end.token)),
            None => 0,
        }
    }

    /// Total width owned by `node` in `view`.
    ///
    /// # Errors
    ///
    /// - [`ReplicationError::NodeRemoved`] if `view` has removed the node
    /// - [`ReplicationError::TokenMissing`] if one of its tokens is absent
    pub fn owned_width(&self, view: &RingView<'_>, node: NodeId) -> Result<u128> {
        if view.is_removed(node) {
            return Err(ReplicationError::NodeRemoved(node));
        }
        let owner = view.topology().try_node(node)?;
        let mut width: u128 = 0;
        for token in &owner.tokens {
            let origin = view
                .position(*token)
                .ok_or(ReplicationError::TokenMissing {
                    token: token.0,
                    node,
                })?;
            width += self.token_width(view, origin);
        }
        trace!(
            node = %owner.address,
            tokens = owner.tokens.len(),
            width,
            strategy = self.strategy.name(),
            "owned width"
        );
        Ok(width)
    }

    /// Owned widths for each of `nodes`.
    pub fn ownership(&self, view: &RingView<'_>, nodes: &[NodeId]) -> Result<Ownership> {
        nodes
            .iter()
            .map(|&node| Ok((node, self.owned_width(view, node)?)))
            .collect()
    }
}

impl std::fmt::Debug for OwnershipCalculator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnershipCalculator")
            .field("strategy", &self.strategy.name())
            .field("replication_factor", &self.strategy.replication_factor())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{NetworkTopologyStrategy, SimpleStrategy};
    use corelib::{NodeRecord, RingBuilder, TokenRing};

    fn id(ring: &TokenRing, address: &str) -> NodeId {
        ring.topology().find(address).unwrap().id
    }

    fn single_rack() -> TokenRing {
        RingBuilder::new()
            .add_record(NodeRecord::new("A", "DC1", "R1", [0, 100]))
            .add_record(NodeRecord::new("B", "DC1", "R1", [50, 150]))
            .add_record(NodeRecord::new("C", "DC1", "R1", [25, 125]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_primary_range_widths() {
        let ring = single_rack();
        let strategy = NetworkTopologyStrategy::new(3);
        let calc = OwnershipCalculator::new(&strategy);
        let view = ring.without(&[id(&ring, "C")]);

        // 0:A 50:B 100:A 150:B -- one rack, so windows hold the origin only
        assert_eq!(calc.owned_width(&view, id(&ring, "A")).unwrap(), 100);
        let b = calc.owned_width(&view, id(&ring, "B")).unwrap();
        assert_eq!(b, 50 + (RING_SIZE - 150));
    }

    #[test]
    fn test_widths_cover_ring_once_with_rf_one() {
        let ring = single_rack();
        let strategy = NetworkTopologyStrategy::new(1);
        let calc = OwnershipCalculator::new(&strategy);
        let view = ring.view();
        let nodes: Vec<NodeId> = ring.topology().nodes().iter().map(|n| n.id).collect();
        let total: u128 = calc.ownership(&view, &nodes).unwrap().values().sum();
        assert_eq!(total, RING_SIZE);
    }

    #[test]
    fn test_window_extends_to_next_rack_boundary() {
        // 0:a(R1) 10:b(R1) 20:c(R2) 30:d(R1)
        let ring = RingBuilder::new()
            .add_record(NodeRecord::new("a", "DC1", "R1", [0]))
            .add_record(NodeRecord::new("b", "DC1", "R1", [10]))
            .add_record(NodeRecord::new("c", "DC1", "R2", [20]))
            .add_record(NodeRecord::new("d", "DC1", "R1", [30]))
            .build()
            .unwrap();
        let strategy = NetworkTopologyStrategy::new(2);
        let calc = OwnershipCalculator::new(&strategy);
        let view = ring.view();
        // a's window is [a, c]; the next token after c is d@30
        assert_eq!(calc.token_width(&view, 0), 30);
        // c's window is [c, d]; next after d wraps to a@0
        assert_eq!(calc.token_width(&view, 2), RING_SIZE - 20);
    }

    #[test]
    fn test_other_datacenters_are_skipped() {
        // 0:a(DC1) 10:x(DC2) 20:b(DC1)
        let ring = RingBuilder::new()
            .add_record(NodeRecord::new("a", "DC1", "R1", [0]))
            .add_record(NodeRecord::new("b", "DC1", "R1", [20]))
            .add_record(NodeRecord::new("x", "DC2", "R1", [10]))
            .build()
            .unwrap();
        let strategy = SimpleStrategy::new(1);
        let calc = OwnershipCalculator::new(&strategy);
        let view = ring.view();
        assert_eq!(calc.owned_width(&view, id(&ring, "a")).unwrap(), 20);
        // x is alone in DC2 and controls the whole ring there
        assert_eq!(calc.owned_width(&view, id(&ring, "x")).unwrap(), RING_SIZE);
    }

    #[test]
    fn test_wraparound_width() {
        let ring = RingBuilder::new()
            .add_record(NodeRecord::new("a", "DC1", "R1", [i64::MAX - 4]))
            .add_record(NodeRecord::new("b", "DC1", "R1", [i64::MIN + 5]))
            .build()
            .unwrap();
        let strategy = NetworkTopologyStrategy::new(3);
        let calc = OwnershipCalculator::new(&strategy);
        let view = ring.view();
        assert_eq!(calc.owned_width(&view, id(&ring, "a")).unwrap(), 10);
    }

    #[test]
    fn test_removed_node_is_an_error() {
        let ring = single_rack();
        let strategy = NetworkTopologyStrategy::new(3);
        let calc = OwnershipCalculator::new(&strategy);
        let a = id(&ring, "A");
        let view = ring.without(&[a]);
        assert_eq!(calc.owned_width(&view, a), Err(ReplicationError::NodeRemoved(a)));
    }

    #[test]
    fn test_unknown_node_is_an_error() {
        let ring = single_rack();
        let strategy = NetworkTopologyStrategy::new(3);
        let calc = OwnershipCalculator::new(&strategy);
        let view = ring.view();
        assert!(matches!(
            calc.owned_width(&view, NodeId(42)),
            Err(ReplicationError::Ring(corelib::Error::UnknownNode(NodeId(42))))
        ));
    }
}
