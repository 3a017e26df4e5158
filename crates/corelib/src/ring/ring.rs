//! The full, immutable token ring.

use tracing::debug;

use crate::error::Result;
use crate::node::{Node, NodeId, NodeRecord};
use crate::ring::view::RingView;
use crate::topology::Topology;
use crate::vnode::VirtualNode;

/// Every virtual node of every node, sorted by token.
///
/// Built once per run. Tokens are unique (checked by [`Topology`]), so
/// traversal order is strictly increasing and the successor of the last entry
/// is the first.
#[derive(Debug, Clone)]
pub struct TokenRing {
    topology: Topology,
    entries: Vec<VirtualNode>,
}

impl TokenRing {
    pub fn new(topology: Topology) -> Self {
        let mut entries: Vec<VirtualNode> = topology
            .nodes()
            .iter()
            .flat_map(|node| {
                node.tokens
                    .iter()
                    .map(move |token| VirtualNode::new(*token, node.id))
            })
            .collect();
        entries.sort_unstable();
        Self { topology, entries }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn entries(&self) -> &[VirtualNode] {
        &self.entries
    }

    pub fn token_count(&self) -> usize {
        self.entries.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.topology.node(id)
    }

    /// A view with nothing removed.
    pub fn view(&self) -> RingView<'_> {
        RingView::new(self, self.entries.clone(), Vec::new())
    }

    /// A view of the ring as it would look after `removed` leave it.
    ///
    /// Each call copies the surviving entries, so concurrent trials never see
    /// each other's removals.
    pub fn without(&self, removed: &[NodeId]) -> RingView<'_> {
        let mut removed = removed.to_vec();
        removed.sort_unstable();
        removed.dedup();
        let entries = self
            .entries
            .iter()
            .filter(|vnode| removed.binary_search(&vnode.node_id).is_err())
            .copied()
            .collect();
        RingView::new(self, entries, removed)
    }
}

/// Builder for [`TokenRing`].
///
/// # Example
///
/// ```rust
/// use corelib::{NodeRecord, RingBuilder};
///
/// let ring = RingBuilder::new()
///     .add_record(NodeRecord::new("10.0.0.1", "DC1", "R1", [0, 100]))
///     .add_record(NodeRecord::new("10.0.0.2", "DC1", "R1", [50, 150]))
///     .build()
///     .unwrap();
/// assert_eq!(ring.token_count(), 4);
/// ```
#[derive(Debug, Default)]
pub struct RingBuilder {
    records: Vec<NodeRecord>,
    contains_leaving_nodes: bool,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(mut self, record: NodeRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn add_records(mut self, records: impl IntoIterator<Item = NodeRecord>) -> Self {
        self.records.extend(records);
        self
    }

    pub fn with_leaving_nodes(mut self, contains_leaving_nodes: bool) -> Self {
        self.contains_leaving_nodes = contains_leaving_nodes;
        self
    }

    /// Merge the records and sort the ring.
    ///
    /// # Errors
    ///
    /// Any structural error from [`Topology::from_records`].
    pub fn build(self) -> Result<TokenRing> {
        let topology = Topology::from_records(self.records)?
            .with_leaving_nodes(self.contains_leaving_nodes);
        let ring = TokenRing::new(topology);
        debug!(tokens = ring.token_count(), "built token ring");
        Ok(ring)
    }
}
