//! Ring topology: merged nodes grouped by datacenter and rack.
//!
//! A [`Topology`] is built once from the reported node records and never
//! mutated afterwards. Rack groups are derived from the node set.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, NodeRecord, RackKey};
use crate::token::Murmur3Token;

/// Nodes sharing one datacenter and rack, in address order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RackGroup {
    pub key: RackKey,
    pub nodes: Vec<NodeId>,
}

/// Merged view of every node in the ring.
#[derive(Debug, Clone)]
pub struct Topology {
    /// Indexed by `NodeId`.
    nodes: Vec<Node>,
    racks: BTreeMap<RackKey, Vec<NodeId>>,
    /// Distinct rack count per datacenter.
    racks_per_datacenter: HashMap<String, usize>,
    token_count: usize,
    contains_leaving_nodes: bool,
}

impl Topology {
    /// Merge records per address and assign ids in address order.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyRing`] when there are no records
    /// - [`Error::InconsistentNodeRecord`] when an address changes dc/rack
    /// - [`Error::DuplicateToken`] when two records claim one token
    /// - [`Error::NoTokens`] when no record carries a token
    pub fn from_records(records: impl IntoIterator<Item = NodeRecord>) -> Result<Self> {
        let mut by_address: BTreeMap<String, NodeRecord> = BTreeMap::new();
        for record in records {
            match by_address.get_mut(&record.address) {
                Some(existing) => existing.merge(record)?,
                None => {
                    by_address.insert(record.address.clone(), record);
                }
            }
        }
        if by_address.is_empty() {
            return Err(Error::EmptyRing);
        }

        let mut owners: HashMap<Murmur3Token, String> = HashMap::new();
        let mut nodes = Vec::with_capacity(by_address.len());
        for (index, (_, mut record)) in by_address.into_iter().enumerate() {
            record.tokens.sort_unstable();
            for token in &record.tokens {
                if let Some(first) = owners.insert(*token, record.address.clone()) {
                    return Err(Error::DuplicateToken {
                        token: token.0,
                        first,
                        second: record.address.clone(),
                    });
                }
            }
            nodes.push(Node {
                id: NodeId(index as u32),
                address: record.address,
                datacenter: record.datacenter,
                rack: record.rack,
                tokens: record.tokens,
            });
        }
        if owners.is_empty() {
            return Err(Error::NoTokens);
        }

        let mut racks: BTreeMap<RackKey, Vec<NodeId>> = BTreeMap::new();
        for node in &nodes {
            racks.entry(node.rack_key()).or_default().push(node.id);
        }
        let mut dc_racks: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for key in racks.keys() {
            dc_racks
                .entry(key.datacenter.as_str())
                .or_default()
                .insert(key.rack.as_str());
        }
        let racks_per_datacenter = dc_racks
            .into_iter()
            .map(|(dc, set)| (dc.to_string(), set.len()))
            .collect();

        debug!(
            nodes = nodes.len(),
            racks = racks.len(),
            tokens = owners.len(),
            "built topology"
        );

        Ok(Self {
            nodes,
            racks,
            racks_per_datacenter,
            token_count: owners.len(),
            contains_leaving_nodes: false,
        })
    }

    /// Carry the "some node is mid-departure" flag from the status report.
    pub fn with_leaving_nodes(mut self, contains_leaving_nodes: bool) -> Self {
        self.contains_leaving_nodes = contains_leaving_nodes;
        self
    }

    pub fn contains_leaving_nodes(&self) -> bool {
        self.contains_leaving_nodes
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Like [`Topology::node`], but unknown ids are an error.
    pub fn try_node(&self, id: NodeId) -> Result<&Node> {
        self.node(id).ok_or(Error::UnknownNode(id))
    }

    pub fn find(&self, address: &str) -> Option<&Node> {
        self.nodes
            .binary_search_by(|node| node.address.as_str().cmp(address))
            .ok()
            .map(|index| &self.nodes[index])
    }

    /// All nodes in address order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn rack_count(&self) -> usize {
        self.racks.len()
    }

    /// Rack groups in (datacenter, rack) order.
    pub fn rack_groups(&self) -> impl Iterator<Item = RackGroup> + '_ {
        self.racks.iter().map(|(key, nodes)| RackGroup {
            key: key.clone(),
            nodes: nodes.clone(),
        })
    }

    pub fn rack_group(&self, key: &RackKey) -> Option<RackGroup> {
        self.racks.get(key).map(|nodes| RackGroup {
            key: key.clone(),
            nodes: nodes.clone(),
        })
    }

    /// Number of distinct racks in `datacenter`, zero if unknown.
    pub fn racks_in_datacenter(&self, datacenter: &str) -> usize {
        self.racks_per_datacenter
            .get(datacenter)
            .copied()
            .unwrap_or(0)
    }

    /// Datacenter names, sorted.
    pub fn datacenters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .racks
            .keys()
            .map(|key| key.datacenter.as_str())
            .collect();
        names.dedup();
        names
    }
}
