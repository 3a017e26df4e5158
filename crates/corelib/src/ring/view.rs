//! Reduced ring views.
//!
//! A [`RingView`] is the ring restricted to surviving nodes. It answers the
//! circular successor queries the ownership calculation is built from.

use std::collections::BTreeSet;

use crate::node::{Node, NodeId};
use crate::ring::ring::TokenRing;
use crate::token::Murmur3Token;
use crate::topology::Topology;
use crate::vnode::VirtualNode;

/// The ring with some nodes removed.
#[derive(Debug, Clone)]
pub struct RingView<'a> {
    ring: &'a TokenRing,
    /// Surviving entries, still in token order.
    entries: Vec<VirtualNode>,
    /// Removed nodes, sorted.
    removed: Vec<NodeId>,
}

impl<'a> RingView<'a> {
    pub(crate) fn new(ring: &'a TokenRing, entries: Vec<VirtualNode>, removed: Vec<NodeId>) -> Self {
        Self {
            ring,
            entries,
            removed,
        }
    }

    pub fn ring(&self) -> &'a TokenRing {
        self.ring
    }

    pub fn topology(&self) -> &'a Topology {
        self.ring.topology()
    }

    pub fn entries(&self) -> &[VirtualNode] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn removed(&self) -> &[NodeId] {
        &self.removed
    }

    pub fn is_removed(&self, id: NodeId) -> bool {
        self.removed.binary_search(&id).is_ok()
    }

    pub fn entry(&self, index: usize) -> Option<&VirtualNode> {
        self.entries.get(index)
    }

    /// Owner of the entry at `index`.
    pub fn node_at(&self, index: usize) -> Option<&'a Node> {
        let entry = self.entries.get(index)?;
        self.ring.node(entry.node_id)
    }

    /// Index of `token` in this view, if it survived.
    pub fn position(&self, token: Murmur3Token) -> Option<usize> {
        self.entries
            .binary_search_by_key(&token, |vnode| vnode.token)
            .ok()
    }

    /// Indices of the next `count` entries after `start`, wrapping to the front.
    ///
    /// Never yields `start` itself, so at most `len - 1` indices come back no
    /// matter how large `count` is.
    pub fn successor_window(&self, start: usize, count: usize) -> impl Iterator<Item = usize> {
        let len = self.entries.len();
        let steps = count.min(len.saturating_sub(1));
        (1..=steps).map(move |step| (start + step) % len)
    }

    /// First occurrence of each rack in `window`, origin first.
    ///
    /// Only entries in the origin's datacenter count. Stops once `rack_limit`
    /// distinct racks (origin's included) have been seen or `window` runs out.
    pub fn distinct_rack_filter(
        &self,
        origin: usize,
        window: impl IntoIterator<Item = usize>,
        rack_limit: usize,
    ) -> Vec<usize> {
        let Some(origin_node) = self.node_at(origin) else {
            return Vec::new();
        };
        let mut selected = vec![origin];
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        seen.insert(origin_node.rack.as_str());
        if selected.len() >= rack_limit {
            return selected;
        }
        for index in window {
            let Some(node) = self.node_at(index) else {
                continue;
            };
            if node.datacenter != origin_node.datacenter {
                continue;
            }
            if seen.insert(node.rack.as_str()) {
                selected.push(index);
                if selected.len() >= rack_limit {
                    break;
                }
            }
        }
        selected
    }

    /// First entry after `after` whose owner lives in `datacenter`.
    ///
    /// Scans one full lap, so `after` itself is the answer when it is the only
    /// entry of that datacenter.
    pub fn next_in_datacenter(&self, after: usize, datacenter: &str) -> Option<usize> {
        let len = self.entries.len();
        (1..=len)
            .map(|step| (after + step) % len)
            .find(|&index| {
                self.node_at(index)
                    .is_some_and(|node| node.datacenter == datacenter)
            })
    }
}
