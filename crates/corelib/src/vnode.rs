//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes)
//!
//! Each physical node owns many tokens. A [`VirtualNode`] is one of them: a
//! single (token, owner) entry of the ring. The ring is nothing more than the
//! sorted sequence of every node's virtual nodes.
//!
//! Removing a physical node removes all of its virtual nodes at once; the
//! ranges they controlled are absorbed by whichever entries now precede the
//! gaps.

use crate::node::NodeId;
use crate::token::{Murmur3Token, Token};

/// One token position on the ring and the node that owns it.
///
/// # Invariants
///
/// - Every `VirtualNode` in a ring has a unique token
/// - Every `VirtualNode` belongs to exactly one physical node
/// - Ordering is by token first, so a sorted `Vec<VirtualNode>` is ring order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    pub token: Murmur3Token,

    /// The physical node that owns this virtual node.
    pub node_id: NodeId,
}

impl VirtualNode {
    #[inline]
    pub fn new(token: Murmur3Token, node_id: NodeId) -> Self {
        Self { token, node_id }
    }

    #[inline]
    pub fn token(&self) -> Murmur3Token {
        self.token
    }

    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        self.token.distance_to(&other.token)
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(token={}, node={})", self.token, self.node_id)
    }
}
